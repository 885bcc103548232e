//! Поиск периода отчёта в тексте.

use crate::types::StatementPeriod;
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Фразы периода, в порядке приоритета.
static PERIOD_RES: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"Activity Summary\s+(\w+ \d+, \d+) - (\w+ \d+, \d+)")
            .expect("valid summary regex"),
        Regex::new(r"Activity Statement\s+(\w+ \d+, \d+) - (\w+ \d+, \d+)")
            .expect("valid statement regex"),
    ]
});

impl StatementPeriod {
    /// Ищет фразу периода в тексте отчёта.
    ///
    /// Год и месяц берутся из даты конца периода («Month Day, Year»).
    /// Если фраза найдена, но дата не разобралась, дословные строки дат
    /// сохраняются, а год и месяц остаются неразрешёнными. Если фраза
    /// не найдена, период целиком неразрешён.
    #[must_use]
    pub fn resolve(text: &str) -> Self {
        for re in PERIOD_RES.iter() {
            if let Some(caps) = re.captures(text) {
                let start = caps.get(1).map(|m| m.as_str().to_string());
                let end = caps.get(2).map(|m| m.as_str().to_string());
                let end_date = end
                    .as_deref()
                    .and_then(|s| NaiveDate::parse_from_str(s, "%B %d, %Y").ok());
                if end_date.is_none() {
                    debug!(end = ?end, "period phrase found but end date did not parse");
                }
                return Self {
                    year: end_date.map(|d| d.year()),
                    month: end_date.map(|d| d.month()),
                    start,
                    end,
                };
            }
        }
        debug!("no statement period phrase found");
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_activity_statement_phrase() {
        let period =
            StatementPeriod::resolve("Activity Statement January 1, 2021 - January 31, 2021");
        assert_eq!(period.year, Some(2021));
        assert_eq!(period.month, Some(1));
        assert_eq!(
            period.display_label(),
            "January 1, 2021 - January 31, 2021"
        );
    }

    #[test]
    fn summary_phrase_takes_priority() {
        let text = "Activity Summary May 1, 2014 - May 31, 2014\n\
                    Activity Statement June 1, 2014 - June 30, 2014";
        let period = StatementPeriod::resolve(text);
        assert_eq!((period.year, period.month), (Some(2014), Some(5)));
    }

    #[test]
    fn unparseable_date_keeps_literals() {
        let period =
            StatementPeriod::resolve("Activity Statement Febtober 1, 2021 - Febtober 31, 2021");
        assert_eq!(period.year, None);
        assert_eq!(period.month, None);
        assert_eq!(period.start.as_deref(), Some("Febtober 1, 2021"));
        assert_eq!(period.end.as_deref(), Some("Febtober 31, 2021"));
    }

    #[test]
    fn missing_phrase_is_fully_unresolved() {
        let period = StatementPeriod::resolve("no period here");
        assert_eq!(period, StatementPeriod::default());
        assert_eq!(period.display_label(), "Unknown");
    }
}
