//! Разбор текстовых отчётов с фиксированной раскладкой (PDF).

use crate::types::{Account, AccountId, PnlCategory, RealizedPnl};
use crate::utils::parse_amount;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Заголовок секции сводки P&L; текст делится по нему на сегменты.
const PERF_SUMMARY_MARKER: &str = "Realized & Unrealized Performance Summary";
/// Заголовок секций реквизитов счёта, запасная стратегия поиска счетов.
const ACCOUNT_INFO_MARKER: &str = "Account Information";

/// Строка сводной таблицы счетов: номер (полный, маскированный или с
/// префиксом площадки), имя из букв и пробелов, затем три числовых поля.
static SUMMARY_ACCOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(SGDU\*\*\*\d+|U\*\*\*\d+F?|U\d+F?)\s+([A-Za-z\s]+?)\s+[\d,]+\.?\d*\s+[\d,]+\.?\d*\s+[-\d.]+%",
    )
    .expect("valid summary account regex")
});

static ACCOUNT_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Account\s+([UF\*\d]+F?)").expect("valid account line regex"));
// Имя ограничено строкой, иначе захват уползает на следующую.
static NAME_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Name[ \t]+([A-Za-z][A-Za-z ]*)").expect("valid name line regex"));

/// Правило чтения одной строки сводки P&L.
///
/// Позиции токенов — единственное, что меняется от ревизии к ревизии
/// раскладки; правило на ревизию, а не универсальные константы.
struct LineRule {
    /// Префикс строки.
    prefix: &'static str,
    /// Дополнительная подстрока-признак, если префикса мало.
    needle: Option<&'static str>,
    /// Минимальное число токенов в строке.
    min_tokens: usize,
    /// Индекс токена с реализованным значением.
    token_idx: usize,
    /// Категория, в которую пишется значение.
    category: PnlCategory,
}

const LINE_RULES: [LineRule; 4] = [
    LineRule {
        prefix: "Total (All Assets)",
        needle: None,
        min_tokens: 15,
        token_idx: 8,
        category: PnlCategory::Total,
    },
    LineRule {
        prefix: "Total Forex",
        needle: None,
        min_tokens: 14,
        token_idx: 7,
        category: PnlCategory::Forex,
    },
    LineRule {
        prefix: "Total Stocks",
        needle: None,
        min_tokens: 14,
        token_idx: 7,
        category: PnlCategory::Stocks,
    },
    LineRule {
        // Строка опционов не начинается с «Total», отличаем её по нулевой
        // колонке, которая в этой раскладке всегда напечатана.
        prefix: "Options",
        needle: Some("0.00"),
        min_tokens: 12,
        token_idx: 5,
        category: PnlCategory::Options,
    },
];

/// Перечисляет счета отчёта, без повторов, в порядке текста.
///
/// Сначала строки сводной таблицы; если ни одна не совпала — секции
/// «Account Information», каждая со строками `Account` и `Name`.
#[must_use]
pub fn accounts(text: &str) -> Vec<Account> {
    let mut accounts: Vec<Account> = Vec::new();

    for caps in SUMMARY_ACCOUNT_RE.captures_iter(text) {
        let id = AccountId(caps[1].trim().to_string());
        if accounts.iter().any(|a| a.id == id) {
            continue;
        }
        accounts.push(Account {
            id,
            name: caps[2].trim().to_string(),
        });
    }
    if !accounts.is_empty() {
        return accounts;
    }

    for section in text.split(ACCOUNT_INFO_MARKER).skip(1) {
        let id = ACCOUNT_LINE_RE
            .captures(section)
            .map(|caps| caps[1].trim().to_string());
        let name = NAME_LINE_RE
            .captures(section)
            .map(|caps| caps[1].trim().to_string());
        if let (Some(id), Some(name)) = (id, name) {
            let id = AccountId(id);
            if !accounts.iter().any(|a| a.id == id) {
                accounts.push(Account { id, name });
            }
        }
    }
    accounts
}

/// Извлекает реализованный P&L счёта из текста отчёта.
///
/// Текст делится по заголовку сводки; счёт с суффиксом `F` читает
/// последний сегмент, когда сегментов больше двух, остальные — первый
/// после заголовка. Нечисловой токен оставляет свою категорию нулевой,
/// не трогая остальные.
#[must_use]
pub fn realized_pnl(text: &str, account: &AccountId) -> RealizedPnl {
    let segments: Vec<&str> = text.split(PERF_SUMMARY_MARKER).collect();
    if segments.len() < 2 {
        warn!(account = %account.0, "no performance summary section");
        return RealizedPnl::default();
    }

    let segment_idx = if account.is_forex_sub() && segments.len() > 2 {
        segments.len() - 1
    } else {
        1
    };
    debug!(account = %account.0, segment_idx, "selected performance summary segment");

    let mut pnl = RealizedPnl::default();
    for line in segments[segment_idx].lines() {
        let line = line.trim();
        let Some(rule) = LINE_RULES.iter().find(|rule| {
            line.starts_with(rule.prefix)
                && rule.needle.is_none_or(|needle| line.contains(needle))
        }) else {
            continue;
        };

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < rule.min_tokens {
            continue;
        }
        match parse_amount(tokens[rule.token_idx], rule.prefix) {
            Ok(value) => pnl.set(rule.category, value),
            Err(err) => {
                warn!(account = %account.0, label = rule.prefix, %err, "token did not parse");
            }
        }
    }
    pnl
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    const SUMMARY_LINE: &str = "U1234567 John Doe 100,000.00 105,000.00 5.00%";

    #[test]
    fn summary_line_yields_account() {
        let found = accounts(SUMMARY_LINE);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.0, "U1234567");
        assert_eq!(found[0].name, "John Doe");
    }

    #[test]
    fn masked_and_prefixed_ids_match() {
        let text = "U***6153 Jane Roe 1.00 2.00 3.00%\nSGDU***42 Jane Roe 1.00 2.00 3.00%";
        let ids: Vec<String> = accounts(text).into_iter().map(|a| a.id.0).collect();
        assert_eq!(ids, ["U***6153", "SGDU***42"]);
    }

    #[test]
    fn info_section_fallback() {
        let text = "Account Information\nAccount U7654321F\nName Jane Roe\nBase Currency USD";
        let found = accounts(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.0, "U7654321F");
        assert_eq!(found[0].name, "Jane Roe");
    }

    #[test]
    fn no_marker_means_zero_pnl() {
        let pnl = realized_pnl("nothing here", &AccountId("U1".to_string()));
        assert_eq!(pnl, RealizedPnl::default());
    }

    #[test]
    fn stocks_line_reads_token_seven() {
        let text = format!(
            "{PERF_SUMMARY_MARKER}\n\
             Total Stocks 10.00 20.00 30.00 40.00 50.00 123.45 60.00 70.00 80.00 90.00 100.00 110.00\n"
        );
        let pnl = realized_pnl(&text, &AccountId("U1".to_string()));
        assert_eq!(pnl.stocks, Decimal::new(12_345, 2));
    }

    #[test]
    fn short_line_is_ignored() {
        let text = format!("{PERF_SUMMARY_MARKER}\nTotal Stocks 1.00 2.00 3.00\n");
        let pnl = realized_pnl(&text, &AccountId("U1".to_string()));
        assert_eq!(pnl.stocks, Decimal::ZERO);
    }

    #[test]
    fn forex_sub_reads_last_segment() {
        let text = format!(
            "{PERF_SUMMARY_MARKER}\n\
             Total Forex 1.00 2.00 3.00 4.00 5.00 1.11 6.00 7.00 8.00 9.00 10.00 11.00\n\
             {PERF_SUMMARY_MARKER}\n\
             Total Forex 1.00 2.00 3.00 4.00 5.00 2.22 6.00 7.00 8.00 9.00 10.00 11.00\n"
        );
        let primary = realized_pnl(&text, &AccountId("U1".to_string()));
        let forex_sub = realized_pnl(&text, &AccountId("U1F".to_string()));
        assert_eq!(primary.forex, Decimal::new(111, 2));
        assert_eq!(forex_sub.forex, Decimal::new(222, 2));
    }
}
