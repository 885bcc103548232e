//! Разбор HTML-отчётов: ревизия разметки, счета, секции P&L.

use crate::raw::DomStatement;
use crate::types::{Account, AccountId, PnlCategory, RealizedPnl, SchemaVariant};
use crate::utils::{collect_text, divs_with_id_affixes, find_div_by_id, parse_amount};
use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Контейнер сводки «Realized & Unrealized Performance Summary»:
/// `tblFIFOPerfSumByUnderlying<счёт>Body`. В разметке 2013 года есть ещё
/// общий контейнер с пустым слотом счёта — по нему её и распознаём.
const PERF_SUMMARY_PREFIX: &str = "tblFIFOPerfSumByUnderlying";
/// Контейнеры секций «Account Information»: `tblAccountInformation_<суффикс>Body`.
const ACCOUNT_INFO_PREFIX: &str = "tblAccountInformation_";
/// Общий суффикс контейнеров секций.
const SECTION_SUFFIX: &str = "Body";

/// Маркер маскированного номера счёта.
const MASKED_MARKER: &str = "U***";

/// Реализованное значение стоит в седьмой ячейке строки подытога.
/// Единственная позиция, которую придётся сдвинуть при новой ревизии разметки.
const REALIZED_COL: usize = 6;
/// Минимум ячеек в строке сводной таблицы счетов; короче — шапки и декор.
const MIN_SUMMARY_CELLS: usize = 6;
/// Минимум ячеек в строке подытога секции P&L.
const MIN_SUBTOTAL_CELLS: usize = 7;

/// Метки строк подытогов объединённого набора правил и их категории.
const SUBTOTAL_LABELS: [(&str, PnlCategory); 4] = [
    ("Total Stocks", PnlCategory::Stocks),
    ("Total Equity and Index Options", PnlCategory::Options),
    ("Total Forex", PnlCategory::Forex),
    ("Total (All Assets)", PnlCategory::Total),
];

static BARE_ACCOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^U\d+F?$").expect("valid account regex"));

static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid table selector"));
static TR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("valid tr selector"));
static TD_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("valid td selector"));

/// Текст ячейки похож на номер счёта, маскированный или полный.
fn is_account_cell(text: &str) -> bool {
    text.contains(MASKED_MARKER) || BARE_ACCOUNT_RE.is_match(text)
}

impl DomStatement {
    /// Определяет ревизию разметки отчёта.
    ///
    /// Один проход, без ошибок: неизвестная разметка — это `Unknown`,
    /// который экстрактор обрабатывает объединённым набором правил.
    /// Документ со смешанными признаками (маскированный номер в одной
    /// строке, полный — в другой) классифицируется по первой подходящей
    /// строке в порядке документа.
    #[must_use]
    pub fn classify(&self) -> SchemaVariant {
        let legacy_probe = format!("{PERF_SUMMARY_PREFIX}{SECTION_SUFFIX}");
        if find_div_by_id(&self.doc, &legacy_probe).is_some() {
            return SchemaVariant::Legacy2013;
        }

        for row in self.doc.select(&TR_SELECTOR) {
            let Some(first) = row.select(&TD_SELECTOR).next() else {
                continue;
            };
            let text = collect_text(first);
            if text.contains(MASKED_MARKER) {
                return SchemaVariant::Interim;
            }
            if BARE_ACCOUNT_RE.is_match(&text) {
                return SchemaVariant::Current;
            }
        }

        SchemaVariant::Unknown
    }

    /// Перечисляет счета отчёта, без повторов, в порядке документа.
    ///
    /// Сначала сводная таблица счетов; если она не дала ни одного счёта —
    /// секции «Account Information» (так устроена разметка 2013 года).
    #[must_use]
    pub fn accounts(&self) -> Vec<Account> {
        let mut accounts = self.accounts_from_summary();
        if accounts.is_empty() {
            accounts = self.accounts_from_info_sections();
        }
        accounts
    }

    /// Строки сводной таблицы: номер счёта в первой ячейке, имя — в третьей.
    fn accounts_from_summary(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = Vec::new();
        for row in self.doc.select(&TR_SELECTOR) {
            let cells: Vec<String> = row.select(&TD_SELECTOR).map(collect_text).collect();
            if cells.len() < MIN_SUMMARY_CELLS || !is_account_cell(&cells[0]) {
                continue;
            }
            let id = AccountId(cells[0].clone());
            if accounts.iter().any(|a| a.id == id) {
                continue;
            }
            accounts.push(Account {
                id,
                name: cells[2].clone(),
            });
        }
        accounts
    }

    /// Секции «Account Information»: строки с метками `Account` и `Name`.
    /// Секция даёт счёт, только если нашлись обе метки.
    fn accounts_from_info_sections(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = Vec::new();
        for section in divs_with_id_affixes(&self.doc, ACCOUNT_INFO_PREFIX, SECTION_SUFFIX) {
            let mut id = None;
            let mut name = None;
            for row in section.select(&TR_SELECTOR) {
                let cells: Vec<String> = row.select(&TD_SELECTOR).map(collect_text).collect();
                if cells.len() < 2 {
                    continue;
                }
                match cells[0].as_str() {
                    "Account" => id = Some(cells[1].clone()),
                    "Name" => name = Some(cells[1].clone()),
                    _ => {}
                }
            }
            if let (Some(id), Some(name)) = (id, name) {
                let id = AccountId(id);
                if !accounts.iter().any(|a| a.id == id) {
                    accounts.push(Account { id, name });
                }
            }
        }
        accounts
    }

    /// Извлекает реализованный P&L счёта по правилам указанной ревизии.
    ///
    /// Отсутствие секции или нечисловое значение в отдельной категории
    /// не прерывает извлечение: поле остаётся нулевым.
    #[must_use]
    pub fn realized_pnl(&self, account: &AccountId, variant: SchemaVariant) -> RealizedPnl {
        let section_id = format!("{PERF_SUMMARY_PREFIX}{}{SECTION_SUFFIX}", account.0);
        let Some(section) = find_div_by_id(&self.doc, &section_id) else {
            warn!(account = %account.0, "no performance summary section");
            return RealizedPnl::default();
        };
        debug!(account = %account.0, variant = variant.label(), "found performance summary section");

        let mut pnl = RealizedPnl::default();
        match variant {
            SchemaVariant::Legacy2013 => {
                // Единственная таблица секции, строка «Total»; в 2013 году
                // есть только итог по всем активам, категории остаются нулями.
                let Some(table) = section.select(&TABLE_SELECTOR).next() else {
                    return pnl;
                };
                for row in table.select(&TR_SELECTOR) {
                    let cells: Vec<String> =
                        row.select(&TD_SELECTOR).map(collect_text).collect();
                    if cells.first().map(String::as_str) != Some("Total")
                        || cells.len() <= REALIZED_COL
                    {
                        continue;
                    }
                    match parse_amount(&cells[REALIZED_COL], "Total") {
                        Ok(value) => pnl.set(PnlCategory::Total, value),
                        Err(err) => warn!(account = %account.0, %err, "total did not parse"),
                    }
                    break;
                }
            }
            SchemaVariant::Interim | SchemaVariant::Current | SchemaVariant::Unknown => {
                for row in section.select(&TR_SELECTOR) {
                    let is_subtotal = row
                        .value()
                        .classes()
                        .any(|class| class == "subtotal" || class == "total");
                    if !is_subtotal {
                        continue;
                    }
                    let cells: Vec<String> =
                        row.select(&TD_SELECTOR).map(collect_text).collect();
                    if cells.len() < MIN_SUBTOTAL_CELLS {
                        continue;
                    }
                    for (label, category) in SUBTOTAL_LABELS {
                        if !cells[0].contains(label) {
                            continue;
                        }
                        match parse_amount(&cells[REALIZED_COL], label) {
                            Ok(value) => pnl.set(category, value),
                            Err(err) => {
                                warn!(account = %account.0, label, %err, "category did not parse");
                            }
                        }
                        break;
                    }
                }
            }
        }
        pnl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_probe_wins_over_account_cells() {
        let html = r#"<html><body>
            <div id="tblFIFOPerfSumByUnderlyingBody"></div>
            <table><tr><td>U1234567</td></tr></table>
        </body></html>"#;
        let dom = DomStatement::parse(html);
        assert_eq!(dom.classify(), SchemaVariant::Legacy2013);
    }

    #[test]
    fn masked_cell_classifies_interim() {
        let html = "<table><tr><td>U***6153</td></tr></table>";
        let dom = DomStatement::parse(html);
        assert_eq!(dom.classify(), SchemaVariant::Interim);
    }

    #[test]
    fn bare_cell_classifies_current() {
        let html = "<table><tr><td>U1046153F</td></tr></table>";
        let dom = DomStatement::parse(html);
        assert_eq!(dom.classify(), SchemaVariant::Current);
    }

    #[test]
    fn no_cue_classifies_unknown() {
        let dom = DomStatement::parse("<table><tr><td>Header</td></tr></table>");
        assert_eq!(dom.classify(), SchemaVariant::Unknown);
    }

    #[test]
    fn short_rows_are_not_account_rows() {
        let html = "<table><tr><td>U1234567</td><td>x</td><td>Name</td></tr></table>";
        let dom = DomStatement::parse(html);
        assert!(dom.accounts().is_empty());
    }
}
