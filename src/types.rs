//! Доменные типы: счета, периоды, реализованный P&L.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Денежное значение, используем `Decimal` для точных расчётов.
pub type Money = Decimal;

/// Идентификатор брокерского счёта, как он напечатан в отчёте.
///
/// Может быть маскированным (`U***6153`) или полным (`U1046153`),
/// с необязательным суффиксом `F` у форекс-субсчёта. Маскированный и
/// полный варианты одного счёта не сводятся друг к другу: равенство
/// идентификаторов — строго строковое.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(pub String);

impl AccountId {
    /// Суффикс `F` обозначает форекс-субсчёт с отдельной секцией P&L.
    #[inline]
    #[must_use]
    pub fn is_forex_sub(&self) -> bool {
        self.0.ends_with('F')
    }
}

/// Счёт, найденный в отчёте.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Идентификатор счёта.
    pub id: AccountId,
    /// Имя владельца, как оно напечатано.
    pub name: String,
}

/// Ревизия разметки HTML-отчёта.
///
/// Определяет, какой набор правил применяет экстрактор P&L:
/// `Legacy2013` — отдельный набор, остальные теги обрабатываются
/// объединённым набором правил.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
    /// Разметка 2013 года: общий блок сводки без привязки к счёту.
    Legacy2013,
    /// Разметка с маскированными номерами счетов («new»).
    Interim,
    /// Разметка с полными номерами счетов («old»).
    Current,
    /// Ни один из известных признаков не найден.
    Unknown,
}

impl SchemaVariant {
    /// Короткая метка для логов.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Legacy2013 => "2013",
            Self::Interim => "new",
            Self::Current => "old",
            Self::Unknown => "unknown",
        }
    }
}

/// Категория инструмента в сводке реализованного P&L.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PnlCategory {
    /// Акции.
    Stocks,
    /// Опционы на акции и индексы.
    Options,
    /// Форекс.
    Forex,
    /// Итог по всем активам.
    Total,
}

/// Реализованный P&L по категориям инструментов.
///
/// Отсутствие категории в отчёте — норма, поле остаётся нулевым.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RealizedPnl {
    /// Акции.
    pub stocks: Money,
    /// Опционы.
    pub options: Money,
    /// Форекс.
    pub forex: Money,
    /// Итог по всем активам.
    pub total: Money,
}

impl RealizedPnl {
    /// Записывает значение категории.
    pub const fn set(&mut self, category: PnlCategory, value: Money) {
        match category {
            PnlCategory::Stocks => self.stocks = value,
            PnlCategory::Options => self.options = value,
            PnlCategory::Forex => self.forex = value,
            PnlCategory::Total => self.total = value,
        }
    }
}

/// Период отчёта, как он напечатан в шапке.
///
/// Год и месяц могут остаться неразрешёнными, если фраза периода не
/// найдена или дата не разобралась; запись при этом всё равно создаётся.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatementPeriod {
    /// Календарный год конца периода.
    pub year: Option<i32>,
    /// Календарный месяц конца периода.
    pub month: Option<u32>,
    /// Дата начала периода, дословно.
    pub start: Option<String>,
    /// Дата конца периода, дословно.
    pub end: Option<String>,
}

impl StatementPeriod {
    /// Строка периода для вывода: «start - end» или «Unknown».
    #[must_use]
    pub fn display_label(&self) -> String {
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => format!("{start} - {end}"),
            _ => "Unknown".to_string(),
        }
    }
}

/// Одна извлечённая запись: (отчёт, счёт) → реализованный P&L.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRecord {
    /// Имя исходного файла.
    pub file: String,
    /// Период отчёта.
    pub period: StatementPeriod,
    /// Счёт.
    pub account: Account,
    /// Реализованный P&L.
    pub pnl: RealizedPnl,
}

/// Сумма реализованного P&L по счёту за год.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSummary {
    /// Идентификатор счёта.
    pub account: AccountId,
    /// Год; `None` — записи с неразрешённым периодом.
    pub year: Option<i32>,
    /// Сумма по акциям.
    pub stocks: Money,
    /// Сумма по опционам.
    pub options: Money,
    /// Сумма по форексу.
    pub forex: Money,
    /// Сумма итогов.
    pub total: Money,
}

/// Строка сводной таблицы (год, месяц) × счёт по итоговому P&L.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyPivotRow {
    /// Год; `None` — неразрешённый период.
    pub year: Option<i32>,
    /// Месяц; `None` — неразрешённый период.
    pub month: Option<u32>,
    /// Итоговый P&L по каждому счёту за этот месяц.
    pub totals: BTreeMap<AccountId, Money>,
}
