//! Извлечение записей из одного отчёта.

use crate::fixed_layout;
use crate::raw::{DomStatement, PayloadKind, StatementPayload};
use crate::types::{ExtractionRecord, StatementPeriod};
use tracing::{debug, warn};

/// Извлекает все записи (счёт × P&L) из одного отчёта.
///
/// Никогда не падает: отчёт без счетов или без секций P&L даёт пустой
/// или частично нулевой результат, о чём пишется в лог. Повторный вызов
/// на том же содержимом возвращает те же записи.
#[must_use]
pub fn extract_records(payload: &StatementPayload) -> Vec<ExtractionRecord> {
    match payload.kind {
        PayloadKind::Markup => extract_from_markup(payload),
        PayloadKind::FixedLayout => extract_from_fixed_layout(payload),
    }
}

fn extract_from_markup(payload: &StatementPayload) -> Vec<ExtractionRecord> {
    let dom = DomStatement::parse(&payload.text);
    let period = StatementPeriod::resolve(&dom.text());

    let variant = dom.classify();
    debug!(file = %payload.file_name, variant = variant.label(), "classified markup statement");

    let accounts = dom.accounts();
    if accounts.is_empty() {
        warn!(file = %payload.file_name, "no accounts found");
        return Vec::new();
    }

    accounts
        .into_iter()
        .map(|account| {
            let pnl = dom.realized_pnl(&account.id, variant);
            ExtractionRecord {
                file: payload.file_name.clone(),
                period: period.clone(),
                account,
                pnl,
            }
        })
        .collect()
}

fn extract_from_fixed_layout(payload: &StatementPayload) -> Vec<ExtractionRecord> {
    let period = StatementPeriod::resolve(&payload.text);

    let accounts = fixed_layout::accounts(&payload.text);
    if accounts.is_empty() {
        warn!(file = %payload.file_name, "no accounts found");
        return Vec::new();
    }
    if accounts.len() > 2 {
        // Выбор сегмента сводки проверен только на парах «основной счёт
        // плюс форекс-субсчёт»; с тремя и более счетами все не-F счета
        // прочитают один и тот же сегмент.
        warn!(
            file = %payload.file_name,
            accounts = accounts.len(),
            "more than two accounts, segment selection is unverified"
        );
    }

    accounts
        .into_iter()
        .map(|account| {
            let pnl = fixed_layout::realized_pnl(&payload.text, &account.id);
            ExtractionRecord {
                file: payload.file_name.clone(),
                period: period.clone(),
                account,
                pnl,
            }
        })
        .collect()
}
