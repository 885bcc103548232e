#![warn(missing_docs)]
//! Библиотека для извлечения реализованного P&L из месячных отчётов
//! Interactive Brokers (HTML и текст из PDF) и агрегации записей.

mod error;
mod fixed_layout;
mod markup;
mod period;
mod raw;
mod record_set;
mod statement;
mod types;
mod utils;

pub use crate::error::ExtractError;
pub use crate::raw::{DomStatement, PayloadKind, StatementPayload};
pub use crate::record_set::RecordSet;
pub use crate::statement::extract_records;
pub use crate::types::*;
