//! Ошибки чтения и разбора брокерских отчётов.

use std::path::PathBuf;

/// Ошибка чтения исходного файла или разбора значения.
#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    /// Ошибка ввода-вывода при чтении исходного файла.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Не удалось извлечь текст из PDF.
    #[error("PDF extraction error: {0}")]
    Pdf(String),
    /// Файл с нераспознанным расширением.
    #[error("Unsupported file: {path}")]
    UnsupportedFile {
        /// Путь к файлу.
        path: PathBuf,
    },
    /// Ошибка разбора числового значения.
    #[error("Invalid number '{value}' in column '{column}'")]
    Number {
        /// Некорректное исходное значение.
        value: String,
        /// Название столбца или токена.
        column: &'static str,
    },
}
