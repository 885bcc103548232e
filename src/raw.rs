//! Чтение исходных файлов отчётов и подготовка DOM-дерева.

use crate::error::ExtractError;
use scraper::Html;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Физический формат отчёта.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// Текст с фиксированной раскладкой (PDF или его текстовый экспорт).
    FixedLayout,
    /// HTML-разметка.
    Markup,
}

/// Исходное содержимое одного файла отчёта.
#[derive(Debug, Clone)]
pub struct StatementPayload {
    /// Имя файла без каталога.
    pub file_name: String,
    /// Физический формат.
    pub kind: PayloadKind,
    /// Полный текст файла: HTML либо извлечённый из PDF текст.
    pub text: String,
}

impl StatementPayload {
    /// Читает отчёт с диска, определяя формат по расширению.
    ///
    /// `pdf` прогоняется через извлечение текста, `txt` читается как
    /// готовый текст фиксированной раскладки, `html`/`htm` — как разметка.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("pdf") => {
                let text = pdf_extract::extract_text(path)
                    .map_err(|err| ExtractError::Pdf(err.to_string()))?;
                Ok(Self {
                    file_name,
                    kind: PayloadKind::FixedLayout,
                    text,
                })
            }
            Some("txt") => Ok(Self {
                file_name,
                kind: PayloadKind::FixedLayout,
                text: fs::read_to_string(path)?,
            }),
            Some("html" | "htm") => Ok(Self {
                file_name,
                kind: PayloadKind::Markup,
                text: fs::read_to_string(path)?,
            }),
            _ => Err(ExtractError::UnsupportedFile {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Читает отчёт указанного формата из произвольного `Read`.
    pub fn from_reader<R: Read>(
        file_name: &str,
        kind: PayloadKind,
        mut reader: R,
    ) -> Result<Self, ExtractError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Self {
            file_name: file_name.to_string(),
            kind,
            text,
        })
    }

    /// Создаёт отчёт из готовой строки.
    #[inline]
    #[must_use]
    pub fn from_text(file_name: &str, kind: PayloadKind, text: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            kind,
            text: text.to_string(),
        }
    }
}

/// Разобранный DOM HTML-отчёта.
#[derive(Debug, Clone)]
pub struct DomStatement {
    pub(crate) doc: Html,
}

impl DomStatement {
    /// Парсит DOM из исходного HTML.
    #[inline]
    #[must_use]
    pub fn parse(html: &str) -> Self {
        Self {
            doc: Html::parse_document(html),
        }
    }

    /// Полный текст документа без разметки, для поиска фразы периода.
    #[must_use]
    pub fn text(&self) -> String {
        self.doc
            .root_element()
            .text()
            .collect::<Vec<_>>()
            .join("\n")
    }
}
