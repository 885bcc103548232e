//! Пакетная загрузка отчётов и сводные представления записей.

use crate::error::ExtractError;
use crate::raw::StatementPayload;
use crate::statement::extract_records;
use crate::types::{AccountId, ExtractionRecord, Money, MonthlyPivotRow, YearSummary};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fs::{self, DirEntry};
use std::path::Path;

/// Расширения файлов, принимаемые пакетным загрузчиком.
const STATEMENT_EXTENSIONS: [&str; 4] = ["pdf", "html", "htm", "txt"];

/// Набор извлечённых записей с утилитами для агрегации.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    /// Записи в порядке обработки файлов.
    pub records: Vec<ExtractionRecord>,
}

impl RecordSet {
    /// Загружает и разбирает все файлы отчётов из каталога.
    ///
    /// Файлы обрабатываются в отсортированном порядке. Файл, который не
    /// удалось прочитать, пропускается с записью в лог; ошибкой является
    /// только недоступность самого каталога.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ExtractError> {
        let mut entries: Vec<_> = fs::read_dir(dir)?
            .filter_map(std::result::Result::ok)
            .collect();
        // Делаем порядок файлов детерминированным.
        entries.sort_by_key(DirEntry::path);

        let mut records = Vec::new();
        for entry in entries {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
                continue;
            };
            if !STATEMENT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
                continue;
            }

            match StatementPayload::from_path(&path) {
                Ok(payload) => records.extend(extract_records(&payload)),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "skipping unreadable file");
                }
            }
        }

        Ok(Self { records })
    }

    /// Загружает и разбирает один файл отчёта.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ExtractError> {
        let payload = StatementPayload::from_path(path)?;
        Ok(Self {
            records: extract_records(&payload),
        })
    }

    /// Возвращает итератор по записям конкретного счёта.
    #[inline]
    pub fn by_account<'a>(
        &'a self,
        id: &'a AccountId,
    ) -> impl Iterator<Item = &'a ExtractionRecord> {
        self.records.iter().filter(move |r| &r.account.id == id)
    }

    /// Записи, отсортированные по (год, месяц, счёт).
    ///
    /// Записи с неразрешённым периодом идут первыми.
    #[must_use]
    pub fn sorted_records(&self) -> Vec<ExtractionRecord> {
        let mut records = self.records.clone();
        records.sort_by(|a, b| {
            (a.period.year, a.period.month, &a.account.id)
                .cmp(&(b.period.year, b.period.month, &b.account.id))
        });
        records
    }

    /// Суммирует все четыре поля P&L по (счёт, год).
    #[must_use]
    pub fn summary_by_year(&self) -> Vec<YearSummary> {
        let mut map: BTreeMap<(AccountId, Option<i32>), YearSummary> = BTreeMap::new();
        for record in &self.records {
            let key = (record.account.id.clone(), record.period.year);
            let entry = map.entry(key).or_insert_with(|| YearSummary {
                account: record.account.id.clone(),
                year: record.period.year,
                stocks: Decimal::ZERO,
                options: Decimal::ZERO,
                forex: Decimal::ZERO,
                total: Decimal::ZERO,
            });
            entry.stocks += record.pnl.stocks;
            entry.options += record.pnl.options;
            entry.forex += record.pnl.forex;
            entry.total += record.pnl.total;
        }
        map.into_values().collect()
    }

    /// Сводная таблица (год, месяц) × счёт по итоговому P&L.
    ///
    /// Записи с неразрешённым периодом попадают в отдельную первую
    /// строку, а не отбрасываются.
    #[must_use]
    pub fn monthly_summary(&self) -> Vec<MonthlyPivotRow> {
        let mut map: BTreeMap<(Option<i32>, Option<u32>), BTreeMap<AccountId, Money>> =
            BTreeMap::new();
        for record in &self.records {
            let cell = map
                .entry((record.period.year, record.period.month))
                .or_default()
                .entry(record.account.id.clone())
                .or_insert(Decimal::ZERO);
            *cell += record.pnl.total;
        }
        map.into_iter()
            .map(|((year, month), totals)| MonthlyPivotRow {
                year,
                month,
                totals,
            })
            .collect()
    }
}
