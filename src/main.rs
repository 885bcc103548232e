//! CLI: извлекает реализованный P&L из каталога или файла отчётов
//! и печатает записи со сводками.

use std::env;
use std::io::{self, Write};
use std::path::Path;

use ib_pnl_extract::RecordSet;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = if let Some(path) = env::args().nth(1) {
        path
    } else {
        print!("Enter the path to your statements folder: ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        line.trim().to_string()
    };

    let path = Path::new(&path);
    if !path.exists() {
        println!("Path not found: {}", path.display());
        return Ok(());
    }

    let set = if path.is_dir() {
        RecordSet::from_dir(path)?
    } else {
        RecordSet::from_file(path)?
    };

    if set.records.is_empty() {
        println!("No records extracted");
        return Ok(());
    }

    println!("Records:");
    for record in set.sorted_records() {
        println!(
            "  {} | {} | {} | {} | stocks {} | options {} | forex {} | total {}",
            record.file,
            record.period.display_label(),
            record.account.id.0,
            record.account.name,
            record.pnl.stocks,
            record.pnl.options,
            record.pnl.forex,
            record.pnl.total
        );
    }

    println!("\nSummary by year:");
    for row in set.summary_by_year() {
        let year = row.year.map_or_else(|| "Unknown".to_string(), |y| y.to_string());
        println!(
            "  {} | {} | stocks {} | options {} | forex {} | total {}",
            row.account.0, year, row.stocks, row.options, row.forex, row.total
        );
    }

    println!("\nMonthly summary:");
    for row in set.monthly_summary() {
        let year = row.year.map_or_else(|| "Unknown".to_string(), |y| y.to_string());
        let month = row.month.map_or_else(|| "Unknown".to_string(), |m| m.to_string());
        let totals: Vec<String> = row
            .totals
            .iter()
            .map(|(account, total)| format!("{} {}", account.0, total))
            .collect();
        println!("  {year}-{month} | {}", totals.join(" | "));
    }

    println!("\nProcessed {} records", set.records.len());
    Ok(())
}
