use std::io::Write;
use std::path::PathBuf;

use crate::cli::{open_storage, ExportFormat};
use crate::error::Result;
use crate::ledger::LedgerStore;
use crate::models::ExpenseRecord;
use crate::settings::load_settings;

pub fn run(format: ExportFormat, output: Option<String>) -> Result<()> {
    let settings = load_settings();
    let store = LedgerStore::load(open_storage(&settings)?)?;

    match output {
        Some(path) => {
            let path = PathBuf::from(path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::File::create(&path)?;
            write_records(format, store.get_all(), file)?;
            println!("Wrote {} expenses to {}", store.len(), path.display());
        }
        None => write_records(format, store.get_all(), std::io::stdout().lock())?,
    }
    Ok(())
}

pub fn write_records<W: Write>(format: ExportFormat, records: &[ExpenseRecord], out: W) -> Result<()> {
    match format {
        ExportFormat::Csv => write_csv(records, out),
        ExportFormat::Json => write_json(records, out),
    }
}

/// One header row, then id,date,category,memo,amount per record in ledger order.
fn write_csv<W: Write>(records: &[ExpenseRecord], out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for record in records {
        wtr.serialize(record)?;
    }
    if records.is_empty() {
        wtr.write_record(["id", "date", "category", "memo", "amount"])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Same layout as the stored `expensesData` value.
fn write_json<W: Write>(records: &[ExpenseRecord], mut out: W) -> Result<()> {
    serde_json::to_writer(&mut out, records)?;
    writeln!(out)?;
    Ok(())
}
