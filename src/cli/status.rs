use crate::error::Result;
use crate::fmt::{format_bytes, grouped};
use crate::ledger::LedgerStore;
use crate::settings::load_settings;
use crate::storage::SqliteStorage;
use crate::view::{aggregate_by_category, total};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let db_path = settings.db_path();

    println!("Data dir:   {}", settings.data_dir);
    println!("Database:   {}", db_path.display());
    println!("Logs:       {}", settings.log_dir().display());

    if db_path.exists() {
        let size = std::fs::metadata(&db_path)?.len();
        println!("DB size:    {}", format_bytes(size));

        let store = LedgerStore::load(SqliteStorage::open(&db_path)?)?;
        let records = store.get_all();

        println!();
        println!("Expenses:      {}", records.len());
        println!("Categories:    {}", aggregate_by_category(records).len());
        println!("Total:         {}{}", grouped(total(records)), settings.currency_suffix);
    } else {
        println!();
        println!("Database not found. Run `kakeibo init` to set up.");
    }

    Ok(())
}
