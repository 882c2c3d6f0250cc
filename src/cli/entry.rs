use chrono::Local;

use crate::cli::open_session;
use crate::error::Result;
use crate::models::EntryForm;

pub fn add(date: Option<&str>, category: &str, memo: &str, amount: &str) -> Result<()> {
    let date = date
        .map(str::to_string)
        .unwrap_or_else(|| Local::now().format("%Y-%m-%d").to_string());
    let mut session = open_session()?;
    let id = session.submit_entry(&EntryForm::new(&date, category, memo, amount))?;
    println!("\nAdded expense #{id}");
    Ok(())
}

pub fn delete(id: i64) -> Result<()> {
    let mut session = open_session()?;
    let existed = session.store().get(id).is_some();
    session.delete_entry(id)?;
    if existed {
        println!("\nDeleted expense #{id}");
    } else {
        println!("\nNo expense #{id}; nothing deleted");
    }
    Ok(())
}
