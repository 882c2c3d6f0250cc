use crate::cli::open_session;
use crate::error::Result;

pub fn list() -> Result<()> {
    open_session()?.render_table()
}

pub fn chart() -> Result<()> {
    let mut session = open_session()?;
    if session.store().is_empty() {
        println!("No expenses recorded yet.");
        return Ok(());
    }
    session.render_chart()
}

pub fn show() -> Result<()> {
    open_session()?.render()
}
