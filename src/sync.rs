use log::debug;

use crate::error::Result;
use crate::models::ExpenseRecord;
use crate::render::Renderer;
use crate::view::{project_chart, project_table};

/// Keeps the table and the category chart in step with the ledger. The only
/// state carried between cycles is the handle of the chart on screen.
pub struct ViewSynchronizer<R: Renderer> {
    renderer: R,
    chart: Option<R::Chart>,
    suffix: String,
}

impl<R: Renderer> ViewSynchronizer<R> {
    pub fn new(renderer: R, suffix: &str) -> Self {
        Self {
            renderer,
            chart: None,
            suffix: suffix.to_string(),
        }
    }

    /// Replace the table with one row per record plus the grand total.
    pub fn render_table(&mut self, ledger: &[ExpenseRecord]) -> Result<()> {
        let view = project_table(ledger);
        self.renderer.draw_table(&view)
    }

    /// Rebuild the category chart. The previous chart is released first.
    pub fn render_chart(&mut self, ledger: &[ExpenseRecord]) -> Result<()> {
        let view = project_chart(ledger, &self.suffix);
        if let Some(old) = self.chart.take() {
            self.renderer.release_chart(old);
        }
        self.chart = Some(self.renderer.draw_chart(&view)?);
        Ok(())
    }

    /// One render cycle: table, then chart.
    pub fn render_all(&mut self, ledger: &[ExpenseRecord]) -> Result<()> {
        debug!("event=render records={}", ledger.len());
        self.render_table(ledger)?;
        self.render_chart(ledger)
    }

    #[cfg(test)]
    pub fn has_chart(&self) -> bool {
        self.chart.is_some()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
