use log::info;

use crate::error::Result;
use crate::ledger::LedgerStore;
use crate::models::{EntryForm, ExpenseRecord};
use crate::render::Renderer;
use crate::storage::Storage;
use crate::sync::ViewSynchronizer;

/// The one place a ledger and its views are wired together. Every mutation
/// goes through here so both views are redrawn after the save.
pub struct Session<S: Storage, R: Renderer> {
    store: LedgerStore<S>,
    views: ViewSynchronizer<R>,
}

impl<S: Storage, R: Renderer> Session<S, R> {
    /// Load the saved ledger and draw the first render cycle.
    pub fn startup(storage: S, renderer: R, suffix: &str) -> Result<Self> {
        let mut session = Self::open(storage, renderer, suffix)?;
        session.render()?;
        info!("event=startup records={}", session.store.len());
        Ok(session)
    }

    /// Load the saved ledger without drawing. One-shot commands use this so
    /// only the state after their mutation is shown.
    pub fn open(storage: S, renderer: R, suffix: &str) -> Result<Self> {
        let store = LedgerStore::load(storage)?;
        let views = ViewSynchronizer::new(renderer, suffix);
        Ok(Self { store, views })
    }

    /// Redraw both views from the current ledger.
    pub fn render(&mut self) -> Result<()> {
        self.views.render_all(self.store.get_all())
    }

    /// Redraw only the table (the `list` command).
    pub fn render_table(&mut self) -> Result<()> {
        self.views.render_table(self.store.get_all())
    }

    /// Redraw only the chart (the `chart` command).
    pub fn render_chart(&mut self) -> Result<()> {
        self.views.render_chart(self.store.get_all())
    }

    /// Add an entry and redraw. A validation error leaves everything as it was
    /// and nothing is redrawn.
    pub fn submit_entry(&mut self, form: &EntryForm) -> Result<i64> {
        let ledger = self
            .store
            .add(&form.date, &form.category, &form.memo, &form.amount)?;
        let id = ledger.last().map(|r| r.id).unwrap_or_default();
        self.views.render_all(ledger)?;
        Ok(id)
    }

    /// Delete by id (a missing id is fine) and redraw.
    pub fn delete_entry(&mut self, id: i64) -> Result<()> {
        let ledger = self.store.delete(id)?;
        self.views.render_all(ledger)
    }

    pub fn ledger(&self) -> &[ExpenseRecord] {
        self.store.get_all()
    }

    pub fn store(&self) -> &LedgerStore<S> {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        self.views.renderer()
    }
}
