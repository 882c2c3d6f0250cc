use std::io::Write;

use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::error::Result;
use crate::fmt::grouped;
use crate::view::{ChartView, TableView};

const BAR_WIDTH: usize = 24;

/// Draws view models somewhere. A renderer replaces its whole table on each
/// `draw_table`, and hands out a chart handle that must be given back through
/// `release_chart` before the next chart is drawn.
pub trait Renderer {
    type Chart;

    fn draw_table(&mut self, table: &TableView) -> Result<()>;
    fn draw_chart(&mut self, chart: &ChartView) -> Result<Self::Chart>;
    fn release_chart(&mut self, chart: Self::Chart);
}

/// Handle for a chart printed by `TerminalRenderer`.
#[derive(Debug, PartialEq, Eq)]
pub struct PrintedChart(pub u64);

/// Prints comfy-table tables and a text bar chart to any writer.
pub struct TerminalRenderer<W: Write> {
    out: W,
    charts_drawn: u64,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            charts_drawn: 0,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    type Chart = PrintedChart;

    fn draw_table(&mut self, view: &TableView) -> Result<()> {
        if view.rows.is_empty() {
            writeln!(self.out, "No expenses recorded yet.")?;
            return Ok(());
        }

        let mut table = Table::new();
        table.set_header(vec!["ID", "Date", "Category", "Memo", "Amount"]);
        for row in &view.rows {
            table.add_row(vec![
                Cell::new(row.id),
                Cell::new(&row.date),
                Cell::new(&row.category),
                Cell::new(&row.memo),
                Cell::new(&row.amount_display).set_alignment(CellAlignment::Right),
            ]);
        }
        table.add_row(vec![
            Cell::new("Total".bold()),
            Cell::new(""),
            Cell::new(""),
            Cell::new(""),
            Cell::new(view.total_display.as_str().bold()).set_alignment(CellAlignment::Right),
        ]);
        writeln!(self.out, "Expenses\n{table}")?;
        Ok(())
    }

    fn draw_chart(&mut self, view: &ChartView) -> Result<PrintedChart> {
        self.charts_drawn += 1;
        let handle = PrintedChart(self.charts_drawn);
        if view.is_empty() {
            return Ok(handle);
        }

        let mut table = Table::new();
        table.set_header(vec!["Category", "Share", ""]);
        for slice in &view.slices {
            let filled = (slice.share * BAR_WIDTH as f64).round() as usize;
            let bar = "\u{2588}".repeat(filled);
            let bar = if slice.amount < 0.0 { bar.red() } else { bar.cyan() };
            table.add_row(vec![
                Cell::new(&slice.label),
                Cell::new(format!("{:.1}%", slice.share * 100.0)).set_alignment(CellAlignment::Right),
                Cell::new(bar),
            ]);
        }
        table.add_row(vec![
            Cell::new(format!("Total: {}", grouped(view.total)).bold()),
            Cell::new(""),
            Cell::new(""),
        ]);
        writeln!(self.out, "\nCategory Breakdown\n{table}")?;
        Ok(handle)
    }

    fn release_chart(&mut self, chart: PrintedChart) {
        log::debug!("event=chart_release chart={}", chart.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseRecord;
    use crate::view::{project_chart, project_table};

    fn ledger() -> Vec<ExpenseRecord> {
        vec![
            ExpenseRecord {
                id: 1,
                date: "2024-01-01".to_string(),
                category: "Food".to_string(),
                memo: "lunch".to_string(),
                amount: 1000.0,
            },
            ExpenseRecord {
                id: 2,
                date: "2024-01-03".to_string(),
                category: "Transport".to_string(),
                memo: "train".to_string(),
                amount: 300.0,
            },
        ]
    }

    fn output(renderer: TerminalRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_table_lists_rows_and_total() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.draw_table(&project_table(&ledger())).unwrap();
        let out = output(renderer);
        assert!(out.contains("lunch"));
        assert!(out.contains("train"));
        assert!(out.contains("1,300"));
    }

    #[test]
    fn test_empty_table_message() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.draw_table(&project_table(&[])).unwrap();
        assert!(output(renderer).contains("No expenses recorded yet."));
    }

    #[test]
    fn test_chart_labels_carry_suffix() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        let handle = renderer.draw_chart(&project_chart(&ledger(), "円")).unwrap();
        assert_eq!(handle, PrintedChart(1));
        let out = output(renderer);
        assert!(out.contains("Food: 1,000円"));
        assert!(out.contains("Transport: 300円"));
    }

    #[test]
    fn test_chart_handles_are_distinct() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        let view = project_chart(&ledger(), "");
        let first = renderer.draw_chart(&view).unwrap();
        renderer.release_chart(first);
        let second = renderer.draw_chart(&view).unwrap();
        assert_eq!(second, PrintedChart(2));
    }
}
