//! Pure projections from the ledger to what renderers draw. Nothing here
//! holds state between render cycles.

use std::collections::HashMap;

use crate::fmt::{grouped, with_suffix};
use crate::models::ExpenseRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Also the handle a delete action is bound to.
    pub id: i64,
    pub date: String,
    pub category: String,
    pub memo: String,
    pub amount: f64,
    pub amount_display: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub rows: Vec<TableRow>,
    pub total: f64,
    pub total_display: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSlice {
    pub category: String,
    pub amount: f64,
    /// Fraction of the summed absolute slice amounts, 0.0..=1.0.
    pub share: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub slices: Vec<ChartSlice>,
    pub total: f64,
}

impl ChartView {
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

pub fn total(ledger: &[ExpenseRecord]) -> f64 {
    ledger.iter().fold(0.0, |acc, r| acc + r.amount)
}

pub fn project_table(ledger: &[ExpenseRecord]) -> TableView {
    let rows = ledger
        .iter()
        .map(|r| TableRow {
            id: r.id,
            date: r.date.clone(),
            category: r.category.clone(),
            memo: r.memo.clone(),
            amount: r.amount,
            amount_display: grouped(r.amount),
        })
        .collect();
    let total = total(ledger);
    TableView {
        rows,
        total,
        total_display: grouped(total),
    }
}

/// Sum amounts per category in one pass, keeping first-seen category order.
pub fn aggregate_by_category(ledger: &[ExpenseRecord]) -> Vec<CategoryTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for r in ledger {
        match index.get(r.category.as_str()) {
            Some(&i) => totals[i].amount += r.amount,
            None => {
                index.insert(r.category.as_str(), totals.len());
                totals.push(CategoryTotal {
                    category: r.category.clone(),
                    amount: r.amount,
                });
            }
        }
    }
    totals
}

pub fn project_chart(ledger: &[ExpenseRecord], suffix: &str) -> ChartView {
    let totals = aggregate_by_category(ledger);
    let magnitude: f64 = totals.iter().map(|t| t.amount.abs()).sum();
    let slices = totals
        .into_iter()
        .map(|t| ChartSlice {
            share: if magnitude > 0.0 { t.amount.abs() / magnitude } else { 0.0 },
            label: format!("{}: {}", t.category, with_suffix(t.amount, suffix)),
            category: t.category,
            amount: t.amount,
        })
        .collect();
    ChartView {
        slices,
        total: total(ledger),
    }
}
