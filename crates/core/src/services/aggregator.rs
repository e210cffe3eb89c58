use chrono::{DateTime, Datelike, TimeZone};
use std::collections::BTreeMap;

use crate::models::category::category_color;
use crate::models::expense::Expense;
use crate::models::summary::CategoryShare;

/// Whether `expense` was created in the same calendar year and month as
/// `now`, both read in `now`'s time zone.
pub fn is_in_month<Tz: TimeZone>(expense: &Expense, now: &DateTime<Tz>) -> bool {
    let created = expense.created_at.with_timezone(&now.timezone());
    created.year() == now.year() && created.month() == now.month()
}

/// Sum of amounts for the month containing `now`. 0 when nothing matches.
pub fn total_for_month<Tz: TimeZone>(expenses: &[Expense], now: &DateTime<Tz>) -> f64 {
    expenses
        .iter()
        .filter(|e| is_in_month(e, now))
        .map(|e| e.amount)
        .sum()
}

/// Per-category sums for the month containing `now`.
/// Categories without expenses in that month are absent.
pub fn totals_by_category_for_month<Tz: TimeZone>(
    expenses: &[Expense],
    now: &DateTime<Tz>,
) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for expense in expenses.iter().filter(|e| is_in_month(e, now)) {
        *totals.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
    }
    totals
}

/// Chart slices for the month containing `now`, largest first.
pub fn category_breakdown<Tz: TimeZone>(expenses: &[Expense], now: &DateTime<Tz>) -> Vec<CategoryShare> {
    let totals = totals_by_category_for_month(expenses, now);
    let month_total: f64 = totals.values().sum();

    let mut shares: Vec<CategoryShare> = totals
        .into_iter()
        .map(|(category, total)| CategoryShare {
            share_pct: if month_total > 0.0 {
                (total / month_total) * 100.0
            } else {
                0.0
            },
            color: category_color(&category),
            category,
            total,
        })
        .collect();

    shares.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    shares
}

/// True when at least one category has a positive total.
pub fn has_spending(totals: &BTreeMap<String, f64>) -> bool {
    totals.values().any(|v| *v > 0.0)
}

/// The first `n` expenses (newest first, given a newest-first ledger).
pub fn recent(expenses: &[Expense], n: usize) -> Vec<Expense> {
    expenses.iter().take(n).cloned().collect()
}
