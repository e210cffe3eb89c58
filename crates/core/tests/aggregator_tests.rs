// ═══════════════════════════════════════════════════════════════════
// Aggregator Tests — month matching, totals, category breakdown
// ═══════════════════════════════════════════════════════════════════

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use std::collections::BTreeMap;

use family_finance_core::models::expense::{Expense, NewExpense};
use family_finance_core::services::aggregator;

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn expense(description: &str, amount: f64, category: &str, created: DateTime<Utc>) -> Expense {
    Expense::stamp(NewExpense::new(description, amount, category), created)
}

/// Newest-first ledger spanning three months.
fn ledger() -> Vec<Expense> {
    vec![
        expense("Mercado", 200.0, "Alimentação", at(2025, 3, 28, 12)),
        expense("Aluguel", 100.0, "Casa", at(2025, 3, 5, 9)),
        expense("Luz", 50.0, "Casa", at(2025, 3, 2, 9)),
        expense("Uber", 30.0, "Transporte", at(2025, 3, 1, 8)),
        expense("Farmácia", 80.0, "Saúde", at(2025, 2, 27, 18)),
        expense("Cinema", 40.0, "Lazer", at(2024, 3, 15, 20)),
    ]
}

// ═══════════════════════════════════════════════════════════════════
// is_in_month
// ═══════════════════════════════════════════════════════════════════

mod month_matching {
    use super::*;

    #[test]
    fn same_year_and_month() {
        let e = expense("x", 1.0, "Casa", at(2025, 3, 1, 0));
        assert!(aggregator::is_in_month(&e, &at(2025, 3, 31, 23)));
    }

    #[test]
    fn different_month_same_year() {
        let e = expense("x", 1.0, "Casa", at(2025, 2, 28, 23));
        assert!(!aggregator::is_in_month(&e, &at(2025, 3, 1, 0)));
    }

    #[test]
    fn same_month_different_year() {
        let e = expense("x", 1.0, "Casa", at(2024, 3, 10, 12));
        assert!(!aggregator::is_in_month(&e, &at(2025, 3, 10, 12)));
    }

    #[test]
    fn read_in_the_reference_time_zone() {
        // 23:30 UTC on March 31 is already April 1 at UTC+2.
        let e = expense("late", 1.0, "Casa", at(2025, 3, 31, 23));
        let e = Expense {
            created_at: e.created_at + chrono::Duration::minutes(30),
            ..e
        };
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let april = plus_two.with_ymd_and_hms(2025, 4, 10, 12, 0, 0).unwrap();
        let march_utc = at(2025, 3, 15, 12);

        assert!(aggregator::is_in_month(&e, &april));
        assert!(aggregator::is_in_month(&e, &march_utc));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Totals
// ═══════════════════════════════════════════════════════════════════

mod totals {
    use super::*;

    #[test]
    fn empty_ledger_totals_zero() {
        assert_eq!(aggregator::total_for_month(&[], &at(2025, 3, 1, 0)), 0.0);
        assert!(aggregator::totals_by_category_for_month(&[], &at(2025, 3, 1, 0)).is_empty());
    }

    #[test]
    fn total_counts_only_the_month() {
        let total = aggregator::total_for_month(&ledger(), &at(2025, 3, 15, 12));
        assert_eq!(total, 380.0);
    }

    #[test]
    fn no_match_totals_zero() {
        assert_eq!(aggregator::total_for_month(&ledger(), &at(2023, 1, 1, 0)), 0.0);
    }

    #[test]
    fn by_category_sums_and_omits_absent_categories() {
        let totals = aggregator::totals_by_category_for_month(&ledger(), &at(2025, 3, 15, 12));

        let mut expected = BTreeMap::new();
        expected.insert("Alimentação".to_string(), 200.0);
        expected.insert("Casa".to_string(), 150.0);
        expected.insert("Transporte".to_string(), 30.0);
        assert_eq!(totals, expected);
        assert!(!totals.contains_key("Saúde"));
        assert!(!totals.contains_key("Lazer"));
    }

    #[test]
    fn category_totals_sum_to_month_total() {
        let now = at(2025, 3, 15, 12);
        let by_category: f64 = aggregator::totals_by_category_for_month(&ledger(), &now)
            .values()
            .sum();
        assert_eq!(by_category, aggregator::total_for_month(&ledger(), &now));
    }

    #[test]
    fn free_text_category_gets_its_own_bucket() {
        let totals = aggregator::totals_by_category_for_month(&ledger(), &at(2024, 3, 1, 0));
        assert_eq!(totals.len(), 1);
        assert_eq!(totals["Lazer"], 40.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Breakdown / chart helpers
// ═══════════════════════════════════════════════════════════════════

mod breakdown {
    use super::*;

    #[test]
    fn largest_first_with_shares_and_colors() {
        let shares = aggregator::category_breakdown(&ledger(), &at(2025, 3, 15, 12));
        let names: Vec<&str> = shares.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(names, vec!["Alimentação", "Casa", "Transporte"]);

        let pct_sum: f64 = shares.iter().map(|s| s.share_pct).sum();
        assert!((pct_sum - 100.0).abs() < 1e-9);
        assert_eq!(shares[0].color, "#FF6384");
        assert_eq!(shares[2].color, "#4BC0C0");
    }

    #[test]
    fn unknown_category_uses_default_color() {
        let shares = aggregator::category_breakdown(&ledger(), &at(2024, 3, 1, 0));
        assert_eq!(shares[0].color, "#6c757d");
        assert_eq!(shares[0].share_pct, 100.0);
    }

    #[test]
    fn zero_total_gives_zero_shares() {
        let items = vec![expense("free", 0.0, "Casa", at(2025, 3, 1, 0))];
        let shares = aggregator::category_breakdown(&items, &at(2025, 3, 1, 0));
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].share_pct, 0.0);
    }

    #[test]
    fn has_spending() {
        let mut totals = BTreeMap::new();
        assert!(!aggregator::has_spending(&totals));
        totals.insert("Casa".to_string(), 0.0);
        assert!(!aggregator::has_spending(&totals));
        totals.insert("Compras".to_string(), 0.01);
        assert!(aggregator::has_spending(&totals));
    }

    #[test]
    fn recent_takes_the_head() {
        let items = ledger();
        let recent = aggregator::recent(&items, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].description, "Mercado");
        assert_eq!(aggregator::recent(&items, 50).len(), items.len());
        assert!(aggregator::recent(&items, 0).is_empty());
    }
}
