// ═══════════════════════════════════════════════════════════════════
// Model Tests — categories, expenses, family members, settings,
// pt-BR formatting
// ═══════════════════════════════════════════════════════════════════

use chrono::{TimeZone, Utc};
use serde_json::json;
use tempfile::TempDir;

use family_finance_core::format::{format_brl, month_name_pt};
use family_finance_core::models::category::{category_color, Category, DEFAULT_CATEGORY_COLOR};
use family_finance_core::models::expense::{Expense, NewExpense};
use family_finance_core::models::family::FamilyMember;
use family_finance_core::models::settings::{KdfParams, Settings};
use family_finance_core::models::snapshot::FinanceSnapshot;

// ═══════════════════════════════════════════════════════════════════
// Category
// ═══════════════════════════════════════════════════════════════════

mod category {
    use super::*;

    #[test]
    fn food_color() {
        assert_eq!(category_color("Alimentação"), "#FF6384");
    }

    #[test]
    fn every_known_category_has_a_distinct_color() {
        let mut colors: Vec<&str> = Category::ALL.iter().map(|c| c.color()).collect();
        colors.sort_unstable();
        colors.dedup();
        assert_eq!(colors.len(), Category::ALL.len());
        assert!(!colors.contains(&DEFAULT_CATEGORY_COLOR));
    }

    #[test]
    fn unknown_category_gets_default_every_time() {
        assert_eq!(category_color("NonexistentCategory"), DEFAULT_CATEGORY_COLOR);
        assert_eq!(category_color("NonexistentCategory"), category_color("NonexistentCategory"));
        assert_eq!(category_color(""), DEFAULT_CATEGORY_COLOR);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(category_color("casa"), DEFAULT_CATEGORY_COLOR);
        assert_eq!(category_color("Casa"), "#36A2EB");
    }

    #[test]
    fn labels_round_trip_through_from_label() {
        for c in Category::ALL {
            assert_eq!(Category::from_label(c.label()), Some(c));
            assert_eq!(c.to_string(), c.label());
        }
        assert_eq!(Category::from_label("Lazer"), None);
    }

    #[test]
    fn fixed_palette() {
        assert_eq!(Category::Casa.color(), "#36A2EB");
        assert_eq!(Category::Compras.color(), "#FFCE56");
        assert_eq!(Category::Transporte.color(), "#4BC0C0");
        assert_eq!(Category::Saude.color(), "#9966FF");
        assert_eq!(Category::Outros.color(), "#FF9F40");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Expense
// ═══════════════════════════════════════════════════════════════════

mod expense {
    use super::*;

    #[test]
    fn stamp_sets_id_and_dates() {
        let now = Utc.with_ymd_and_hms(2025, 10, 19, 23, 59, 59).unwrap();
        let e = Expense::stamp(NewExpense::new("Padaria", 12.5, "Alimentação"), now);
        assert!(!e.id.is_nil());
        assert_eq!(e.created_at, now);
        assert_eq!(e.date.to_string(), "2025-10-19");
        assert_eq!(e.description, "Padaria");
    }

    #[test]
    fn each_stamp_gets_a_new_id() {
        let now = Utc::now();
        let a = Expense::stamp(NewExpense::new("x", 1.0, "Casa"), now);
        let b = Expense::stamp(NewExpense::new("x", 1.0, "Casa"), now);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn serializes_with_slot_field_names() {
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let e = Expense::stamp(NewExpense::new("Luz", 50.0, "Casa"), now);
        let value = serde_json::to_value(&e).unwrap();
        for field in ["id", "descricao", "valor", "categoria", "data", "criadoEm"] {
            assert!(value.get(field).is_some(), "missing {field}");
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// FamilyMember / FinanceSnapshot
// ═══════════════════════════════════════════════════════════════════

mod family {
    use super::*;

    #[test]
    fn new_member_gets_short_id() {
        let m = FamilyMember::new("Ana", "Cônjuge", 300.0);
        assert_eq!(m.id.len(), 8);
        assert_ne!(m.id, FamilyMember::new("Ana", "Cônjuge", 300.0).id);
    }

    #[test]
    fn stored_spend_is_coerced() {
        let m: FamilyMember =
            serde_json::from_value(json!({ "id": "a", "nome": "Ana", "tipo": "Filho", "gasto": "45.5" }))
                .unwrap();
        assert_eq!(m.spent, 45.5);

        let m: FamilyMember =
            serde_json::from_value(json!({ "id": "b", "nome": "Bia", "tipo": "Filho" })).unwrap();
        assert_eq!(m.spent, 0.0);
    }

    #[test]
    fn effective_spent_ignores_non_finite() {
        let m = FamilyMember::new("x", "Pai", f64::NAN);
        assert_eq!(m.effective_spent(), 0.0);
    }

    #[test]
    fn snapshot_uses_slot_names_and_lenient_amounts() {
        let s: FinanceSnapshot = serde_json::from_value(json!({
            "id": "s1",
            "data": "2025-06-01T12:00:00Z",
            "totalMes": "1200",
            "meta": 1500
        }))
        .unwrap();
        assert_eq!(s.month_total, 1200.0);
        assert_eq!(s.monthly_goal, 1500.0);
        assert!(s.family.is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.keys.expenses, "meus_gastos_v1");
        assert_eq!(s.keys.monthly_goal, "meta_mensal_v1");
        assert_eq!(s.recent_limit, 5);
        assert!(!s.mirror.enabled);
        assert_eq!(s.kdf, KdfParams::default());
        assert!(s.data_dir.is_none());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let s = Settings::load_from_file(dir.path().join("absent.json")).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "recent_limit": 10, "keys": { "expenses": "custom" } }"#).unwrap();

        let s = Settings::load_from_file(&path).unwrap();
        assert_eq!(s.recent_limit, 10);
        assert_eq!(s.keys.expenses, "custom");
        assert_eq!(s.keys.family, "familia_financas_v1");
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("conf").join("settings.json");
        let mut s = Settings::default();
        s.data_dir = Some(dir.path().join("data"));
        s.mirror.enabled = true;
        s.save_to_file(&path).unwrap();

        assert_eq!(Settings::load_from_file(&path).unwrap(), s);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert!(Settings::load_from_file(&path).is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Formatting
// ═══════════════════════════════════════════════════════════════════

mod formatting {
    use super::*;

    #[test]
    fn brl_basic() {
        assert_eq!(format_brl(5.5), "R$ 5,50");
        assert_eq!(format_brl(0.0), "R$ 0,00");
    }

    #[test]
    fn brl_groups_thousands() {
        assert_eq!(format_brl(1234.56), "R$ 1.234,56");
        assert_eq!(format_brl(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(format_brl(999.999), "R$ 1.000,00");
    }

    #[test]
    fn brl_negative_and_non_finite() {
        assert_eq!(format_brl(-5.0), "-R$ 5,00");
        assert_eq!(format_brl(-0.001), "R$ 0,00");
        assert_eq!(format_brl(f64::NAN), "R$ 0,00");
    }

    #[test]
    fn month_names() {
        assert_eq!(month_name_pt(1), Some("janeiro"));
        assert_eq!(month_name_pt(3), Some("março"));
        assert_eq!(month_name_pt(12), Some("dezembro"));
        assert_eq!(month_name_pt(0), None);
        assert_eq!(month_name_pt(13), None);
    }
}
