// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use family_finance_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn persistence_unavailable() {
        let err = CoreError::PersistenceUnavailable("disk full".into());
        assert_eq!(err.to_string(), "Persistence unavailable: disk full");
    }

    #[test]
    fn serialization() {
        let err = CoreError::Serialization("bad float".into());
        assert_eq!(err.to_string(), "Serialization error: bad float");
    }

    #[test]
    fn deserialization() {
        let err = CoreError::Deserialization("unexpected EOF".into());
        assert_eq!(err.to_string(), "Deserialization error: unexpected EOF");
    }

    #[test]
    fn file_io() {
        let err = CoreError::FileIO("permission denied".into());
        assert_eq!(err.to_string(), "File I/O error: permission denied");
    }

    #[test]
    fn database() {
        let err = CoreError::Database("no such table: gastos".into());
        assert_eq!(err.to_string(), "Database error: no such table: gastos");
    }

    #[test]
    fn validation() {
        let err = CoreError::ValidationError("amount must be positive".into());
        assert_eq!(err.to_string(), "Validation failed: amount must be positive");
    }

    #[test]
    fn validation_empty_message() {
        let err = CoreError::ValidationError(String::new());
        assert_eq!(err.to_string(), "Validation failed: ");
    }

    #[test]
    fn expense_not_found() {
        let err = CoreError::ExpenseNotFound("abc".into());
        assert_eq!(err.to_string(), "Expense not found: abc");
    }

    #[test]
    fn member_not_found() {
        let err = CoreError::MemberNotFound("m1".into());
        assert_eq!(err.to_string(), "Family member not found: m1");
    }

    #[test]
    fn suggestion_not_found() {
        let err = CoreError::SuggestionNotFound("s1".into());
        assert_eq!(err.to_string(), "Suggestion not found: s1");
    }

    #[test]
    fn account_exists() {
        let err = CoreError::AccountExists("ana".into());
        assert_eq!(err.to_string(), "Account already exists: ana");
    }

    #[test]
    fn credentials() {
        let err = CoreError::Credentials("salt too short".into());
        assert_eq!(err.to_string(), "Credential error: salt too short");
    }

    #[test]
    fn unicode_message() {
        let err = CoreError::ValidationError("descrição vazia".into());
        assert_eq!(err.to_string(), "Validation failed: descrição vazia");
    }
}

// ── From impls ──────────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::FileIO(ref m) if m.contains("missing")));
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn from_rusqlite_error() {
        let err: CoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, CoreError::Database(_)));
    }

    #[test]
    fn from_password_hash_error() {
        let err: CoreError = argon2::password_hash::Error::Password.into();
        assert!(matches!(err, CoreError::Credentials(_)));
    }

    #[test]
    fn question_mark_propagation() {
        fn parse(raw: &str) -> Result<serde_json::Value, CoreError> {
            Ok(serde_json::from_str(raw)?)
        }
        assert!(parse("[1,2]").is_ok());
        assert!(matches!(parse("[1,"), Err(CoreError::Deserialization(_))));
    }
}

// ── Debug / std::error::Error ───────────────────────────────────────

mod traits {
    use super::*;

    #[test]
    fn implements_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&CoreError::ExpenseNotFound("x".into()));
    }

    #[test]
    fn debug_names_variant() {
        let err = CoreError::PersistenceUnavailable("x".into());
        assert!(format!("{err:?}").contains("PersistenceUnavailable"));
    }
}
