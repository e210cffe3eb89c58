use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single recorded expense.
///
/// Records are immutable once created: `date` and `created_at` are stamped
/// from the current instant by the ledger store, never by the caller.
/// Field names on disk follow the persisted slot layout (`descricao`,
/// `valor`, `categoria`, `data`, `criadoEm`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Stable identifier generated at creation time
    pub id: Uuid,

    /// Free-form, user-supplied description
    #[serde(rename = "descricao")]
    pub description: String,

    /// Amount spent (positive at creation; enforced by callers)
    #[serde(rename = "valor")]
    pub amount: f64,

    /// Category label (one of [`Category`](super::category::Category) or free text)
    #[serde(rename = "categoria")]
    pub category: String,

    /// UTC calendar date of `created_at`
    #[serde(rename = "data")]
    pub date: NaiveDate,

    /// Full-precision creation timestamp
    #[serde(rename = "criadoEm")]
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Stamp a new expense from caller-supplied fields at the given instant.
    pub fn stamp(new: NewExpense, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: new.description,
            amount: new.amount,
            category: new.category,
            date: now.date_naive(),
            created_at: now,
        }
    }
}

/// The caller-supplied part of an expense (everything except the id and
/// the date fields).
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub category: String,
}

impl NewExpense {
    pub fn new(description: impl Into<String>, amount: f64, category: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            amount,
            category: category.into(),
        }
    }
}
