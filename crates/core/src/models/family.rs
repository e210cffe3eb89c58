use serde::{Deserialize, Serialize};

/// Member kinds offered when adding a relative. Free text is also accepted.
pub const KNOWN_MEMBER_KINDS: [&str; 4] = ["Cônjuge", "Filho", "Pai", "Mãe"];

/// A family member and how much they spend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub id: String,

    #[serde(rename = "nome")]
    pub name: String,

    /// Relationship (e.g., "Cônjuge", "Filho")
    #[serde(rename = "tipo")]
    pub kind: String,

    /// Declared spend for this member
    #[serde(
        rename = "gasto",
        default,
        deserialize_with = "crate::storage::codec::deserialize_lenient_amount"
    )]
    pub spent: f64,
}

impl FamilyMember {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, spent: f64) -> Self {
        Self {
            id: super::short_id(),
            name: name.into(),
            kind: kind.into(),
            spent,
        }
    }

    /// Spend as used in totals: non-finite values count as zero.
    pub fn effective_spent(&self) -> f64 {
        if self.spent.is_finite() {
            self.spent
        } else {
            0.0
        }
    }
}
