use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::family::FamilyMember;

/// A saved picture of the household finances at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceSnapshot {
    pub id: String,

    /// When the snapshot was taken
    #[serde(rename = "data")]
    pub taken_at: DateTime<Utc>,

    /// Ledger total for the month the snapshot was taken in
    #[serde(
        rename = "totalMes",
        default,
        deserialize_with = "crate::storage::codec::deserialize_lenient_amount"
    )]
    pub month_total: f64,

    /// Copy of the family list at that time
    #[serde(rename = "familia", default)]
    pub family: Vec<FamilyMember>,

    /// Monthly spending goal at that time
    #[serde(
        rename = "meta",
        default,
        deserialize_with = "crate::storage::codec::deserialize_lenient_amount"
    )]
    pub monthly_goal: f64,
}
