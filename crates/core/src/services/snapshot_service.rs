use chrono::Utc;

use crate::errors::CoreError;
use crate::models::family::FamilyMember;
use crate::models::short_id;
use crate::models::snapshot::FinanceSnapshot;
use crate::storage::codec::decode_lenient_list;
use crate::storage::kv::SharedStore;

/// Saved finance snapshots, newest first.
pub struct SnapshotService {
    storage: SharedStore,
    key: String,
}

impl SnapshotService {
    pub fn new(storage: SharedStore, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Record a snapshot of the given figures and prepend it to the list.
    pub fn save(
        &self,
        month_total: f64,
        family: &[FamilyMember],
        monthly_goal: f64,
    ) -> Result<FinanceSnapshot, CoreError> {
        let snapshot = FinanceSnapshot {
            id: short_id(),
            taken_at: Utc::now(),
            month_total,
            family: family.to_vec(),
            monthly_goal,
        };

        let mut all = self.list();
        all.insert(0, snapshot.clone());
        let json = serde_json::to_string(&all)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize snapshots: {e}")))?;
        self.storage.set(&self.key, &json)?;
        tracing::debug!(id = %snapshot.id, total = all.len(), "finance snapshot saved");
        Ok(snapshot)
    }

    /// All snapshots, newest first. A missing or corrupt slot reads as empty.
    #[must_use]
    pub fn list(&self) -> Vec<FinanceSnapshot> {
        match self.storage.get(&self.key) {
            Ok(Some(raw)) => decode_lenient_list(&raw).unwrap_or_else(|e| {
                tracing::warn!(key = %self.key, error = %e, "corrupt snapshot slot, treating as empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "cannot read snapshot slot");
                Vec::new()
            }
        }
    }
}
