use crate::errors::CoreError;
use crate::models::family::FamilyMember;
use crate::storage::codec::decode_lenient_list;
use crate::storage::kv::SharedStore;

/// The household member list and its spending totals.
pub struct FamilyService {
    storage: SharedStore,
    key: String,
}

impl FamilyService {
    pub fn new(storage: SharedStore, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// All members in insertion order. A missing or corrupt slot reads as empty.
    #[must_use]
    pub fn members(&self) -> Vec<FamilyMember> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "cannot read family slot");
                return Vec::new();
            }
        };
        decode_lenient_list(&raw).unwrap_or_else(|e| {
            tracing::warn!(key = %self.key, error = %e, "corrupt family slot, treating as empty");
            Vec::new()
        })
    }

    /// Add a member after checking the name, kind and spend.
    pub fn add_member(
        &self,
        name: &str,
        kind: &str,
        spent: f64,
    ) -> Result<FamilyMember, CoreError> {
        let name = name.trim();
        let kind = kind.trim();
        if name.is_empty() {
            return Err(CoreError::ValidationError("Member name must not be empty".into()));
        }
        if kind.is_empty() {
            return Err(CoreError::ValidationError("Member kind must not be empty".into()));
        }
        if !spent.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "Member spend must be a number, got {spent}"
            )));
        }

        let member = FamilyMember::new(name, kind, spent);
        let mut members = self.members();
        members.push(member.clone());
        self.save(&members)?;
        tracing::debug!(id = %member.id, "family member added");
        Ok(member)
    }

    pub fn remove_member(&self, id: &str) -> Result<FamilyMember, CoreError> {
        let mut members = self.members();
        let idx = members
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| CoreError::MemberNotFound(id.to_string()))?;
        let removed = members.remove(idx);
        self.save(&members)?;
        tracing::debug!(id = %removed.id, "family member removed");
        Ok(removed)
    }

    /// Sum of every member's spend.
    #[must_use]
    pub fn total(members: &[FamilyMember]) -> f64 {
        members.iter().map(FamilyMember::effective_spent).sum()
    }

    /// The member with the greatest spend, measured against a zero baseline;
    /// on ties the later member wins. `None` when the list is empty or every
    /// spend is negative.
    #[must_use]
    pub fn top_spender(members: &[FamilyMember]) -> Option<&FamilyMember> {
        members
            .iter()
            .fold((None, 0.0), |(best, top), m| {
                let spent = m.effective_spent();
                if top > spent {
                    (best, top)
                } else {
                    (Some(m), spent)
                }
            })
            .0
    }

    fn save(&self, members: &[FamilyMember]) -> Result<(), CoreError> {
        let json = serde_json::to_string(members)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize family: {e}")))?;
        self.storage.set(&self.key, &json)
    }
}
