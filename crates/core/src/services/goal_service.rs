use serde_json::Value;

use crate::errors::CoreError;
use crate::models::goals::{GoalProgress, Goals, SavingsArea, SavingsSuggestion};
use crate::models::short_id;
use crate::storage::codec::coerce_amount;
use crate::storage::kv::SharedStore;

/// Fixed savings suggestions: (text, share of the month total).
const SUGGESTIONS: [(&str, f64); 3] = [
    ("Reduzir transporte em 10%", 0.10),
    ("Diminuir refeições fora em 15%", 0.15),
    ("Rever assinaturas e serviços", 0.05),
];

/// Areas where part of the month's spending could be saved.
const SAVINGS_AREAS: [(&str, f64); 3] = [
    ("Transporte", 0.10),
    ("Refeições fora", 0.15),
    ("Assinaturas", 0.05),
];

/// Monthly spending goal, savings goal, and the suggestions built on them.
///
/// Each goal lives in its own slot as a plain number string.
pub struct GoalService {
    storage: SharedStore,
    monthly_key: String,
    savings_key: String,
}

impl GoalService {
    pub fn new(
        storage: SharedStore,
        monthly_key: impl Into<String>,
        savings_key: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            monthly_key: monthly_key.into(),
            savings_key: savings_key.into(),
        }
    }

    #[must_use]
    pub fn goals(&self) -> Goals {
        Goals {
            monthly_goal: self.monthly_goal(),
            savings_goal: self.savings_goal(),
        }
    }

    #[must_use]
    pub fn monthly_goal(&self) -> f64 {
        self.read_number(&self.monthly_key)
    }

    #[must_use]
    pub fn savings_goal(&self) -> f64 {
        self.read_number(&self.savings_key)
    }

    pub fn set_monthly_goal(&self, value: f64) -> Result<(), CoreError> {
        self.write_number(&self.monthly_key, value)
    }

    pub fn set_savings_goal(&self, value: f64) -> Result<(), CoreError> {
        self.write_number(&self.savings_key, value)
    }

    /// Apply (or un-apply) a suggestion.
    ///
    /// Applying lowers the monthly goal by the suggestion's impact, never
    /// below zero. Un-applying only clears the flag. Returns the monthly
    /// goal afterwards.
    pub fn apply_suggestion(&self, suggestion: &mut SavingsSuggestion) -> Result<f64, CoreError> {
        if suggestion.applied {
            suggestion.applied = false;
            return Ok(self.monthly_goal());
        }

        let mut goal = self.monthly_goal();
        if suggestion.impact > 0.0 {
            goal = (goal - suggestion.impact).max(0.0);
            self.set_monthly_goal(goal)?;
        }
        suggestion.applied = true;
        Ok(goal)
    }

    /// Month spending measured against the monthly goal.
    #[must_use]
    pub fn progress(spent: f64, goal: f64) -> GoalProgress {
        let divisor = if goal != 0.0 { goal } else { 1.0 };
        let ratio = clamp01(spent / divisor);

        let remaining_pct = if goal > 0.0 {
            let pct = ((goal - spent) / goal * 100.0).round();
            if pct.is_finite() && pct > 0.0 {
                pct as u32
            } else {
                0
            }
        } else {
            0
        };

        GoalProgress {
            spent,
            goal,
            ratio,
            remaining_pct,
            reached: goal > 0.0 && spent >= goal,
        }
    }

    /// The three standard suggestions, with impacts rounded from the month total.
    #[must_use]
    pub fn suggestions(month_total: f64) -> Vec<SavingsSuggestion> {
        let total = month_total.max(0.0);
        SUGGESTIONS
            .iter()
            .map(|(text, share)| SavingsSuggestion {
                id: short_id(),
                text: (*text).to_string(),
                impact: (total * share).round(),
                applied: false,
            })
            .collect()
    }

    #[must_use]
    pub fn savings_areas(month_total: f64) -> Vec<SavingsArea> {
        SAVINGS_AREAS
            .iter()
            .map(|(name, share)| SavingsArea {
                name: (*name).to_string(),
                value: month_total * share,
            })
            .collect()
    }

    fn read_number(&self, key: &str) -> f64 {
        match self.storage.get(key) {
            Ok(Some(raw)) => coerce_amount(&Value::String(raw)),
            Ok(None) => 0.0,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cannot read goal, using 0");
                0.0
            }
        }
    }

    fn write_number(&self, key: &str, value: f64) -> Result<(), CoreError> {
        if !value.is_finite() || value < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Goal must be a non-negative number, got {value}"
            )));
        }
        self.storage.set(key, &value.to_string())?;
        tracing::debug!(key = %key, value, "goal saved");
        Ok(())
    }
}

/// Clamp to [0, 1]; non-finite input gives 0.
pub fn clamp01(v: f64) -> f64 {
    if !v.is_finite() {
        return 0.0;
    }
    v.clamp(0.0, 1.0)
}
