use serde::{Deserialize, Serialize};

/// The two user goals: a monthly spending ceiling and a savings target.
/// Zero means "not set".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Goals {
    pub monthly_goal: f64,
    pub savings_goal: f64,
}

/// Month spending measured against the monthly goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub spent: f64,
    pub goal: f64,

    /// spent / goal, clamped to [0, 1]; 0 when not computable
    pub ratio: f64,

    /// Percentage of the goal still available, rounded, never negative
    pub remaining_pct: u32,

    /// True once spending has met or exceeded the goal
    pub reached: bool,
}

/// A one-tap suggestion that lowers the monthly goal by `impact`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsSuggestion {
    pub id: String,
    pub text: String,
    pub impact: f64,
    pub applied: bool,
}

/// An area where part of the month's spending could be saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsArea {
    pub name: String,
    pub value: f64,
}
