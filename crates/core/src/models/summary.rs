use serde::Serialize;

/// One slice of the monthly category chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub total: f64,

    /// Share of the month total, in percent (0 when the month total is 0)
    pub share_pct: f64,

    pub color: &'static str,
}
