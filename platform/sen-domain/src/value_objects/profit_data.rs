use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitData {
    pub timestamp: DateTime<Utc>,
    /// Profit or loss booked during the period ending at `timestamp`.
    pub profit: f64,
    pub cumulative_profit: f64,
}
