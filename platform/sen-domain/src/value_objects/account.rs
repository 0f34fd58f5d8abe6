use serde::{Deserialize, Serialize};

/// Point-in-time view of the trading account. Drawdown is a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub balance: f64,
    pub equity: f64,
    pub margin_used: f64,
    pub margin_free: f64,
    pub drawdown: f64,
}

impl Account {
    pub fn new(balance: f64, equity: f64) -> Self {
        Self {
            balance,
            equity,
            margin_used: 0.0,
            margin_free: 0.0,
            drawdown: 0.0,
        }
    }
}
