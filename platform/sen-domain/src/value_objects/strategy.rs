use crate::value_objects::timeframe::Timeframe;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StrategyStatus {
    Active,
    Inactive,
    Paused,
}

impl StrategyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyStatus::Active => "ACTIVE",
            StrategyStatus::Inactive => "INACTIVE",
            StrategyStatus::Paused => "PAUSED",
        }
    }
}

impl std::fmt::Display for StrategyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub timeframe: Timeframe,
    pub status: StrategyStatus,
    pub profit: f64,
    pub trades_count: u32,
}

#[cfg(test)]
mod tests {
    use super::StrategyStatus;

    #[test]
    fn status_serializes_uppercase() {
        let json = serde_json::to_string(&StrategyStatus::Active).unwrap();
        assert_eq!(json, "\"ACTIVE\"");
    }
}
