use serde::{Deserialize, Serialize};

/// Chart periods offered by the terminal. Labels follow the MT5 convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    M1,
    M5,
    M15,
    M30,
    H1,
    H4,
    D1,
}

impl Timeframe {
    pub const ALL: [Timeframe; 7] = [
        Timeframe::M1,
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::M30,
        Timeframe::H1,
        Timeframe::H4,
        Timeframe::D1,
    ];

    pub fn parse(value: &str) -> Result<Self, String> {
        let normalized = value.trim().to_uppercase();
        let timeframe = match normalized.as_str() {
            "M1" | "1M" | "1MIN" => Timeframe::M1,
            "M5" | "5M" | "5MIN" => Timeframe::M5,
            "M15" | "15M" | "15MIN" => Timeframe::M15,
            "M30" | "30M" | "30MIN" => Timeframe::M30,
            "H1" | "1H" | "1HOUR" => Timeframe::H1,
            "H4" | "4H" | "4HOUR" => Timeframe::H4,
            "D1" | "1D" | "1DAY" => Timeframe::D1,
            _ => return Err(format!("unsupported timeframe: {value}")),
        };
        Ok(timeframe)
    }

    pub fn label(self) -> &'static str {
        match self {
            Timeframe::M1 => "M1",
            Timeframe::M5 => "M5",
            Timeframe::M15 => "M15",
            Timeframe::M30 => "M30",
            Timeframe::H1 => "H1",
            Timeframe::H4 => "H4",
            Timeframe::D1 => "D1",
        }
    }

    pub fn next(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|tf| *tf == self)
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
