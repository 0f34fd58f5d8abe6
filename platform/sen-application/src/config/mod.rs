use sen_domain::value_objects::timeframe::Timeframe;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_TITLE: &str = "SEN TRADING SYSTEM";
pub const DEFAULT_VERSION: &str = "1.0.0";
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_TIMEFRAME: &str = "M5";
pub const DEFAULT_SERVER: &str = "MetaQuotes-Demo";

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub app: AppConfig,
    pub trading: TradingConfig,
    pub display: DisplayConfig,
    pub connection: ConnectionConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    pub title: String,
    pub version: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            version: DEFAULT_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct TradingConfig {
    pub default_balance: f64,
    pub default_equity: f64,
    pub max_trades: u32,
    pub max_loss_percent: f64,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            default_balance: 1215.0,
            default_equity: 345.0,
            max_trades: 5,
            max_loss_percent: 3.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct DisplayConfig {
    pub refresh_interval_ms: u64,
    /// Presentation label only; nothing enforces it on strategies.
    pub default_timeframe: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            default_timeframe: DEFAULT_TIMEFRAME.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ConnectionConfig {
    pub server: String,
    pub login: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            login: String::new(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        if self.display.refresh_interval_ms == 0 {
            return Err("display.refresh_interval_ms must be > 0".to_string());
        }
        Timeframe::parse(&self.display.default_timeframe)
            .map_err(|err| format!("display.default_timeframe: {err}"))?;
        if !self.trading.max_loss_percent.is_finite()
            || !(0.0..=100.0).contains(&self.trading.max_loss_percent)
        {
            return Err("trading.max_loss_percent must be within 0..=100".to_string());
        }
        for (name, value) in [
            ("trading.default_balance", self.trading.default_balance),
            ("trading.default_equity", self.trading.default_equity),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be a finite value >= 0"));
            }
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config, String> {
    let (config, _source) = load_config_with_source(path)?;
    Ok(config)
}

pub fn load_config_with_source(path: &Path) -> Result<(Config, String), String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {}", path.display(), err))?;
    let config = parse_config(&contents)
        .map_err(|err| format!("failed to load config {}: {}", path.display(), err))?;
    Ok((config, contents))
}

pub fn parse_config(contents: &str) -> Result<Config, String> {
    let config: Config =
        toml::from_str(contents).map_err(|err| format!("failed to parse TOML: {err}"))?;
    config.validate()?;
    Ok(config)
}

pub fn to_toml_pretty(config: &Config) -> Result<String, String> {
    toml::to_string_pretty(config)
        .map_err(|err| format!("failed to serialize config as TOML: {err}"))
}
