use crate::config::Config;
use sen_domain::value_objects::timeframe::Timeframe;
use std::time::Duration;

/// Settings in effect for the running session.
///
/// Built from the config at startup and replaced when the settings screen is
/// saved. Never written back to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub max_trades: u32,
    pub max_loss_percent: f64,
    pub default_balance: f64,
    pub server: String,
    pub login: String,
    pub refresh_interval: Duration,
    pub default_timeframe: Timeframe,
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Result<Self, String> {
        config.validate()?;
        let default_timeframe = Timeframe::parse(&config.display.default_timeframe)?;
        Ok(Self {
            max_trades: config.trading.max_trades,
            max_loss_percent: config.trading.max_loss_percent,
            default_balance: config.trading.default_balance,
            server: config.connection.server.clone(),
            login: config.connection.login.clone(),
            refresh_interval: Duration::from_millis(config.display.refresh_interval_ms),
            default_timeframe,
        })
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_trades: 5,
            max_loss_percent: 3.0,
            default_balance: 1215.0,
            server: crate::config::DEFAULT_SERVER.to_string(),
            login: String::new(),
            refresh_interval: Duration::from_millis(crate::config::DEFAULT_REFRESH_INTERVAL_MS),
            default_timeframe: Timeframe::M5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SessionSettings;
    use crate::config::Config;
    use sen_domain::value_objects::timeframe::Timeframe;
    use std::time::Duration;

    #[test]
    fn default_config_matches_default_session() {
        let settings = SessionSettings::from_config(&Config::default()).expect("settings");
        assert_eq!(settings, SessionSettings::default());
    }

    #[test]
    fn from_config_parses_display_section() {
        let mut config = Config::default();
        config.display.refresh_interval_ms = 250;
        config.display.default_timeframe = "h1".to_string();
        let settings = SessionSettings::from_config(&config).expect("settings");
        assert_eq!(settings.refresh_interval, Duration::from_millis(250));
        assert_eq!(settings.default_timeframe, Timeframe::H1);
    }
}
