use sen_application::config::{load_config, Config};
use sen_application::data::share;
use sen_application::navigation::NavigationController;
use sen_application::settings::SessionSettings;
use sen_domain::value_objects::account::Account;
use sen_infrastructure::sample_data::{InMemoryTradingData, SampleDataOptions};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "SEN_CONFIG";

/// `--config` wins over `SEN_CONFIG`; blank values count as unset.
pub fn resolve_config_path(cli: Option<PathBuf>) -> Option<PathBuf> {
    cli.or_else(|| {
        std::env::var(CONFIG_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    })
}

/// Loads the config file if one was given, otherwise returns the built-in
/// defaults.
pub fn load_startup_config(path: Option<&Path>) -> Result<Config, String> {
    match path {
        Some(path) => {
            let config = load_config(path)?;
            tracing::info!(path = %path.display(), "config loaded");
            Ok(config)
        }
        None => {
            tracing::info!("no config given, using defaults");
            Ok(Config::default())
        }
    }
}

/// Builds the sample provider and a controller with nothing mounted yet.
pub fn build_controller(
    config: &Config,
    seed: Option<u64>,
) -> Result<NavigationController, String> {
    let settings = SessionSettings::from_config(config)?;
    let provider = InMemoryTradingData::sample(SampleDataOptions {
        seed,
        account: Account::new(config.trading.default_balance, config.trading.default_equity),
        ..SampleDataOptions::default()
    });
    Ok(NavigationController::new(share(provider), settings))
}

#[cfg(test)]
mod tests {
    use super::{build_controller, load_startup_config};
    use sen_application::config::Config;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn missing_path_uses_defaults() {
        assert_eq!(load_startup_config(None).unwrap(), Config::default());
    }

    #[test]
    fn unreadable_path_is_an_error() {
        let err = load_startup_config(Some(std::path::Path::new(
            "/nonexistent/sen-terminal.toml",
        )))
        .unwrap_err();
        assert!(err.contains("sen-terminal.toml"), "{err}");
    }

    #[test]
    fn config_file_drives_controller_settings() {
        let path = std::env::temp_dir().join(format!(
            "sen_terminal_bootstrap_{}.toml",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[display]\nrefresh_interval_ms = 750\n").unwrap();
        drop(file);

        let config = load_startup_config(Some(&path)).unwrap();
        let _ = std::fs::remove_file(&path);
        let nav = build_controller(&config, Some(1)).unwrap();
        assert_eq!(
            nav.session_settings().refresh_interval,
            Duration::from_millis(750)
        );
    }
}
