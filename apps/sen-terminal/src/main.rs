use clap::Parser;
use sen_application::views::ViewKind;
use sen_terminal::bootstrap::{load_startup_config, resolve_config_path};
use sen_terminal::headless::HeadlessArgs;
use sen_terminal::{logging, TuiOpts};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "sen-terminal")]
#[command(about = "SEN Trading System dashboard (TUI) + headless snapshot runner.", version)]
struct Cli {
    /// Config file path (TOML). If omitted, uses env SEN_CONFIG, then built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Screen shown at startup: main | strategy | settings
    #[arg(long, default_value = "main", value_parser = ViewKind::parse)]
    screen: ViewKind,

    /// Seed for the sample profit history.
    #[arg(long)]
    seed: Option<u64>,

    /// Run without TUI, print a JSON snapshot of the dashboard and exit.
    #[arg(long)]
    headless: bool,

    /// Refresh intervals to simulate before the snapshot (headless only).
    #[arg(long, default_value_t = 3)]
    cycles: u32,
}

fn main() {
    let cli = Cli::parse();

    let log_store = Arc::new(parking_lot::Mutex::new(logging::LogStore::new(
        logging::DEFAULT_MAX_LINES,
    )));
    let tracing_result = if cli.headless {
        init_tracing_stderr()
    } else {
        init_tracing(log_store.clone())
    };
    if let Err(err) = tracing_result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    if let Err(err) = init_metrics() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    let config_path = resolve_config_path(cli.config);
    let config = match load_startup_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    if cli.headless {
        let result = sen_terminal::headless::run_headless(HeadlessArgs {
            config,
            seed: cli.seed,
            cycles: cli.cycles,
        });
        match result {
            Ok(json) => {
                println!(
                    "{}",
                    serde_json::to_string(&json)
                        .unwrap_or_else(|_| "{\"status\":\"error\",\"error\":\"json\"}".to_string())
                );
                std::process::exit(0);
            }
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
    }

    let opts = TuiOpts {
        config,
        initial_screen: cli.screen,
        seed: cli.seed,
        log_store,
    };

    if let Err(err) = sen_terminal::run(opts) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn log_filter() -> Result<tracing_subscriber::EnvFilter, String> {
    let filter = std::env::var("SEN_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| format!("invalid log filter: {err}"))
}

fn init_tracing(log_store: logging::SharedLogStore) -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter()?)
        .with_writer(logging::LogMakeWriter::new(log_store))
        .with_ansi(false)
        .init();
    Ok(())
}

fn init_tracing_stderr() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter()?)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[cfg(feature = "prometheus")]
fn init_metrics() -> Result<Option<SocketAddr>, String> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let Some(raw) = std::env::var("SEN_METRICS_ADDR").ok() else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let addr: SocketAddr = raw
        .parse()
        .map_err(|err| format!("invalid SEN_METRICS_ADDR (expected host:port): {err}"))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|err| format!("failed to install prometheus exporter: {err}"))?;

    tracing::info!(metrics_addr = %addr, "prometheus metrics exporter enabled");
    Ok(Some(addr))
}

#[cfg(not(feature = "prometheus"))]
fn init_metrics() -> Result<Option<SocketAddr>, String> {
    Ok(None)
}
