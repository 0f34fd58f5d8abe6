use crate::bootstrap::build_controller;
use sen_application::config::Config;
use sen_application::views::{ActiveView, ViewKind};
use serde_json::json;
use std::time::Duration;

pub struct HeadlessArgs {
    pub config: Config,
    pub seed: Option<u64>,
    /// Refresh intervals to run after the initial mount.
    pub cycles: u32,
}

/// Mounts the dashboard, runs it for `cycles` intervals of virtual time and
/// returns what it would have drawn.
pub fn run_headless(args: HeadlessArgs) -> Result<serde_json::Value, String> {
    let mut nav = build_controller(&args.config, args.seed)?;
    nav.show(ViewKind::Main);

    let interval = nav.session_settings().refresh_interval;
    let mut delivered = 0;
    for cycle in 1..=args.cycles {
        let at = interval
            .checked_mul(cycle)
            .ok_or_else(|| format!("--cycles {} overflows the session clock", args.cycles))?;
        delivered += nav.advance_to(at);
    }

    let snapshot = {
        let Some(ActiveView::Main(view)) = nav.active() else {
            return Err("dashboard is not mounted".to_string());
        };
        let widgets = view
            .widgets()
            .ok_or_else(|| "dashboard has no widgets".to_string())?;
        let bars: Vec<_> = widgets
            .profit_chart
            .bars
            .iter()
            .map(|bar| json!({ "label": bar.label, "profit": bar.profit }))
            .collect();
        let summary = widgets.profit_chart.summary;
        json!({
            "status": "ok",
            "title": args.config.app.title,
            "version": args.config.app.version,
            "elapsed_ms": duration_ms(nav.now()),
            "refresh_interval_ms": duration_ms(interval),
            "refresh_count": view.refresh_count(),
            "timers_fired": delivered,
            "timeframe": widgets.timeframe_label,
            "stats": {
                "balance": widgets.stats.balance,
                "equity": widgets.stats.equity,
                "max_trades": widgets.stats.max_trades,
                "max_loss_percent": widgets.stats.max_loss_percent,
            },
            "profit": {
                "bars": bars,
                "total": summary.total,
                "today": summary.today,
                "best": summary.best_period,
                "worst": summary.worst_period,
            },
            "strategies": serde_json::to_value(&widgets.strategies)
                .map_err(|err| format!("failed to serialize strategies: {err}"))?,
            "positions": serde_json::to_value(&widgets.positions)
                .map_err(|err| format!("failed to serialize positions: {err}"))?,
            "control": {
                "drawdown": widgets.control.drawdown,
                "open_positions": widgets.control.open_positions,
                "running": widgets.control.running,
                "account_id": widgets.control.account_id,
            },
        })
    };

    nav.shutdown();
    Ok(snapshot)
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::{run_headless, HeadlessArgs};
    use sen_application::config::Config;

    #[test]
    fn snapshot_counts_initial_pull_plus_cycles() {
        let json = run_headless(HeadlessArgs {
            config: Config::default(),
            seed: Some(42),
            cycles: 3,
        })
        .unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["refresh_count"], 4);
        assert_eq!(json["timers_fired"], 3);
        assert_eq!(json["elapsed_ms"], 3000);
        assert_eq!(json["stats"]["balance"], 1215.0);
        assert_eq!(json["profit"]["bars"].as_array().unwrap().len(), 7);
        assert_eq!(json["strategies"][0]["name"], "L_CHANNEL_XAUUSD_M5");
        assert_eq!(json["strategies"][1]["status"], "ACTIVE");
    }

    #[test]
    fn same_seed_gives_same_history() {
        let run = |seed| -> Vec<serde_json::Value> {
            let json = run_headless(HeadlessArgs {
                config: Config::default(),
                seed: Some(seed),
                cycles: 0,
            })
            .unwrap();
            json["profit"]["bars"]
                .as_array()
                .unwrap()
                .iter()
                .map(|bar| bar["profit"].clone())
                .collect()
        };
        assert_eq!(run(5), run(5));
    }
}
