use crate::data::SharedTradingData;
use crate::settings::SessionSettings;
use crate::timers::{Scheduler, TimerHandle};
use crate::views::{View, ViewKind, ViewLifecycle};
use sen_domain::services::profit::{summarize, weekday_label, ProfitSummary};
use sen_domain::value_objects::account::Account;
use sen_domain::value_objects::profit_data::ProfitData;
use sen_domain::value_objects::strategy::Strategy;
use sen_domain::value_objects::trade::Trade;
use std::time::Duration;

const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(1);
const ACCOUNT_ID: &str = "ABCDEFGHI";

#[derive(Debug, Clone, PartialEq)]
pub struct StatCards {
    pub balance: f64,
    pub equity: f64,
    pub max_trades: u32,
    pub max_loss_percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfitBar {
    pub label: &'static str,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfitChart {
    pub bars: Vec<ProfitBar>,
    pub summary: ProfitSummary,
}

impl ProfitChart {
    fn update(&mut self, history: &[ProfitData]) {
        self.bars = history
            .iter()
            .map(|p| ProfitBar {
                label: weekday_label(&p.timestamp),
                profit: p.profit,
            })
            .collect();
        self.summary = summarize(history);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlPanel {
    pub drawdown: f64,
    pub open_positions: usize,
    /// START/STOP button state; presentation only, nothing is executed.
    pub running: bool,
    pub account_id: &'static str,
}

/// Widget state of a mounted dashboard, rebuilt from provider snapshots on
/// every refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct MainWidgets {
    pub stats: StatCards,
    pub profit_chart: ProfitChart,
    pub strategies: Vec<Strategy>,
    pub positions: Vec<Trade>,
    pub control: ControlPanel,
    pub timeframe_label: &'static str,
}

impl MainWidgets {
    fn new(settings: &SessionSettings) -> Self {
        Self {
            stats: StatCards {
                balance: 0.0,
                equity: 0.0,
                max_trades: settings.max_trades,
                max_loss_percent: settings.max_loss_percent,
            },
            profit_chart: ProfitChart::default(),
            strategies: Vec::new(),
            positions: Vec::new(),
            control: ControlPanel {
                drawdown: 0.0,
                open_positions: 0,
                running: false,
                account_id: ACCOUNT_ID,
            },
            timeframe_label: settings.default_timeframe.label(),
        }
    }

    fn apply(
        &mut self,
        account: &Account,
        history: &[ProfitData],
        strategies: Vec<Strategy>,
        positions: Vec<Trade>,
    ) {
        self.stats.balance = account.balance;
        self.stats.equity = account.equity;
        self.control.drawdown = account.drawdown;
        self.profit_chart.update(history);
        self.strategies = strategies;
        self.control.open_positions = positions.len();
        self.positions = positions;
    }
}

/// Dashboard screen. Owns the refresh loop: one pull on mount, then one pull
/// per interval until unmounted.
pub struct MainView {
    lifecycle: ViewLifecycle,
    data: SharedTradingData,
    settings: SessionSettings,
    widgets: Option<MainWidgets>,
    pending_refresh: Option<TimerHandle>,
    refresh_count: u64,
}

impl MainView {
    pub fn new(data: SharedTradingData, settings: SessionSettings) -> Self {
        Self {
            lifecycle: ViewLifecycle::Unmounted,
            data,
            settings,
            widgets: None,
            pending_refresh: None,
            refresh_count: 0,
        }
    }

    pub fn widgets(&self) -> Option<&MainWidgets> {
        self.widgets.as_ref()
    }

    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }

    pub fn pending_refresh(&self) -> Option<TimerHandle> {
        self.pending_refresh
    }

    pub fn refresh_interval(&self) -> Duration {
        self.settings.refresh_interval.max(MIN_REFRESH_INTERVAL)
    }

    /// Flips the START/STOP button. Returns the new running state.
    pub fn toggle_trading(&mut self) -> bool {
        let Some(widgets) = self.widgets.as_mut() else {
            return false;
        };
        widgets.control.running = !widgets.control.running;
        tracing::info!(running = widgets.control.running, "trading toggle pressed");
        widgets.control.running
    }

    fn refresh(&mut self) {
        let (account, history, strategies, positions) = {
            let data = self.data.lock();
            (
                data.account(),
                data.profit_history(),
                data.strategies(),
                data.open_trades(),
            )
        };
        if let Some(widgets) = self.widgets.as_mut() {
            widgets.apply(&account, &history, strategies, positions);
        }
        self.refresh_count += 1;
        metrics::counter!("sen.app.refresh.cycles_total").increment(1);
        tracing::debug!(cycle = self.refresh_count, "dashboard refreshed");
    }

    fn schedule_next(&mut self, scheduler: &mut dyn Scheduler) {
        self.pending_refresh = Some(scheduler.schedule_after(self.refresh_interval()));
    }
}

impl View for MainView {
    fn kind(&self) -> ViewKind {
        ViewKind::Main
    }

    fn lifecycle(&self) -> ViewLifecycle {
        self.lifecycle
    }

    fn mount(&mut self, scheduler: &mut dyn Scheduler) -> Result<(), String> {
        self.lifecycle.enter_mounted(ViewKind::Main)?;
        self.widgets = Some(MainWidgets::new(&self.settings));
        self.refresh();
        self.schedule_next(scheduler);
        Ok(())
    }

    fn unmount(&mut self, scheduler: &mut dyn Scheduler) -> Result<(), String> {
        self.lifecycle.enter_disposed(ViewKind::Main)?;
        if let Some(handle) = self.pending_refresh.take() {
            scheduler.cancel(handle);
        }
        self.widgets = None;
        Ok(())
    }

    fn on_timer(&mut self, scheduler: &mut dyn Scheduler, handle: TimerHandle) -> bool {
        if self.lifecycle != ViewLifecycle::Mounted || self.pending_refresh != Some(handle) {
            return false;
        }
        self.pending_refresh = None;
        self.refresh();
        self.schedule_next(scheduler);
        true
    }
}
