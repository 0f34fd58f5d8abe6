use crate::data::SharedTradingData;
use crate::settings::SessionSettings;
use crate::timers::TimerQueue;
use crate::views::{
    ActiveView, MainView, SettingsView, StrategyView, View, ViewKind, ViewLifecycle,
};
use std::collections::VecDeque;
use std::time::Duration;

const MAX_HISTORY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStep {
    Mounted,
    Unmounted,
}

/// One mount or unmount performed by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleEvent {
    pub instance: u64,
    pub kind: ViewKind,
    pub step: LifecycleStep,
    pub at: Duration,
}

/// Owns the single active screen and the timer queue its callbacks run on.
pub struct NavigationController {
    data: SharedTradingData,
    timers: TimerQueue,
    defaults: SessionSettings,
    session: SessionSettings,
    active: Option<(u64, ActiveView)>,
    next_instance: u64,
    history: VecDeque<LifecycleEvent>,
    stale_timers: u64,
}

impl NavigationController {
    pub fn new(data: SharedTradingData, defaults: SessionSettings) -> Self {
        Self {
            data,
            timers: TimerQueue::new(),
            session: defaults.clone(),
            defaults,
            active: None,
            next_instance: 1,
            history: VecDeque::new(),
            stale_timers: 0,
        }
    }

    /// Tears down the current screen, then builds and mounts `kind`.
    ///
    /// Showing the kind that is already active rebuilds it from scratch.
    pub fn show(&mut self, kind: ViewKind) {
        self.unmount_active();

        let instance = self.next_instance;
        self.next_instance += 1;
        let mut view = match kind {
            ViewKind::Main => {
                ActiveView::Main(MainView::new(self.data.clone(), self.session.clone()))
            }
            ViewKind::Strategy => ActiveView::Strategy(StrategyView::new(self.data.clone())),
            ViewKind::Settings => ActiveView::Settings(SettingsView::new(
                self.session.clone(),
                self.defaults.clone(),
            )),
        };
        if let Err(err) = view.mount(&mut self.timers) {
            tracing::error!(view = kind.as_str(), error = %err, "mount failed");
        }
        self.record(instance, kind, LifecycleStep::Mounted);
        self.active = Some((instance, view));

        metrics::counter!("sen.app.navigation.show_total", "view" => kind.as_str()).increment(1);
        tracing::info!(view = kind.as_str(), instance, "view mounted");
    }

    /// Unmounts the active screen, if any. Used on quit.
    pub fn shutdown(&mut self) {
        self.unmount_active();
    }

    pub fn active(&self) -> Option<&ActiveView> {
        self.active.as_ref().map(|(_, view)| view)
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveView> {
        self.active.as_mut().map(|(_, view)| view)
    }

    pub fn active_kind(&self) -> Option<ViewKind> {
        self.active().map(|view| view.kind())
    }

    pub fn active_instance(&self) -> Option<u64> {
        self.active.as_ref().map(|(instance, _)| *instance)
    }

    /// Runs every callback due up to `now`, in deadline order, and returns how
    /// many were delivered to the active screen.
    ///
    /// Callbacks run at `now`, not at their missed deadline, so a stalled loop
    /// gets one refresh and the next one lands a full interval later.
    pub fn advance_to(&mut self, now: Duration) -> usize {
        let mut delivered = 0;
        while let Some(handle) = self.timers.pop_due(now) {
            self.timers.set_now(now);
            let handled = match self.active.as_mut() {
                Some((_, view)) if view.lifecycle() == ViewLifecycle::Mounted => {
                    view.on_timer(&mut self.timers, handle)
                }
                _ => false,
            };
            if handled {
                delivered += 1;
            } else {
                self.stale_timers += 1;
                metrics::counter!("sen.app.timers.stale_total").increment(1);
                tracing::warn!(?handle, "dropped timer with no owning view");
            }
        }
        self.timers.set_now(now);
        delivered
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending_len()
    }

    pub fn stale_timers(&self) -> u64 {
        self.stale_timers
    }

    pub fn history(&self) -> impl Iterator<Item = &LifecycleEvent> {
        self.history.iter()
    }

    pub fn data(&self) -> &SharedTradingData {
        &self.data
    }

    pub fn session_settings(&self) -> &SessionSettings {
        &self.session
    }

    /// Adopts settings saved on the settings screen for screens mounted from
    /// now on. The active screen keeps the settings it was built with.
    pub fn apply_session_settings(&mut self, settings: SessionSettings) {
        tracing::info!(
            refresh_interval_ms = settings.refresh_interval.as_millis() as u64,
            "session settings updated"
        );
        self.session = settings;
    }

    fn unmount_active(&mut self) {
        let Some((instance, mut view)) = self.active.take() else {
            return;
        };
        let kind = view.kind();
        if let Err(err) = view.unmount(&mut self.timers) {
            tracing::error!(view = kind.as_str(), error = %err, "unmount failed");
        }
        self.record(instance, kind, LifecycleStep::Unmounted);
        tracing::info!(view = kind.as_str(), instance, "view unmounted");
    }

    fn record(&mut self, instance: u64, kind: ViewKind, step: LifecycleStep) {
        self.history.push_back(LifecycleEvent {
            instance,
            kind,
            step,
            at: self.timers.now(),
        });
        while self.history.len() > MAX_HISTORY {
            self.history.pop_front();
        }
    }
}
