use crate::data::SharedTradingData;
use crate::timers::Scheduler;
use crate::views::{Notice, View, ViewKind, ViewLifecycle};
use sen_domain::value_objects::strategy::{Strategy, StrategyStatus};

pub const TABLE_HEADERS: [&str; 7] = [
    "ID",
    "Name",
    "Symbol",
    "Timeframe",
    "Status",
    "Profit",
    "Trades",
];

/// Strategy manager screen: a table of every strategy plus bulk start/stop.
pub struct StrategyView {
    lifecycle: ViewLifecycle,
    data: SharedTradingData,
    rows: Option<Vec<Strategy>>,
    selected: usize,
    notice: Option<Notice>,
}

impl StrategyView {
    pub fn new(data: SharedTradingData) -> Self {
        Self {
            lifecycle: ViewLifecycle::Unmounted,
            data,
            rows: None,
            selected: 0,
            notice: None,
        }
    }

    pub fn rows(&self) -> &[Strategy] {
        self.rows.as_deref().unwrap_or(&[])
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn select_next(&mut self) {
        let max = self.rows().len().saturating_sub(1);
        self.selected = (self.selected + 1).min(max);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn start_all(&mut self) {
        self.set_all(StrategyStatus::Active);
        self.notice = Some(Notice::info("All strategies started"));
    }

    pub fn stop_all(&mut self) {
        self.set_all(StrategyStatus::Inactive);
        self.notice = Some(Notice::info("All strategies stopped"));
    }

    /// Placeholder: strategies cannot be created from the terminal yet.
    pub fn add_strategy(&mut self) {
        self.notice = Some(Notice::info(
            "Add strategy functionality is not implemented",
        ));
    }

    /// Placeholder: strategies cannot be removed from the terminal yet.
    pub fn remove_strategy(&mut self) {
        self.notice = Some(Notice::info(
            "Remove strategy functionality is not implemented",
        ));
    }

    fn set_all(&mut self, status: StrategyStatus) {
        if self.lifecycle != ViewLifecycle::Mounted {
            return;
        }
        {
            let mut data = self.data.lock();
            for strategy in data.strategies() {
                if !data.set_strategy_status(&strategy.id, status) {
                    tracing::warn!(strategy_id = %strategy.id, "strategy vanished during bulk update");
                }
            }
        }
        tracing::info!(status = status.as_str(), "bulk strategy status update");
        self.load_strategies();
    }

    fn load_strategies(&mut self) {
        let rows = self.data.lock().strategies();
        let max = rows.len().saturating_sub(1);
        self.selected = self.selected.min(max);
        self.rows = Some(rows);
    }
}

impl View for StrategyView {
    fn kind(&self) -> ViewKind {
        ViewKind::Strategy
    }

    fn lifecycle(&self) -> ViewLifecycle {
        self.lifecycle
    }

    fn mount(&mut self, _scheduler: &mut dyn Scheduler) -> Result<(), String> {
        self.lifecycle.enter_mounted(ViewKind::Strategy)?;
        self.load_strategies();
        Ok(())
    }

    fn unmount(&mut self, _scheduler: &mut dyn Scheduler) -> Result<(), String> {
        self.lifecycle.enter_disposed(ViewKind::Strategy)?;
        self.rows = None;
        self.notice = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::StrategyView;
    use crate::data::share;
    use crate::timers::TimerQueue;
    use crate::views::View;
    use sen_domain::value_objects::strategy::StrategyStatus;
    use sen_infrastructure::sample_data::InMemoryTradingData;

    #[test]
    fn stop_all_then_start_all_updates_provider_and_table() {
        let data = share(InMemoryTradingData::seeded(2));
        let mut timers = TimerQueue::new();
        let mut view = StrategyView::new(data.clone());
        view.mount(&mut timers).expect("mount");
        assert_eq!(view.rows().len(), 2);

        view.stop_all();
        assert!(view
            .rows()
            .iter()
            .all(|s| s.status == StrategyStatus::Inactive));
        assert!(data
            .lock()
            .strategies()
            .iter()
            .all(|s| s.status == StrategyStatus::Inactive));
        assert_eq!(view.notice().unwrap().text, "All strategies stopped");

        view.start_all();
        assert!(view.rows().iter().all(|s| s.status == StrategyStatus::Active));
        assert_eq!(timers.pending_len(), 0);
    }

    #[test]
    fn bulk_actions_after_unmount_do_not_touch_provider() {
        let data = share(InMemoryTradingData::seeded(2));
        let mut timers = TimerQueue::new();
        let mut view = StrategyView::new(data.clone());
        view.mount(&mut timers).expect("mount");
        view.unmount(&mut timers).expect("unmount");

        view.stop_all();
        assert!(data
            .lock()
            .strategies()
            .iter()
            .all(|s| s.status == StrategyStatus::Active));
        assert!(view.rows().is_empty());
    }

    #[test]
    fn add_and_remove_are_placeholders() {
        let data = share(InMemoryTradingData::seeded(2));
        let mut timers = TimerQueue::new();
        let mut view = StrategyView::new(data.clone());
        view.mount(&mut timers).expect("mount");
        view.add_strategy();
        assert!(view.notice().unwrap().text.contains("not implemented"));
        view.remove_strategy();
        assert!(view.notice().unwrap().text.contains("not implemented"));
        assert_eq!(data.lock().strategies().len(), 2);
    }

    #[test]
    fn selection_is_clamped_to_rows() {
        let mut timers = TimerQueue::new();
        let mut view = StrategyView::new(share(InMemoryTradingData::seeded(2)));
        view.mount(&mut timers).expect("mount");
        view.select_next();
        view.select_next();
        assert_eq!(view.selected(), 1);
        view.select_prev();
        view.select_prev();
        assert_eq!(view.selected(), 0);
    }
}
