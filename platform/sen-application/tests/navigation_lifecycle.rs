use sen_application::data::share;
use sen_application::navigation::{LifecycleStep, NavigationController};
use sen_application::settings::SessionSettings;
use sen_application::views::{ActiveView, View, ViewKind, ViewLifecycle};
use sen_domain::repositories::trading_data::TradingDataProvider;
use sen_domain::value_objects::account::Account;
use sen_domain::value_objects::profit_data::ProfitData;
use sen_domain::value_objects::strategy::{Strategy, StrategyStatus};
use sen_domain::value_objects::trade::Trade;
use sen_infrastructure::sample_data::InMemoryTradingData;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct Reads {
    account: AtomicUsize,
    history: AtomicUsize,
    strategies: AtomicUsize,
}

impl Reads {
    /// Dashboard pulls, counted by account reads.
    fn pulls(&self) -> usize {
        self.account.load(Ordering::SeqCst)
    }
}

/// Wraps the sample store and counts reads per entity.
struct CountingProvider {
    inner: InMemoryTradingData,
    reads: Arc<Reads>,
}

impl TradingDataProvider for CountingProvider {
    fn account(&self) -> Account {
        self.reads.account.fetch_add(1, Ordering::SeqCst);
        self.inner.account()
    }

    fn strategies(&self) -> Vec<Strategy> {
        self.reads.strategies.fetch_add(1, Ordering::SeqCst);
        self.inner.strategies()
    }

    fn profit_history(&self) -> Vec<ProfitData> {
        self.reads.history.fetch_add(1, Ordering::SeqCst);
        self.inner.profit_history()
    }

    fn open_trades(&self) -> Vec<Trade> {
        self.inner.open_trades()
    }

    fn set_strategy_status(&mut self, id: &str, status: StrategyStatus) -> bool {
        self.inner.set_strategy_status(id, status)
    }
}

fn counting_controller() -> (NavigationController, Arc<Reads>) {
    let reads = Arc::new(Reads::default());
    let provider = CountingProvider {
        inner: InMemoryTradingData::seeded(11),
        reads: reads.clone(),
    };
    (
        NavigationController::new(share(provider), SessionSettings::default()),
        reads,
    )
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn dashboard_pulls_on_mount_and_every_interval() {
    let (mut nav, reads) = counting_controller();
    nav.show(ViewKind::Main);
    assert_eq!(reads.account.load(Ordering::SeqCst), 1);
    assert_eq!(reads.history.load(Ordering::SeqCst), 1);
    assert_eq!(reads.strategies.load(Ordering::SeqCst), 1);

    assert_eq!(nav.advance_to(ms(999)), 0);
    assert_eq!(reads.pulls(), 1);

    assert_eq!(nav.advance_to(ms(1000)), 1);
    assert_eq!(reads.pulls(), 2);

    assert_eq!(nav.advance_to(ms(2000)), 1);
    assert_eq!(reads.pulls(), 3);
    assert_eq!(nav.pending_timers(), 1);
}

#[test]
fn stalled_loop_refreshes_once_and_reschedules_from_fire_time() {
    let (mut nav, reads) = counting_controller();
    nav.show(ViewKind::Main);
    assert_eq!(nav.advance_to(ms(2500)), 1);
    assert_eq!(reads.pulls(), 2);
    assert_eq!(nav.next_deadline(), Some(ms(3500)));

    assert_eq!(nav.advance_to(ms(600_000)), 1);
    assert_eq!(reads.pulls(), 3);
    assert_eq!(nav.next_deadline(), Some(ms(601_000)));
    assert_eq!(nav.pending_timers(), 1);
}

#[test]
fn leaving_dashboard_stops_pulls() {
    let (mut nav, reads) = counting_controller();
    nav.show(ViewKind::Main);
    nav.advance_to(ms(1000));
    nav.show(ViewKind::Strategy);
    let after_switch = reads.pulls();
    assert_eq!(nav.pending_timers(), 0);

    nav.advance_to(ms(10_000));
    assert_eq!(reads.pulls(), after_switch);
    assert_eq!(nav.stale_timers(), 0);
}

#[test]
fn each_unmount_precedes_the_next_mount() {
    let (mut nav, _) = counting_controller();
    let sequence = [
        ViewKind::Main,
        ViewKind::Strategy,
        ViewKind::Main,
        ViewKind::Main,
        ViewKind::Settings,
        ViewKind::Strategy,
        ViewKind::Main,
    ];
    for (i, kind) in sequence.iter().enumerate() {
        nav.show(*kind);
        nav.advance_to(ms(300 * (i as u64 + 1)));
        assert_eq!(nav.active_kind(), Some(*kind));
        assert_eq!(
            nav.active().map(|v| v.lifecycle()),
            Some(ViewLifecycle::Mounted)
        );
    }

    let events: Vec<_> = nav.history().copied().collect();
    let mut mounted: Option<u64> = None;
    let mut seen = HashSet::new();
    for event in &events {
        match event.step {
            LifecycleStep::Mounted => {
                assert!(mounted.is_none(), "two views mounted at once");
                assert!(seen.insert(event.instance), "instance mounted twice");
                mounted = Some(event.instance);
            }
            LifecycleStep::Unmounted => {
                assert_eq!(mounted, Some(event.instance));
                mounted = None;
            }
        }
    }
    assert_eq!(mounted, nav.active_instance());
    assert_eq!(
        events
            .iter()
            .filter(|e| e.step == LifecycleStep::Mounted)
            .count(),
        sequence.len()
    );
}

#[test]
fn strategy_screen_changes_are_visible_on_dashboard() {
    let (mut nav, _) = counting_controller();
    nav.show(ViewKind::Strategy);
    match nav.active_mut() {
        Some(ActiveView::Strategy(view)) => view.stop_all(),
        _ => panic!("strategy view expected"),
    }
    assert!(!nav
        .data()
        .lock()
        .set_strategy_status("unknown", StrategyStatus::Paused));
    assert!(nav
        .data()
        .lock()
        .set_strategy_status("2", StrategyStatus::Active));

    nav.show(ViewKind::Main);
    let Some(ActiveView::Main(view)) = nav.active() else {
        panic!("main view expected");
    };
    let statuses: Vec<_> = view
        .widgets()
        .expect("widgets")
        .strategies
        .iter()
        .map(|s| (s.id.as_str(), s.status))
        .collect();
    assert_eq!(
        statuses,
        vec![("1", StrategyStatus::Inactive), ("2", StrategyStatus::Active)]
    );
}

#[test]
fn saved_settings_reach_the_next_dashboard() {
    let (mut nav, reads) = counting_controller();
    nav.show(ViewKind::Settings);
    let saved = match nav.active_mut() {
        Some(ActiveView::Settings(view)) => {
            view.form_mut()
                .expect("form")
                .refresh_interval_ms
                .set("400");
            view.save()
        }
        _ => panic!("settings view expected"),
    };
    nav.apply_session_settings(saved.expect("valid settings"));

    nav.show(ViewKind::Main);
    for at in [400, 800, 1200] {
        assert_eq!(nav.advance_to(ms(at)), 1);
    }
    assert_eq!(reads.pulls(), 4);
    assert_eq!(nav.next_deadline(), Some(ms(1600)));
}
