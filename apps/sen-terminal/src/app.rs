use crate::logging::SharedLogStore;
use crossterm::event::{Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use sen_application::navigation::NavigationController;
use sen_application::views::settings_view::{SettingsField, SettingsView};
use sen_application::views::{ActiveView, ViewKind};
use std::time::{Duration, Instant};

pub enum AppEvent {
    Input(CtEvent),
}

pub struct App {
    pub title: String,
    pub version: String,
    pub nav: NavigationController,
    pub logs: SharedLogStore,
    pub dirty: bool,
    started_at: Instant,
    last_clock_second: u64,
}

impl App {
    pub fn new(
        title: String,
        version: String,
        nav: NavigationController,
        logs: SharedLogStore,
    ) -> Self {
        Self {
            title,
            version,
            nav,
            logs,
            dirty: true,
            started_at: Instant::now(),
            last_clock_second: 0,
        }
    }

    pub fn spawn_input_reader(&self, tx: tokio::sync::mpsc::UnboundedSender<AppEvent>) {
        std::thread::spawn(move || {
            while let Ok(event) = crossterm::event::read() {
                if tx.send(AppEvent::Input(event)).is_err() {
                    break;
                }
            }
        });
    }

    pub fn on_tick(&mut self) {
        let elapsed = self.started_at.elapsed();
        self.advance(elapsed);
    }

    /// Feeds session time to the timer queue. Redraws when a view refreshed
    /// or the header clock ticked over.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.nav.advance_to(elapsed) > 0 {
            self.dirty = true;
        }
        let second = elapsed.as_secs();
        if second != self.last_clock_second {
            self.last_clock_second = second;
            self.dirty = true;
        }
    }

    /// Returns `Ok(true)` when the app should exit.
    pub fn on_event(&mut self, event: AppEvent) -> Result<bool, String> {
        match event {
            AppEvent::Input(CtEvent::Key(key)) => self.on_key(key),
            AppEvent::Input(CtEvent::Resize(_, _)) => {
                self.dirty = true;
                Ok(false)
            }
            AppEvent::Input(_) => Ok(false),
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Result<bool, String> {
        if key.kind == KeyEventKind::Release {
            return Ok(false);
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(self.quit());
        }

        match key.code {
            KeyCode::F(1) => return Ok(self.show(ViewKind::Main)),
            KeyCode::F(2) => return Ok(self.show(ViewKind::Strategy)),
            KeyCode::F(3) => return Ok(self.show(ViewKind::Settings)),
            _ => {}
        }

        // The settings form takes plain characters as text, so digit and `q`
        // shortcuts only apply on the other screens.
        if self.nav.active_kind() == Some(ViewKind::Settings) {
            return Ok(self.handle_settings_keys(key));
        }

        match key.code {
            KeyCode::Char('q') => return Ok(self.quit()),
            KeyCode::Char('1') => return Ok(self.show(ViewKind::Main)),
            KeyCode::Char('2') => return Ok(self.show(ViewKind::Strategy)),
            KeyCode::Char('3') => return Ok(self.show(ViewKind::Settings)),
            _ => {}
        }

        match self.nav.active_mut() {
            Some(ActiveView::Main(view)) => {
                if key.code == KeyCode::Char(' ') {
                    view.toggle_trading();
                    self.dirty = true;
                }
            }
            Some(ActiveView::Strategy(view)) => {
                match key.code {
                    KeyCode::Char('a') => view.start_all(),
                    KeyCode::Char('s') => view.stop_all(),
                    KeyCode::Char('n') => view.add_strategy(),
                    KeyCode::Char('d') => view.remove_strategy(),
                    KeyCode::Up => view.select_prev(),
                    KeyCode::Down => view.select_next(),
                    _ => return Ok(false),
                }
                self.dirty = true;
            }
            Some(ActiveView::Settings(_)) | None => {}
        }
        Ok(false)
    }

    fn handle_settings_keys(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Esc {
            return self.show(ViewKind::Main);
        }
        let Some(ActiveView::Settings(view)) = self.nav.active_mut() else {
            return false;
        };
        let saved = edit_settings(view, key);
        if let Some(settings) = saved {
            self.nav.apply_session_settings(settings);
        }
        self.dirty = true;
        false
    }

    fn show(&mut self, kind: ViewKind) -> bool {
        self.nav.show(kind);
        self.dirty = true;
        false
    }

    fn quit(&mut self) -> bool {
        tracing::info!("quit requested");
        self.nav.shutdown();
        true
    }
}

/// Applies one key to the settings form. Returns the saved settings when the
/// key triggered a successful save.
fn edit_settings(
    view: &mut SettingsView,
    key: KeyEvent,
) -> Option<sen_application::settings::SessionSettings> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => return view.save(),
        KeyCode::Char('s') if ctrl => return view.save(),
        KeyCode::Char('r') if ctrl => {
            view.reset();
            return None;
        }
        _ => {}
    }

    let form = view.form_mut()?;
    let on_timeframe = form.selected == SettingsField::DefaultTimeframe;
    match key.code {
        KeyCode::Up | KeyCode::BackTab => form.select_prev(),
        KeyCode::Down | KeyCode::Tab => form.select_next(),
        KeyCode::Left if on_timeframe => form.cycle_timeframe(false),
        KeyCode::Right if on_timeframe => form.cycle_timeframe(true),
        code => {
            if let Some(input) = form.selected_input_mut() {
                match code {
                    KeyCode::Left => input.move_left(),
                    KeyCode::Right => input.move_right(),
                    KeyCode::Backspace => input.backspace(),
                    KeyCode::Delete => input.delete(),
                    KeyCode::Char(ch) if !ctrl => input.insert_char(ch),
                    _ => {}
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{App, AppEvent};
    use crate::bootstrap::build_controller;
    use crate::logging::LogStore;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use sen_application::config::Config;
    use sen_application::views::{ActiveView, ViewKind};
    use sen_domain::value_objects::strategy::StrategyStatus;
    use std::sync::Arc;
    use std::time::Duration;

    fn make_app() -> App {
        let mut nav = build_controller(&Config::default(), Some(3)).unwrap();
        nav.show(ViewKind::Main);
        App::new(
            "SEN TRADING SYSTEM".to_string(),
            "1.0.0".to_string(),
            nav,
            Arc::new(parking_lot::Mutex::new(LogStore::new(10))),
        )
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        press_with(app, code, KeyModifiers::NONE)
    }

    fn press_with(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
        app.on_event(AppEvent::Input(Event::Key(KeyEvent::new(code, modifiers))))
            .unwrap()
    }

    #[test]
    fn number_and_function_keys_switch_screens() {
        let mut app = make_app();
        assert!(!press(&mut app, KeyCode::Char('2')));
        assert_eq!(app.nav.active_kind(), Some(ViewKind::Strategy));
        press(&mut app, KeyCode::F(3));
        assert_eq!(app.nav.active_kind(), Some(ViewKind::Settings));
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.nav.active_kind(), Some(ViewKind::Main));
    }

    #[test]
    fn quit_unmounts_active_screen() {
        let mut app = make_app();
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(app.nav.active().is_none());
        assert_eq!(app.nav.pending_timers(), 0);

        let mut app = make_app();
        assert!(press_with(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL));
    }

    #[test]
    fn strategy_keys_drive_bulk_actions() {
        let mut app = make_app();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('s'));
        assert!(app
            .nav
            .data()
            .lock()
            .strategies()
            .iter()
            .all(|s| s.status == StrategyStatus::Inactive));
        press(&mut app, KeyCode::Char('a'));
        assert!(app
            .nav
            .data()
            .lock()
            .strategies()
            .iter()
            .all(|s| s.status == StrategyStatus::Active));
    }

    #[test]
    fn settings_typing_does_not_navigate_and_save_applies_interval() {
        let mut app = make_app();
        press(&mut app, KeyCode::Char('3'));
        for _ in 0..6 {
            press(&mut app, KeyCode::Down);
        }
        for _ in 0..4 {
            press(&mut app, KeyCode::Backspace);
        }
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('5'));
        press(&mut app, KeyCode::Char('0'));
        assert_eq!(app.nav.active_kind(), Some(ViewKind::Settings));

        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.nav.session_settings().refresh_interval,
            Duration::from_millis(250)
        );
        match app.nav.active() {
            Some(ActiveView::Settings(view)) => {
                assert_eq!(view.notice().unwrap().text, "Settings saved successfully!")
            }
            _ => panic!("settings view expected"),
        }

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.nav.active_kind(), Some(ViewKind::Main));
        assert_eq!(app.nav.next_deadline(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn advance_marks_dirty_only_on_refresh_or_new_second() {
        let mut app = make_app();
        app.dirty = false;
        app.advance(Duration::from_millis(500));
        assert!(!app.dirty);
        app.advance(Duration::from_millis(1000));
        assert!(app.dirty);
        match app.nav.active() {
            Some(ActiveView::Main(view)) => assert_eq!(view.refresh_count(), 2),
            _ => panic!("main view expected"),
        }
    }
}
