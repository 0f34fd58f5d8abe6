//! Screens the navigation controller can mount.
//!
//! Every screen goes through the same lifecycle: it is constructed unmounted,
//! mounted exactly once, and unmounted exactly once, after which it is dead.
//! Screens hold no entity state beyond the last snapshot they rendered.

pub mod main_view;
pub mod settings_view;
pub mod strategy_view;
pub mod text_input;

use crate::timers::{Scheduler, TimerHandle};

pub use main_view::MainView;
pub use settings_view::SettingsView;
pub use strategy_view::StrategyView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Main,
    Strategy,
    Settings,
}

impl ViewKind {
    pub const ALL: [ViewKind; 3] = [ViewKind::Main, ViewKind::Strategy, ViewKind::Settings];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewKind::Main => "main",
            ViewKind::Strategy => "strategy",
            ViewKind::Settings => "settings",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ViewKind::Main => "Main Dashboard",
            ViewKind::Strategy => "Strategy Manager",
            ViewKind::Settings => "Settings",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_lowercase().as_str() {
            "main" | "dashboard" => Ok(ViewKind::Main),
            "strategy" | "strategies" => Ok(ViewKind::Strategy),
            "settings" => Ok(ViewKind::Settings),
            _ => Err(format!("unknown view: {value}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewLifecycle {
    Unmounted,
    Mounted,
    /// Terminal state: torn down, never mounted again.
    Disposed,
}

impl ViewLifecycle {
    fn enter_mounted(&mut self, kind: ViewKind) -> Result<(), String> {
        match self {
            ViewLifecycle::Unmounted => {
                *self = ViewLifecycle::Mounted;
                Ok(())
            }
            ViewLifecycle::Mounted => Err(format!("{} view is already mounted", kind.as_str())),
            ViewLifecycle::Disposed => Err(format!(
                "{} view was unmounted and cannot be mounted again",
                kind.as_str()
            )),
        }
    }

    fn enter_disposed(&mut self, kind: ViewKind) -> Result<(), String> {
        match self {
            ViewLifecycle::Unmounted | ViewLifecycle::Mounted => {
                *self = ViewLifecycle::Disposed;
                Ok(())
            }
            ViewLifecycle::Disposed => {
                Err(format!("{} view is already unmounted", kind.as_str()))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One-line message a screen wants shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

pub trait View {
    fn kind(&self) -> ViewKind;

    fn lifecycle(&self) -> ViewLifecycle;

    /// Builds the widget state. Background work may only start as the last
    /// step.
    fn mount(&mut self, scheduler: &mut dyn Scheduler) -> Result<(), String>;

    /// Drops the widget state and cancels every callback the view scheduled.
    fn unmount(&mut self, scheduler: &mut dyn Scheduler) -> Result<(), String>;

    /// Called when a timer fires. Returns `false` if the handle is not one the
    /// view is waiting on.
    fn on_timer(&mut self, _scheduler: &mut dyn Scheduler, _handle: TimerHandle) -> bool {
        false
    }
}

/// The mounted screen, one variant per kind.
pub enum ActiveView {
    Main(MainView),
    Strategy(StrategyView),
    Settings(SettingsView),
}

impl ActiveView {
    fn as_view(&self) -> &dyn View {
        match self {
            ActiveView::Main(v) => v,
            ActiveView::Strategy(v) => v,
            ActiveView::Settings(v) => v,
        }
    }

    fn as_view_mut(&mut self) -> &mut dyn View {
        match self {
            ActiveView::Main(v) => v,
            ActiveView::Strategy(v) => v,
            ActiveView::Settings(v) => v,
        }
    }
}

impl View for ActiveView {
    fn kind(&self) -> ViewKind {
        self.as_view().kind()
    }

    fn lifecycle(&self) -> ViewLifecycle {
        self.as_view().lifecycle()
    }

    fn mount(&mut self, scheduler: &mut dyn Scheduler) -> Result<(), String> {
        self.as_view_mut().mount(scheduler)
    }

    fn unmount(&mut self, scheduler: &mut dyn Scheduler) -> Result<(), String> {
        self.as_view_mut().unmount(scheduler)
    }

    fn on_timer(&mut self, scheduler: &mut dyn Scheduler, handle: TimerHandle) -> bool {
        self.as_view_mut().on_timer(scheduler, handle)
    }
}
