use crate::settings::SessionSettings;
use crate::timers::Scheduler;
use crate::views::text_input::TextInput;
use crate::views::{Notice, View, ViewKind, ViewLifecycle};
use sen_domain::value_objects::timeframe::Timeframe;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    MaxTrades,
    MaxLossPercent,
    DefaultBalance,
    Server,
    Login,
    Password,
    RefreshIntervalMs,
    DefaultTimeframe,
}

impl SettingsField {
    pub const ALL: [SettingsField; 8] = [
        SettingsField::MaxTrades,
        SettingsField::MaxLossPercent,
        SettingsField::DefaultBalance,
        SettingsField::Server,
        SettingsField::Login,
        SettingsField::Password,
        SettingsField::RefreshIntervalMs,
        SettingsField::DefaultTimeframe,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingsField::MaxTrades => "Max Trades",
            SettingsField::MaxLossPercent => "Max Loss %",
            SettingsField::DefaultBalance => "Default Balance",
            SettingsField::Server => "MT5 Server",
            SettingsField::Login => "Login",
            SettingsField::Password => "Password",
            SettingsField::RefreshIntervalMs => "Chart Update (ms)",
            SettingsField::DefaultTimeframe => "Default Timeframe",
        }
    }

    pub fn section(self) -> &'static str {
        match self {
            SettingsField::MaxTrades
            | SettingsField::MaxLossPercent
            | SettingsField::DefaultBalance => "Trading Settings",
            SettingsField::Server | SettingsField::Login | SettingsField::Password => {
                "Connection Settings"
            }
            SettingsField::RefreshIntervalMs | SettingsField::DefaultTimeframe => {
                "Display Settings"
            }
        }
    }

    fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    NotANumber { field: SettingsField, value: String },
    OutOfRange { field: SettingsField, reason: &'static str },
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::NotANumber { field, value } => {
                write!(f, "{}: '{value}' is not a number", field.label())
            }
            SettingsError::OutOfRange { field, reason } => {
                write!(f, "{}: {reason}", field.label())
            }
        }
    }
}

/// Editable copy of the session settings. Text fields hold raw input until
/// the form is saved.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsForm {
    pub selected: SettingsField,
    pub max_trades: TextInput,
    pub max_loss_percent: TextInput,
    pub default_balance: TextInput,
    pub server: TextInput,
    pub login: TextInput,
    pub password: TextInput,
    pub refresh_interval_ms: TextInput,
    pub default_timeframe: Timeframe,
}

impl SettingsForm {
    pub fn from_settings(settings: &SessionSettings) -> Self {
        Self {
            selected: SettingsField::MaxTrades,
            max_trades: TextInput::new(settings.max_trades.to_string()),
            max_loss_percent: TextInput::new(settings.max_loss_percent.to_string()),
            default_balance: TextInput::new(settings.default_balance.to_string()),
            server: TextInput::new(settings.server.clone()),
            login: TextInput::new(settings.login.clone()),
            password: TextInput::new(String::new()),
            refresh_interval_ms: TextInput::new(settings.refresh_interval.as_millis().to_string()),
            default_timeframe: settings.default_timeframe,
        }
    }

    pub fn select_next(&mut self) {
        self.selected = self.selected.next();
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.prev();
    }

    /// Input backing the selected field; `None` for the timeframe picker.
    pub fn selected_input_mut(&mut self) -> Option<&mut TextInput> {
        match self.selected {
            SettingsField::MaxTrades => Some(&mut self.max_trades),
            SettingsField::MaxLossPercent => Some(&mut self.max_loss_percent),
            SettingsField::DefaultBalance => Some(&mut self.default_balance),
            SettingsField::Server => Some(&mut self.server),
            SettingsField::Login => Some(&mut self.login),
            SettingsField::Password => Some(&mut self.password),
            SettingsField::RefreshIntervalMs => Some(&mut self.refresh_interval_ms),
            SettingsField::DefaultTimeframe => None,
        }
    }

    pub fn value(&self, field: SettingsField) -> String {
        match field {
            SettingsField::MaxTrades => self.max_trades.value.clone(),
            SettingsField::MaxLossPercent => self.max_loss_percent.value.clone(),
            SettingsField::DefaultBalance => self.default_balance.value.clone(),
            SettingsField::Server => self.server.value.clone(),
            SettingsField::Login => self.login.value.clone(),
            SettingsField::Password => "*".repeat(self.password.value.chars().count()),
            SettingsField::RefreshIntervalMs => self.refresh_interval_ms.value.clone(),
            SettingsField::DefaultTimeframe => self.default_timeframe.label().to_string(),
        }
    }

    pub fn cycle_timeframe(&mut self, forward: bool) {
        self.default_timeframe = if forward {
            self.default_timeframe.next()
        } else {
            self.default_timeframe.prev()
        };
    }

    /// Parses every field. Nothing is modified on failure.
    pub fn validate(&self) -> Result<SessionSettings, SettingsError> {
        let max_trades: u32 = parse_field(SettingsField::MaxTrades, &self.max_trades)?;
        let max_loss_percent: f64 =
            parse_field(SettingsField::MaxLossPercent, &self.max_loss_percent)?;
        if !max_loss_percent.is_finite() || !(0.0..=100.0).contains(&max_loss_percent) {
            return Err(SettingsError::OutOfRange {
                field: SettingsField::MaxLossPercent,
                reason: "must be within 0..=100",
            });
        }
        let default_balance: f64 =
            parse_field(SettingsField::DefaultBalance, &self.default_balance)?;
        if !default_balance.is_finite() || default_balance < 0.0 {
            return Err(SettingsError::OutOfRange {
                field: SettingsField::DefaultBalance,
                reason: "must be >= 0",
            });
        }
        let refresh_ms: u64 =
            parse_field(SettingsField::RefreshIntervalMs, &self.refresh_interval_ms)?;
        if refresh_ms == 0 {
            return Err(SettingsError::OutOfRange {
                field: SettingsField::RefreshIntervalMs,
                reason: "must be > 0",
            });
        }

        Ok(SessionSettings {
            max_trades,
            max_loss_percent,
            default_balance,
            server: self.server.value.trim().to_string(),
            login: self.login.value.trim().to_string(),
            refresh_interval: Duration::from_millis(refresh_ms),
            default_timeframe: self.default_timeframe,
        })
    }
}

fn parse_field<T: std::str::FromStr>(
    field: SettingsField,
    input: &TextInput,
) -> Result<T, SettingsError> {
    let raw = input.value.trim();
    raw.parse().map_err(|_| SettingsError::NotANumber {
        field,
        value: raw.to_string(),
    })
}

/// Settings screen. Saving validates the form and hands the result to the
/// caller; nothing is written to disk.
pub struct SettingsView {
    lifecycle: ViewLifecycle,
    current: SessionSettings,
    defaults: SessionSettings,
    form: Option<SettingsForm>,
    notice: Option<Notice>,
}

impl SettingsView {
    pub fn new(current: SessionSettings, defaults: SessionSettings) -> Self {
        Self {
            lifecycle: ViewLifecycle::Unmounted,
            current,
            defaults,
            form: None,
            notice: None,
        }
    }

    pub fn form(&self) -> Option<&SettingsForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut SettingsForm> {
        self.form.as_mut()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Validates the form. On success the saved settings are returned for the
    /// session to adopt; on failure the user sees an error and nothing changes.
    pub fn save(&mut self) -> Option<SessionSettings> {
        let form = self.form.as_ref()?;
        match form.validate() {
            Ok(settings) => {
                self.current = settings.clone();
                self.notice = Some(Notice::info("Settings saved successfully!"));
                tracing::info!(
                    refresh_interval_ms = settings.refresh_interval.as_millis() as u64,
                    timeframe = settings.default_timeframe.label(),
                    "settings saved for this session"
                );
                Some(settings)
            }
            Err(err) => {
                tracing::debug!(error = %err, "settings rejected");
                self.notice = Some(Notice::error(format!(
                    "Please enter valid numeric values ({err})"
                )));
                None
            }
        }
    }

    pub fn reset(&mut self) {
        if self.form.is_none() {
            return;
        }
        self.form = Some(SettingsForm::from_settings(&self.defaults));
        self.notice = Some(Notice::info("Settings reset to defaults"));
    }
}

impl View for SettingsView {
    fn kind(&self) -> ViewKind {
        ViewKind::Settings
    }

    fn lifecycle(&self) -> ViewLifecycle {
        self.lifecycle
    }

    fn mount(&mut self, _scheduler: &mut dyn Scheduler) -> Result<(), String> {
        self.lifecycle.enter_mounted(ViewKind::Settings)?;
        self.form = Some(SettingsForm::from_settings(&self.current));
        Ok(())
    }

    fn unmount(&mut self, _scheduler: &mut dyn Scheduler) -> Result<(), String> {
        self.lifecycle.enter_disposed(ViewKind::Settings)?;
        self.form = None;
        self.notice = None;
        Ok(())
    }
}
