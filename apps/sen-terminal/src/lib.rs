mod app;
pub mod bootstrap;
pub mod headless;
pub mod logging;
mod ui;

use crate::app::App;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use sen_application::config::Config;
use sen_application::views::ViewKind;
use std::io;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(33);

#[derive(Clone)]
pub struct TuiOpts {
    pub config: Config,
    pub initial_screen: ViewKind,
    pub seed: Option<u64>,
    pub log_store: logging::SharedLogStore,
}

pub fn run(opts: TuiOpts) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()
        .map_err(|err| format!("failed to init tokio runtime: {err}"))?;
    runtime.block_on(run_async(opts))
}

async fn run_async(opts: TuiOpts) -> Result<(), String> {
    enable_raw_mode().map_err(|err| format!("failed to enable raw mode: {err}"))?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|err| format!("failed to enter alternate screen: {err}"))?;
    stdout
        .execute(crossterm::terminal::Clear(
            crossterm::terminal::ClearType::All,
        ))
        .map_err(|err| format!("failed to clear screen: {err}"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|err| format!("failed to init terminal: {err}"))?;
    terminal
        .hide_cursor()
        .map_err(|err| format!("failed to hide cursor: {err}"))?;

    let result = run_loop(&mut terminal, opts).await;

    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
    let _ = disable_raw_mode();
    let _ = terminal.show_cursor();

    result
}

async fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    opts: TuiOpts,
) -> Result<(), String> {
    let mut nav = bootstrap::build_controller(&opts.config, opts.seed)?;
    nav.show(opts.initial_screen);
    let mut app = App::new(
        opts.config.app.title.clone(),
        opts.config.app.version.clone(),
        nav,
        opts.log_store,
    );

    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel();
    app.spawn_input_reader(event_tx);

    let mut tick = tokio::time::interval(TICK);

    loop {
        if app.dirty {
            terminal
                .draw(|frame| ui::draw(frame, &mut app))
                .map_err(|err| format!("terminal draw failed: {err}"))?;
            metrics::counter!("sen.terminal.frames_total").increment(1);
            app.dirty = false;
        }

        tokio::select! {
            _ = tick.tick() => {
                app.on_tick();
            }
            maybe_event = event_rx.recv() => {
                let Some(event) = maybe_event else {
                    app.nav.shutdown();
                    return Ok(());
                };
                if app.on_event(event)? { return Ok(()); }
            }
        }
    }
}
