use crate::app::App;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Bar, BarChart, BarGroup, Block, Borders, List, ListItem, Paragraph, Row, Table, TableState,
    Wrap,
};
use ratatui::Frame;
use sen_application::views::main_view::{MainView, MainWidgets};
use sen_application::views::settings_view::{SettingsField, SettingsView};
use sen_application::views::strategy_view::{StrategyView, TABLE_HEADERS};
use sen_application::views::{ActiveView, Notice, NoticeLevel, ViewKind};
use sen_domain::value_objects::strategy::StrategyStatus;
use sen_domain::value_objects::trade::TradeDirection;
use tracing::Level;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(7),
            ]
            .as_ref(),
        )
        .split(size);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(10)].as_ref())
        .split(outer[1]);

    draw_top_banner(frame, outer[0], app);
    draw_sidebar(frame, body[0], app);
    draw_main(frame, body[1], app);
    draw_bottom(frame, outer[2], app);
}

fn draw_top_banner(frame: &mut Frame, area: Rect, app: &App) {
    let clock = chrono::Local::now().format("%H:%M:%S").to_string();
    let line = Line::from(vec![
        Span::styled(
            app.title.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  v{}  ", app.version)),
        Span::styled(clock, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let active = app.nav.active_kind();
    let mut items: Vec<ListItem> = ViewKind::ALL
        .iter()
        .enumerate()
        .map(|(idx, kind)| {
            let mut style = Style::default();
            if Some(*kind) == active {
                style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
            }
            ListItem::new(Line::from(Span::styled(
                format!("{} {}", idx + 1, kind.title()),
                style,
            )))
        })
        .collect();
    items.push(ListItem::new(Line::from("")));
    items.push(ListItem::new(Line::from(Span::styled(
        "q Quit",
        Style::default().fg(Color::DarkGray),
    ))));

    let block = Block::default().title("Menu").borders(Borders::ALL);
    frame.render_widget(List::new(items).block(block), area);
}

fn draw_main(frame: &mut Frame, area: Rect, app: &App) {
    match app.nav.active() {
        Some(ActiveView::Main(view)) => draw_dashboard(frame, area, view),
        Some(ActiveView::Strategy(view)) => draw_strategies(frame, area, view),
        Some(ActiveView::Settings(view)) => draw_settings(frame, area, view),
        None => frame.render_widget(
            Paragraph::new("No screen mounted.")
                .block(Block::default().borders(Borders::ALL)),
            area,
        ),
    }
}

fn draw_dashboard(frame: &mut Frame, area: Rect, view: &MainView) {
    let Some(widgets) = view.widgets() else {
        return;
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(7),
            ]
            .as_ref(),
        )
        .split(area);

    draw_stat_cards(frame, rows[0], widgets);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(rows[1]);
    draw_profit_chart(frame, middle[0], widgets);
    draw_strategy_list(frame, middle[1], widgets);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(rows[2]);
    draw_positions(frame, bottom[0], widgets);
    draw_control_panel(frame, bottom[1], widgets);
}

fn draw_stat_cards(frame: &mut Frame, area: Rect, widgets: &MainWidgets) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4].as_ref())
        .split(area);
    let stats = &widgets.stats;
    let values = [
        ("Balance", format!("${:.2}", stats.balance)),
        ("Equity", format!("${:.2}", stats.equity)),
        ("Max Trades", stats.max_trades.to_string()),
        ("Max Loss", format!("{:.1}%", stats.max_loss_percent)),
    ];
    for (area, (title, value)) in cards.iter().zip(values) {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                value,
                Style::default().add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .block(Block::default().title(title).borders(Borders::ALL)),
            *area,
        );
    }
}

fn draw_profit_chart(frame: &mut Frame, area: Rect, widgets: &MainWidgets) {
    let chart = &widgets.profit_chart;
    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .map(|bar| {
            Bar::default()
                .label(Line::from(bar.label))
                .value(bar.profit.abs().round() as u64)
                .text_value(format!("{:+.1}", bar.profit))
                .style(Style::default().fg(profit_color(bar.profit)))
        })
        .collect();
    let title = format!(
        "Profit ({})  total {:+.2}  today {:+.2}  best {:+.2}  worst {:+.2}",
        widgets.timeframe_label,
        chart.summary.total,
        chart.summary.today,
        chart.summary.best_period,
        chart.summary.worst_period
    );
    frame.render_widget(
        BarChart::default()
            .block(Block::default().title(title).borders(Borders::ALL))
            .data(BarGroup::default().bars(&bars))
            .bar_width(5)
            .bar_gap(1),
        area,
    );
}

fn draw_strategy_list(frame: &mut Frame, area: Rect, widgets: &MainWidgets) {
    let items: Vec<ListItem> = widgets
        .strategies
        .iter()
        .enumerate()
        .map(|(idx, strategy)| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{:>2}. {} ", idx + 1, strategy.name)),
                Span::styled(
                    strategy.status.as_str(),
                    Style::default().fg(status_color(strategy.status)),
                ),
            ]))
        })
        .collect();
    frame.render_widget(
        List::new(items).block(Block::default().title("Strategies").borders(Borders::ALL)),
        area,
    );
}

fn draw_positions(frame: &mut Frame, area: Rect, widgets: &MainWidgets) {
    let rows: Vec<Row> = widgets
        .positions
        .iter()
        .map(|trade| {
            let direction_style = match trade.direction {
                TradeDirection::Buy => Style::default().fg(Color::Green),
                TradeDirection::Sell => Style::default().fg(Color::Red),
            };
            Row::new(vec![
                Line::from(trade.symbol.clone()),
                Line::from(Span::styled(trade.direction.as_str(), direction_style)),
                Line::from(format!("{:.2}", trade.volume)),
                Line::from(format!("{:.2}", trade.open_price)),
                Line::from(format!("{:.2}", trade.current_price)),
                Line::from(Span::styled(
                    format!("{:+.2}", trade.profit),
                    Style::default().fg(profit_color(trade.profit)),
                )),
            ])
        })
        .collect();
    let widths = [
        Constraint::Length(8),
        Constraint::Length(5),
        Constraint::Length(6),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Min(8),
    ];
    frame.render_widget(
        Table::new(rows, widths)
            .header(
                Row::new(vec!["Symbol", "Side", "Lots", "Open", "Current", "P/L"])
                    .style(Style::default().add_modifier(Modifier::BOLD)),
            )
            .block(
                Block::default()
                    .title("Open Positions")
                    .borders(Borders::ALL),
            ),
        area,
    );
}

fn draw_control_panel(frame: &mut Frame, area: Rect, widgets: &MainWidgets) {
    let control = &widgets.control;
    let (button, button_style) = if control.running {
        ("[ STOP ]", Style::default().fg(Color::Black).bg(Color::Red))
    } else {
        ("[ START ]", Style::default().fg(Color::Black).bg(Color::Green))
    };
    let lines = vec![
        Line::from(format!("Account: {}", control.account_id)),
        Line::from(format!("Drawdown: {:.2}%", control.drawdown)),
        Line::from(format!("Open positions: {}", control.open_positions)),
        Line::from(vec![
            Span::styled(button, button_style.add_modifier(Modifier::BOLD)),
            Span::styled("  Space toggles", Style::default().fg(Color::DarkGray)),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().title("Control").borders(Borders::ALL)),
        area,
    );
}

fn draw_strategies(frame: &mut Frame, area: Rect, view: &StrategyView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(4)].as_ref())
        .split(area);

    let rows: Vec<Row> = view
        .rows()
        .iter()
        .map(|strategy| {
            Row::new(vec![
                Line::from(strategy.id.clone()),
                Line::from(strategy.name.clone()),
                Line::from(strategy.symbol.clone()),
                Line::from(strategy.timeframe.label()),
                Line::from(Span::styled(
                    strategy.status.as_str(),
                    Style::default().fg(status_color(strategy.status)),
                )),
                Line::from(Span::styled(
                    format!("{:+.2}", strategy.profit),
                    Style::default().fg(profit_color(strategy.profit)),
                )),
                Line::from(strategy.trades_count.to_string()),
            ])
        })
        .collect();
    let widths = [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(7),
    ];
    let table = Table::new(rows, widths)
        .header(Row::new(TABLE_HEADERS.to_vec()).style(Style::default().add_modifier(Modifier::BOLD)))
        .block(
            Block::default()
                .title(ViewKind::Strategy.title())
                .borders(Borders::ALL),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray));
    let mut state = TableState::default().with_selected(Some(view.selected()));
    frame.render_stateful_widget(table, chunks[0], &mut state);

    let mut help = vec![Line::from(
        "a: start all  s: stop all  n: add  d: remove  ↑/↓: select",
    )];
    help.extend(notice_line(view.notice()));
    frame.render_widget(
        Paragraph::new(help)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: false }),
        chunks[1],
    );
}

fn draw_settings(frame: &mut Frame, area: Rect, view: &SettingsView) {
    let Some(form) = view.form() else {
        return;
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(5)].as_ref())
        .split(area);

    let mut lines: Vec<Line> = Vec::new();
    let mut section = "";
    for field in SettingsField::ALL {
        if field.section() != section {
            section = field.section();
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(
                section,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        let selected = field == form.selected;
        let marker = if selected { "> " } else { "  " };
        let mut value = form.value(field);
        if field == SettingsField::DefaultTimeframe {
            value = format!("< {value} >");
        }
        let style = if selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{:<20}", field.label()), style),
            Span::styled(value, style),
        ]));
    }
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(ViewKind::Settings.title())
                .borders(Borders::ALL),
        ),
        chunks[0],
    );

    let mut help = vec![
        Line::from("↑/↓: field  type to edit  ←/→: timeframe  Enter/Ctrl-S: save"),
        Line::from("Ctrl-R: reset to defaults  Esc/F1: dashboard  F2: strategies"),
    ];
    help.extend(notice_line(view.notice()));
    frame.render_widget(
        Paragraph::new(help)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: false }),
        chunks[1],
    );
}

fn draw_bottom(frame: &mut Frame, area: Rect, app: &App) {
    let max_lines = area.height.saturating_sub(2) as usize;
    let (entries, counts) = {
        let logs = app.logs.lock();
        (logs.tail(max_lines), logs.counts())
    };
    let text: Vec<Line> = entries
        .into_iter()
        .map(|entry| Line::styled(entry.text, log_style(entry.level)))
        .collect();
    let title = format!("Logs ({} warn, {} error)", counts.warn, counts.error);
    frame.render_widget(
        Paragraph::new(text)
            .block(Block::default().title(title).borders(Borders::ALL))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn log_style(level: Option<Level>) -> Style {
    match level {
        Some(Level::ERROR) => Style::default().fg(Color::Red),
        Some(Level::WARN) => Style::default().fg(Color::Yellow),
        Some(Level::DEBUG) | Some(Level::TRACE) => Style::default().fg(Color::DarkGray),
        _ => Style::default(),
    }
}

fn notice_line(notice: Option<&Notice>) -> Option<Line<'static>> {
    let notice = notice?;
    let style = match notice.level {
        NoticeLevel::Info => Style::default().fg(Color::Green),
        NoticeLevel::Error => Style::default().fg(Color::Red),
    };
    Some(Line::from(Span::styled(notice.text.clone(), style)))
}

fn profit_color(value: f64) -> Color {
    if value >= 0.0 {
        Color::Green
    } else {
        Color::Red
    }
}

fn status_color(status: StrategyStatus) -> Color {
    match status {
        StrategyStatus::Active => Color::Green,
        StrategyStatus::Inactive => Color::Red,
        StrategyStatus::Paused => Color::Yellow,
    }
}

#[cfg(test)]
mod tests {
    use super::draw;
    use crate::app::App;
    use crate::bootstrap::build_controller;
    use crate::logging::LogStore;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use sen_application::config::Config;
    use sen_application::views::ViewKind;
    use std::sync::Arc;

    fn rendered(kind: ViewKind) -> String {
        let mut nav = build_controller(&Config::default(), Some(8)).unwrap();
        nav.show(kind);
        let logs = Arc::new(parking_lot::Mutex::new(LogStore::new(10)));
        logs.lock().push_line("hello from the log panel");
        logs.lock()
            .push_line("2026-01-02T03:04:05Z  WARN sen_application::navigation: dropped timer");
        let mut app = App::new("SEN TRADING SYSTEM".into(), "1.0.0".into(), nav, logs);
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn dashboard_shows_cards_strategies_and_logs() {
        let screen = rendered(ViewKind::Main);
        assert!(screen.contains("SEN TRADING SYSTEM"));
        assert!(screen.contains("$1215.00"));
        assert!(screen.contains(" 1. L_CHANNEL_XAUUSD_M5 ACTIVE"));
        assert!(screen.contains(" 2. L_CHANNEL_BTCUSD_M15 ACTIVE"));
        assert!(screen.contains("[ START ]"));
        assert!(screen.contains("hello from the log panel"));
        assert!(screen.contains("Logs (1 warn, 0 error)"));
    }

    #[test]
    fn strategy_screen_renders_table_headers() {
        let screen = rendered(ViewKind::Strategy);
        assert!(screen.contains("Timeframe"));
        assert!(screen.contains("L_CHANNEL_BTCUSD_M15"));
    }

    #[test]
    fn settings_screen_lists_sections() {
        let screen = rendered(ViewKind::Settings);
        assert!(screen.contains("Trading Settings"));
        assert!(screen.contains("MetaQuotes-Demo"));
        assert!(screen.contains("< M5 >"));
    }
}
