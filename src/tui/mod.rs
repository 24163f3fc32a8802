//! Ratatui-based terminal UI.
//!
//! Shows the current wind, the three forecasts and a forecast chart for the
//! watched data file, re-read whenever the file's modification time moves.
//! The path can be edited in place or picked from the files under the working
//! directory.

use std::io;
use std::path::PathBuf;
use std::time::Instant;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::monitor::Monitor;
use crate::app::schedule::Ticker;
use crate::cli::picker::{discover_data_files, pretty_path};
use crate::domain::{MonitorConfig, MonitorStatus};
use crate::error::AppError;
use crate::report::{WindDisplay, now_unix, status_line};

mod forecast_chart;

use forecast_chart::{ForecastChart, chart_bounds, speed_series};

/// Start the TUI.
pub fn run(config: MonitorConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    EditingPath,
    Browsing,
}

struct App {
    monitor: Monitor,
    ticker: Ticker,
    mode: Mode,
    path_input: String,
    browse: Vec<PathBuf>,
    browse_selected: usize,
    /// Feedback for the last key action; cleared when the data changes.
    notice: Option<String>,
}

impl App {
    fn new(config: MonitorConfig) -> Self {
        Self {
            monitor: Monitor::new(config.data_file),
            ticker: Ticker::new(config.poll_interval, Instant::now()),
            mode: Mode::Normal,
            path_input: String::new(),
            browse: Vec::new(),
            browse_selected: 0,
            notice: None,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            let timeout = self.ticker.time_until_due(Instant::now());
            if event::poll(timeout).map_err(|e| AppError::runtime(format!("Event poll error: {e}")))? {
                match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                    Event::Key(key) => {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        if self.handle_key(key.code) {
                            break;
                        }
                        needs_redraw = true;
                    }
                    Event::Resize(_, _) => {
                        needs_redraw = true;
                    }
                    _ => {}
                }
            }

            if self.ticker.poll(Instant::now()) {
                if self.monitor.tick() {
                    self.notice = None;
                    needs_redraw = true;
                }
                // The "updated Ns ago" text moves even when the file does not.
                if self.shows_age() {
                    needs_redraw = true;
                }
            }
        }

        tracing::info!("tui closed");
        Ok(())
    }

    fn shows_age(&self) -> bool {
        self.monitor.status() == MonitorStatus::Updated
            && self.monitor.record().and_then(|r| r.timestamp_unix()).is_some()
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match self.mode {
            Mode::EditingPath => {
                self.handle_path_edit(code);
                return false;
            }
            Mode::Browsing => {
                self.handle_browse(code);
                return false;
            }
            Mode::Normal => {}
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('e') => {
                self.path_input = self.monitor.path().display().to_string();
                self.mode = Mode::EditingPath;
                self.notice = Some("Editing path. Enter to apply, Esc to cancel.".to_string());
            }
            KeyCode::Char('b') => {
                self.browse = discover_data_files();
                if self.browse.is_empty() {
                    self.notice = Some("No .txt files found under the current directory.".to_string());
                } else {
                    self.browse_selected = 0;
                    self.mode = Mode::Browsing;
                    self.notice = None;
                }
            }
            KeyCode::Char('r') => {
                self.monitor.force_reload();
                self.ticker.trigger(Instant::now());
                self.notice = Some("Reloading.".to_string());
            }
            KeyCode::Char('c') => {
                self.switch_path(String::new());
            }
            _ => {}
        }
        false
    }

    fn handle_path_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.notice = Some("Path edit canceled.".to_string());
            }
            KeyCode::Enter => {
                self.mode = Mode::Normal;
                let input = std::mem::take(&mut self.path_input);
                self.switch_path(input);
            }
            KeyCode::Backspace => {
                self.path_input.pop();
            }
            KeyCode::Char(c) => {
                self.path_input.push(c);
            }
            _ => {}
        }
    }

    fn handle_browse(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
            }
            KeyCode::Up => {
                self.browse_selected = self.browse_selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.browse_selected + 1 < self.browse.len() {
                    self.browse_selected += 1;
                }
            }
            KeyCode::Enter => {
                self.mode = Mode::Normal;
                if let Some(path) = self.browse.get(self.browse_selected) {
                    let path = pretty_path(path);
                    self.switch_path(path);
                }
            }
            _ => {}
        }
    }

    fn switch_path(&mut self, path: String) {
        self.monitor.set_path(&path);
        self.ticker.trigger(Instant::now());
        self.notice = None;
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        let display = WindDisplay::from_record(self.monitor.record());
        self.draw_header(frame, chunks[0], &display);
        self.draw_body(frame, chunks[1], &display);
        self.draw_footer(frame, chunks[2]);

        match self.mode {
            Mode::EditingPath => self.draw_path_editor(frame, size),
            Mode::Browsing => self.draw_browser(frame, size),
            Mode::Normal => {}
        }
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect, display: &WindDisplay) {
        let path = self.monitor.path().display().to_string();
        let last_change = self
            .monitor
            .last_change()
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());

        let lines = vec![
            Line::from(vec![
                Span::styled("windy", Style::default().fg(Color::Cyan)),
                Span::raw(" — wind monitor + forecasts"),
            ]),
            Line::from(Span::styled(
                format!("file: {}", if path.is_empty() { "-" } else { path.as_str() }),
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                format!("body: {} | last change: {last_change}", display.body),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect, display: &WindDisplay) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(36), Constraint::Min(0)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Length(5), Constraint::Min(0)])
            .split(columns[0]);

        self.draw_current(frame, left[0], display);
        self.draw_forecasts(frame, left[1], display);
        self.draw_chart(frame, columns[1]);
    }

    fn draw_current(&self, frame: &mut ratatui::Frame<'_>, area: Rect, display: &WindDisplay) {
        let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        let label = Style::default().fg(Color::Gray);

        let lines = vec![
            Line::from(vec![
                Span::styled("Speed (m/s):     ", label),
                Span::styled(display.speed.clone(), value),
            ]),
            Line::from(vec![
                Span::styled("Direction (deg): ", label),
                Span::styled(display.direction.clone(), value),
                Span::raw(" "),
                Span::styled(display.compass, Style::default().fg(Color::Cyan)),
            ]),
            Line::from(vec![
                Span::styled("Altitude (m):    ", label),
                Span::raw(display.altitude.clone()),
            ]),
        ];

        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title("Current Wind").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_forecasts(&self, frame: &mut ratatui::Frame<'_>, area: Rect, display: &WindDisplay) {
        let lines: Vec<Line> = display
            .forecasts
            .iter()
            .map(|f| {
                Line::from(vec![
                    Span::styled(format!("{:<9}", format!("{}:", f.label)), Style::default().fg(Color::Gray)),
                    Span::raw(format!("{:>6} m/s @ ", f.speed)),
                    Span::raw(f.direction.clone()),
                ])
            })
            .collect();

        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title("Forecasts").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Speed Outlook").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let points = self.monitor.record().map(speed_series).unwrap_or_default();
        if points.len() < 2 {
            let msg = Paragraph::new("Waiting for forecast data...").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }

        let (x_bounds, y_bounds) = chart_bounds(&points);
        let widget = ForecastChart {
            points: &points,
            x_bounds,
            y_bounds,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "e edit path  b browse  r reload  c clear  q quit";
        let status = status_line(
            self.monitor.status(),
            self.monitor.path(),
            self.monitor.record(),
            now_unix(),
        );

        let mut spans = vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(status, status_style(self.monitor.status())),
        ];
        if let Some(notice) = &self.notice {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(notice.as_str(), Style::default().fg(Color::Yellow)));
        }

        let p = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_path_editor(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rect = centered(area, 70, 3);
        frame.render_widget(Clear, rect);
        let p = Paragraph::new(format!("{}_", self.path_input))
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .block(Block::default().title("Data file").borders(Borders::ALL));
        frame.render_widget(p, rect);
    }

    fn draw_browser(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let height = (self.browse.len() as u16).saturating_add(2).min(area.height.saturating_sub(2));
        let rect = centered(area, 70, height.max(3));
        frame.render_widget(Clear, rect);

        let items: Vec<ListItem> = self
            .browse
            .iter()
            .map(|p| ListItem::new(pretty_path(p)))
            .collect();
        let list = List::new(items)
            .block(Block::default().title("Select data file (Enter/Esc)").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.browse_selected));
        frame.render_stateful_widget(list, rect, &mut state);
    }
}

fn status_style(status: MonitorStatus) -> Style {
    match status {
        MonitorStatus::Updated => Style::default().fg(Color::Green),
        MonitorStatus::Invalid | MonitorStatus::NotFound => Style::default().fg(Color::Red),
        MonitorStatus::Waiting | MonitorStatus::NoPath => Style::default().fg(Color::Yellow),
    }
}

/// A `width`-column, `height`-row rect centered in `area` (clamped to fit).
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
