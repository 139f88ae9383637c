use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState};

use pes21_fantasy::catalog::{Catalog, Player};
use pes21_fantasy::config::{RosterConfig, STARTER_CAP, SUBSTITUTE_CAP};
use pes21_fantasy::roster::Side;
use pes21_fantasy::state::{AppState, Focus, PRICE_STEP, Screen, focus_label, screen_label};
use pes21_fantasy::view::{Alert, PitchView, ViewModel};

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(state: AppState) -> Self {
        Self {
            state,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.search_active {
            self.on_search_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Char('1') => self.state.screen = Screen::Market,
            KeyCode::Char('2') => self.state.screen = Screen::Pitch,
            KeyCode::Tab => self.state.cycle_focus(),
            KeyCode::Char('/') => self.state.search_active = true,
            KeyCode::Char('f') | KeyCode::Char('F') => self.state.cycle_formation(),
            KeyCode::Char('c') => self.state.clear_roster(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('s') => self.state.toggle_selected(Side::Starters),
            KeyCode::Char('r') => self.state.toggle_selected(Side::Substitutes),
            KeyCode::Char('[') => self.state.adjust_price_min(-PRICE_STEP),
            KeyCode::Char(']') => self.state.adjust_price_min(PRICE_STEP),
            KeyCode::Char('-') => self.state.adjust_price_max(-PRICE_STEP),
            KeyCode::Char('+') | KeyCode::Char('=') => self.state.adjust_price_max(PRICE_STEP),
            KeyCode::Char('h') | KeyCode::Left => self.on_horizontal(false),
            KeyCode::Char('l') | KeyCode::Right => self.on_horizontal(true),
            KeyCode::Char(' ') | KeyCode::Enter => self.state.toggle_option_at_cursor(),
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.state.search_active = false,
            KeyCode::Esc => self.state.clear_search(),
            KeyCode::Backspace => self.state.pop_search_char(),
            KeyCode::Char(c) => self.state.push_search_char(c),
            _ => {}
        }
    }

    fn on_horizontal(&mut self, forward: bool) {
        match self.state.focus {
            Focus::Positions | Focus::Ranks => self.state.move_option_cursor(forward),
            Focus::Price => {
                let step = if forward { PRICE_STEP } else { -PRICE_STEP };
                self.state.adjust_price_max(step);
            }
            Focus::Table => {}
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let config = RosterConfig::from_env().with_args(&args);
    // Load before touching the terminal so a bad catalog prints a plain diagnostic.
    let catalog = Catalog::load(&config.catalog_path).context("startup aborted")?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(AppState::new(Arc::new(catalog), config));
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let state = &app.state;
    let view = state.view();

    let header = Paragraph::new(header_text(state))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match state.screen {
        Screen::Market => render_market(frame, chunks[1], state, &view),
        Screen::Pitch => render_pitch_screen(frame, chunks[1], &view),
    }

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let roster = &state.selection.roster;
    format!(
        "PES 21 FANTASY | {} | Formation {} | Starters {}/{STARTER_CAP} | Subs {}/{SUBSTITUTE_CAP} | Focus: {}",
        screen_label(state.screen),
        state.selection.formation.label(),
        roster.starters().len(),
        roster.substitutes().len(),
        focus_label(state.focus)
    )
}

fn footer_text(state: &AppState) -> String {
    if state.search_active {
        return "Type to search | Enter Done | Esc Clear | Backspace Delete".to_string();
    }
    match state.screen {
        Screen::Market => "Tab Focus | j/k Move | s Starter | r Sub | Space Toggle | h/l Cursor | [ ] Min | - + Max | / Search | f Formation | 2 Pitch | ? Help | q Quit".to_string(),
        Screen::Pitch => "1 Market | f Formation | c Clear | ? Help | q Quit".to_string(),
    }
}

fn render_market(frame: &mut Frame, area: Rect, state: &AppState, view: &ViewModel) {
    let alert_height = view.alerts.len() as u16;
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Length(alert_height),
            Constraint::Min(3),
        ])
        .split(area);

    render_filters(frame, sections[0], state);
    render_metrics(frame, sections[1], view);
    render_alerts(frame, sections[2], &view.alerts);
    render_table(frame, sections[3], state, view);
}

fn render_filters(frame: &mut Frame, area: Rect, state: &AppState) {
    let criteria = &state.selection.criteria;
    let focused = |focus: Focus| {
        if state.focus == focus {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    };

    let positions = option_line(
        "Positions",
        &state.position_options(),
        |opt| criteria.positions.contains(opt),
        (state.focus == Focus::Positions).then_some(state.position_cursor),
    )
    .style(focused(Focus::Positions));
    let ranks = option_line(
        "Ranks",
        &state.rank_options(),
        |opt| criteria.ranks.contains(opt),
        (state.focus == Focus::Ranks).then_some(state.rank_cursor),
    )
    .style(focused(Focus::Ranks));

    let bounds = state
        .price_bounds
        .map(|b| format!(" (range {:.0}-{:.0})", b.min, b.max))
        .unwrap_or_default();
    let price = Line::from(format!(
        "Price: {:.0} - {:.0}{bounds}",
        criteria.price_min, criteria.price_max
    ))
    .style(focused(Focus::Price));

    let cursor = if state.search_active { "_" } else { "" };
    let search = Line::from(format!("Search: {}{cursor}", criteria.name_query));

    let text = Text::from(vec![positions, ranks, price, search]);
    let block = Block::default().title("Filters").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn option_line<'a>(
    title: &'a str,
    options: &[&'a str],
    is_on: impl Fn(&str) -> bool,
    cursor: Option<usize>,
) -> Line<'a> {
    let mut spans = vec![Span::raw(format!("{title}: "))];
    for (idx, opt) in options.iter().enumerate() {
        let mark = if is_on(opt) { "[x]" } else { "[ ]" };
        let mut style = Style::default();
        if cursor == Some(idx) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        spans.push(Span::styled(format!("{mark}{opt}"), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn render_metrics(frame: &mut Frame, area: Rect, view: &ViewModel) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(area);

    let (spent, remaining, rating, over) = match &view.metrics {
        Some(m) => (
            format!("{:.1} coins", m.total_cost),
            format!("{:.1}", m.remaining),
            format!("{:.1}", m.avg_overall),
            m.is_over_budget(),
        ),
        None => ("-".to_string(), "-".to_string(), "-".to_string(), false),
    };
    let remaining_style = if over {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };

    render_card(frame, cols[0], "Total spent", &spent, Style::default());
    render_card(frame, cols[1], "Remaining", &remaining, remaining_style);
    render_card(frame, cols[2], "Team overall", &rating, Style::default());
}

fn render_card(frame: &mut Frame, area: Rect, title: &str, value: &str, style: Style) {
    let card = Paragraph::new(value.to_string())
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(card, area);
}

fn render_alerts(frame: &mut Frame, area: Rect, alerts: &[Alert]) {
    if area.height == 0 {
        return;
    }
    let lines: Vec<Line> = alerts
        .iter()
        .map(|alert| {
            let style = if alert.is_error() {
                Style::default().fg(Color::White).bg(Color::Red)
            } else {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            };
            Line::from(format!(" ! {}", alert.message())).style(style)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_table(frame: &mut Frame, area: Rect, state: &AppState, view: &ViewModel) {
    let title = format!("Players ({} of {})", view.filtered.len(), state.catalog.len());
    let block = Block::default().title(title).borders(Borders::ALL);
    if view.filtered.is_empty() {
        let empty = Paragraph::new("No players match these filters")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(
        std::iter::once("").chain(view.columns.iter().copied()).map(Cell::from),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let roster = &state.selection.roster;
    let rows = view.filtered.iter().map(|p| {
        let marker = match roster.side_of(&p.name) {
            Some(Side::Starters) => "S",
            Some(Side::Substitutes) => "R",
            None => "",
        };
        Row::new(std::iter::once(marker.to_string()).chain(player_cells(p)))
    });

    let mut widths = vec![
        Constraint::Length(2),
        Constraint::Min(18),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(7),
        Constraint::Length(8),
    ];
    widths.extend(state.catalog.extra_columns().iter().map(|_| Constraint::Length(10)));

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().fg(Color::White).bg(Color::DarkGray));
    let mut table_state = TableState::default().with_selected(Some(state.selected));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn player_cells(p: &Player) -> Vec<String> {
    let mut cells = vec![
        p.name.clone(),
        p.position.clone(),
        p.rank.clone(),
        format!("{:.1}", p.price),
        format!("{:.0}", p.overall),
    ];
    cells.extend(p.extras.iter().cloned());
    cells
}

fn render_pitch_screen(frame: &mut Frame, area: Rect, view: &ViewModel) {
    let Some(pitch) = &view.pitch else {
        let message = view.pitch_warning().map(Alert::message).unwrap_or_default();
        let warning = Paragraph::new(message)
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().title("Pitch").borders(Borders::ALL));
        frame.render_widget(warning, area);
        return;
    };

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(2, 3), Constraint::Ratio(1, 3)])
        .split(area);

    render_pitch(frame, cols[0], pitch);
    render_bench(frame, cols[1], pitch);
}

fn render_pitch(frame: &mut Frame, area: Rect, pitch: &PitchView) {
    let block = Block::default()
        .title(format!("Pitch {}", pitch.formation))
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::Rgb(0, 100, 0)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    const MARKER_HEIGHT: u16 = 2;
    if inner.width < 4 || inner.height < MARKER_HEIGHT {
        return;
    }

    for placed in &pitch.placed {
        let label = format!("{}\n{}", placed.name, placed.rating_text());
        let width = (placed.name.chars().count() as u16 + 2).min(inner.width);
        let cx = inner.x + (u32::from(inner.width) * u32::from(placed.left) / 100) as u16;
        let cy = inner.y + (u32::from(inner.height) * u32::from(placed.top) / 100) as u16;
        let x = cx
            .saturating_sub(width / 2)
            .clamp(inner.x, inner.x + inner.width - width);
        let y = cy
            .saturating_sub(MARKER_HEIGHT / 2)
            .clamp(inner.y, inner.y + inner.height - MARKER_HEIGHT);
        let marker_area = Rect {
            x,
            y,
            width,
            height: MARKER_HEIGHT,
        };
        let color = placed.color.parse::<Color>().unwrap_or(Color::Green);
        let marker = Paragraph::new(label)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD));
        frame.render_widget(marker, marker_area);
    }
}

fn render_bench(frame: &mut Frame, area: Rect, pitch: &PitchView) {
    let block = Block::default().title("Bench").borders(Borders::ALL);
    if pitch.bench.is_empty() {
        let empty = Paragraph::new("No substitutes selected")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let rows = pitch.bench.iter().map(|p| {
        Row::new(vec![
            p.name.clone(),
            p.position.clone(),
            format!("{:.1}", p.price),
            format!("{:.0}", p.overall),
        ])
    });
    let widths = [
        Constraint::Min(14),
        Constraint::Length(4),
        Constraint::Length(6),
        Constraint::Length(4),
    ];
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(block.inner(area));
    frame.render_widget(block, area);

    let table = Table::new(rows, widths).header(
        Row::new(vec!["Player", "Pos", "Price", "OVR"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(table, sections[0]);

    let cost = Paragraph::new(format!("Bench cost: {:.1} coins", pitch.bench_cost));
    frame.render_widget(cost, sections[1]);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(2)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "PES 21 Fantasy - Help",
        "",
        "Global:",
        "  1 / 2        Market / Pitch",
        "  Tab          Cycle focus (table, positions, ranks, price)",
        "  /            Search by name",
        "  f            Cycle formation",
        "  c            Clear roster",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Market:",
        "  j/k or ↑/↓   Move",
        "  s / r        Toggle starter / substitute",
        "  h/l or ←/→   Move option cursor (price focus: upper bound)",
        "  Space        Toggle option",
        "  [ / ]        Lower price bound",
        "  - / +        Upper price bound",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
