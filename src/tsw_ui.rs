use chrono::{DateTime, Local};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind, MouseEvent};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{cursor, execute, terminal};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};
use log::warn;
use std::io::{self, Write};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

use crate::tsw_app::{App, HitAreas, Modal};
use crate::tsw_board::{CellView, GameState, Outcome};
use crate::tsw_clock::clock_display;
use crate::tsw_color::{ColorDepth, Palette};
use crate::tsw_error::Result;
use crate::tsw_game::Difficulty;

/// Clock label refresh interval
const TICK_RATE: Duration = Duration::from_secs(1);

const RESTART_LABEL: &str = " Restart ";
const MENU_KEYS: [(&str, &str); 3] = [("F1", "Help"), ("F2", "New"), ("F5", "Difficulty")];

struct Glyphs {
    unopened: &'static str,
    flag: &'static str,
    mine: &'static str,
    indicator: &'static str,
}

impl Glyphs {
    fn new(ascii: bool) -> Self {
        Glyphs {
            unopened: if ascii { "#" } else { "■" },
            flag: if ascii { "F" } else { "⚑" },
            mine: if ascii { "*" } else { "☼" },
            indicator: if ascii { ">" } else { "▸" },
        }
    }
}

/// Puts the terminal back on drop, whichever step of setup or the loop failed.
/// Every restore step runs even when an earlier one errors.
struct TerminalGuard<W: Write> {
    out: W,
    raw_mode: bool,
}

impl<W: Write> TerminalGuard<W> {
    fn enter(out: W) -> Result<Self> {
        let mut guard = TerminalGuard { out, raw_mode: false };
        execute!(guard.out, EnableMouseCapture, terminal::EnterAlternateScreen)?;
        enable_raw_mode()?;
        guard.raw_mode = true;
        Ok(guard)
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if self.raw_mode {
            if let Err(e) = disable_raw_mode() {
                warn!("Could not leave raw mode: {e}");
            }
        }
        if let Err(e) = execute!(self.out, DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show) {
            warn!("Could not restore the screen: {e}");
        }
    }
}

pub fn run(app: &mut App) -> Result<()> {
    let _guard = TerminalGuard::enter(io::stdout())?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    event_loop(&mut terminal, app)
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let palette = Palette::new(ColorDepth::detect());
    let mut last_tick = Instant::now();

    while !app.should_quit {
        let glyphs = Glyphs::new(app.cfg.ascii_icons);
        let now = Local::now();
        terminal.draw(|f| draw(f, app, &palette, &glyphs, now))?;

        let timeout = TICK_RATE.checked_sub(last_tick.elapsed()).unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            match event::read()? {
                // Windows also reports releases; act on presses only
                Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) => app.handle_key(code)?,
                Event::Mouse(MouseEvent { kind, column, row, .. }) => app.handle_mouse(kind, column, row)?,
                _ => {}
            }
        }
        if last_tick.elapsed() >= TICK_RATE {
            last_tick = Instant::now();
        }
    }
    Ok(())
}

fn draw<B: Backend>(f: &mut Frame<B>, app: &mut App, p: &Palette, g: &Glyphs, now: DateTime<Local>) {
    let size = f.size();
    app.hit = HitAreas::default();

    let board_w = (app.board.cols() * 2 + 3) as u16;
    let board_h = (app.board.rows() + 2) as u16;
    let min_w = 64u16.max(board_w + 2);
    let min_h = board_h + 6;
    // If terminal too small, render a centered warning and skip normal UI
    if size.width < min_w || size.height < min_h {
        let warn_lines = vec![
            Spans::from(Span::raw("Terminal size too small.")),
            Spans::from(Span::raw(format!("Minimum required: {} x {}", min_w, min_h))),
        ];
        let warn = Paragraph::new(Text::from(warn_lines))
            .block(Block::default().borders(Borders::ALL).title("Resize Terminal"))
            .alignment(Alignment::Center);
        f.render_widget(Clear, size);
        let w = 40u16.min(size.width.saturating_sub(2));
        let h = 5u16.min(size.height.saturating_sub(2));
        f.render_widget(warn, center_rect(w, h, size));
        return;
    }

    // layout: clock/menu row, board, status row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(board_h), Constraint::Length(3)].as_ref())
        .split(size);

    draw_top_bar(f, app, p, chunks[0], now);
    draw_board(f, app, p, g, chunks[1]);
    draw_status(f, app, p, chunks[2]);

    if let Some(modal) = app.modal {
        match modal {
            Modal::Help => draw_help(f, app, p, size),
            Modal::Difficulty { hover } => draw_difficulty(f, app, p, hover, size),
            Modal::Result(outcome) => draw_result(f, app, p, outcome, size),
        }
    }
}

fn draw_top_bar<B: Backend>(f: &mut Frame<B>, app: &mut App, p: &Palette, area: Rect, now: DateTime<Local>) {
    let clock = clock_display(&app.board, now);
    let button_style = Style::default().bg(p.button_bg).fg(p.button_fg).add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(p.menu_key).add_modifier(Modifier::BOLD);

    let mut spans = vec![Span::raw(" "), Span::styled(RESTART_LABEL, button_style)];
    let mut left_w = 1 + RESTART_LABEL.width();
    for (key, rest) in MENU_KEYS {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(key, key_style));
        spans.push(Span::raw(format!(": {}", rest)));
        left_w += 3 + key.width() + 2 + rest.width();
    }
    let inner_w = area.width.saturating_sub(2) as usize;
    let right_w = clock.width() + 1;
    let gap = inner_w.saturating_sub(left_w + right_w).max(1);
    spans.push(Span::raw(" ".repeat(gap)));
    spans.push(Span::styled(clock, Style::default().add_modifier(Modifier::BOLD)));
    spans.push(Span::raw(" "));

    let bar = Paragraph::new(Spans::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(bar, area);
    app.hit.restart = Some(Rect::new(area.x + 2, area.y + 1, RESTART_LABEL.width() as u16, 1));
}

fn cell_span(view: CellView, p: &Palette, g: &Glyphs) -> (String, Style) {
    let base = Style::default().bg(p.board_bg);
    match view {
        CellView::Hidden => (g.unopened.to_string(), base.fg(p.unopened)),
        CellView::Flagged => (g.flag.to_string(), base.fg(p.flag)),
        CellView::Open(0) => (" ".to_string(), base),
        CellView::Open(n) => (n.to_string(), base.fg(p.number(n)).add_modifier(Modifier::BOLD)),
        CellView::Mine => (g.mine.to_string(), base.fg(p.mine)),
        CellView::FlaggedMine => (g.flag.to_string(), base.fg(p.won).add_modifier(Modifier::BOLD)),
        CellView::Detonated => (g.mine.to_string(), base.fg(p.mine).bg(p.detonated_bg)),
    }
}

fn draw_board<B: Backend>(f: &mut Frame<B>, app: &mut App, p: &Palette, g: &Glyphs, area: Rect) {
    let rows = app.board.rows();
    let cols = app.board.cols();
    let board_area = center_rect((cols * 2 + 3) as u16, (rows + 2) as u16, area);
    app.hit.board = Some(board_area);

    let mut lines = Vec::with_capacity(rows);
    for r in 0..rows {
        let mut spans = Vec::with_capacity(cols + 1);
        for c in 0..cols {
            let id = r * cols + c;
            let view = app.board.cell_view(id).unwrap_or(CellView::Hidden);
            let (s, mut style) = cell_span(view, p, g);
            let at_cursor = app.cursor == (r, c);
            if at_cursor && !app.board.state().is_ended() {
                style = style.bg(p.cursor_bg);
            }
            if at_cursor && app.cfg.show_indicator {
                let indicator_style = style.fg(p.indicator).add_modifier(Modifier::BOLD);
                spans.push(Span::styled(g.indicator, indicator_style));
                spans.push(Span::styled(s, style));
            } else {
                spans.push(Span::styled(format!(" {}", s), style));
            }
        }
        // right padding column in the board background
        spans.push(Span::styled(" ", Style::default().bg(p.board_bg)));
        lines.push(Spans::from(spans));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.cfg.difficulty.name())
        .title_alignment(Alignment::Center);
    f.render_widget(Paragraph::new(Text::from(lines)).block(block), board_area);
}

fn state_label(state: GameState) -> &'static str {
    match state {
        GameState::NotStarted => "Ready",
        GameState::InProgress => "Playing",
        GameState::Ended(Outcome::Won) => "You win!",
        GameState::Ended(Outcome::Lost) => "Boom!",
    }
}

fn draw_status<B: Backend>(f: &mut Frame<B>, app: &App, p: &Palette, area: Rect) {
    let state = app.board.state();
    let left = format!(" Mines: {}   ", app.board.remaining_mines());
    let label = state_label(state);
    let label_style = match state {
        GameState::Ended(Outcome::Won) => Style::default().fg(p.won).add_modifier(Modifier::BOLD),
        GameState::Ended(Outcome::Lost) => Style::default().fg(p.lost).add_modifier(Modifier::BOLD),
        _ => Style::default(),
    };
    let (key, rest) = ("Esc", "Exit");
    let inner_w = area.width.saturating_sub(2) as usize;
    let used = left.width() + label.width() + key.width() + 2 + rest.width() + 1;
    let gap = inner_w.saturating_sub(used).max(1);

    let spans = vec![
        Span::raw(left),
        Span::styled(label, label_style),
        Span::raw(" ".repeat(gap)),
        Span::styled(key, Style::default().fg(p.menu_key).add_modifier(Modifier::BOLD)),
        Span::raw(format!(": {} ", rest)),
    ];
    let status = Paragraph::new(Spans::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(status, area);
}

/// Clear the dialog area, draw its frame and return the inner area
fn open_modal<B: Backend>(f: &mut Frame<B>, app: &mut App, title: &str, mrect: Rect) -> Rect {
    app.hit.modal = Some(mrect);
    f.render_widget(Clear, mrect);
    f.render_widget(Block::default().borders(Borders::ALL).title(title.to_string()), mrect);
    Rect::new(mrect.x + 1, mrect.y + 1, mrect.width.saturating_sub(2), mrect.height.saturating_sub(2))
}

/// Button on the last inner row of a dialog
fn close_button<B: Backend>(f: &mut Frame<B>, app: &mut App, p: &Palette, mrect: Rect, label: &str) {
    let btn_w = label.width() as u16;
    let bx = mrect.x + mrect.width.saturating_sub(btn_w) / 2;
    let by = mrect.y + mrect.height.saturating_sub(2);
    let btn_rect = Rect::new(bx, by, btn_w, 1);
    app.hit.close = Some(btn_rect);
    let style = Style::default().bg(p.button_bg).fg(p.button_fg).add_modifier(Modifier::BOLD);
    f.render_widget(Paragraph::new(Spans::from(Span::styled(label.to_string(), style))), btn_rect);
}

fn draw_help<B: Backend>(f: &mut Frame<B>, app: &mut App, p: &Palette, size: Rect) {
    let mrect = center_rect(50, 12, size);
    let inner = open_modal(f, app, "Help", mrect);
    let lines: Vec<Spans> = [
        "",
        " Controls:",
        "  Mouse | Arrows     - move cursor",
        "  L-Click | Space    - reveal",
        "  R-Click | F        - toggle flag",
        "  Restart | F2 | R   - new game",
        "  F5 | D             - difficulty",
        "",
        " Flag every mine to win.",
    ]
    .into_iter()
    .map(|s| Spans::from(Span::raw(s)))
    .collect();
    f.render_widget(Paragraph::new(Text::from(lines)), inner);
    close_button(f, app, p, mrect, " CLOSE ");
}

fn draw_difficulty<B: Backend>(f: &mut Frame<B>, app: &mut App, p: &Palette, hover: usize, size: Rect) {
    let mrect = center_rect(52, 10, size);
    let inner = open_modal(f, app, "Difficulty", mrect);
    let focus_style = Style::default().bg(p.cursor_bg).fg(p.button_fg).add_modifier(Modifier::BOLD);
    let selected = app.cfg.difficulty.to_index();

    let mut lines = vec![Spans::from(Span::raw(""))];
    for (i, d) in Difficulty::ALL.iter().enumerate() {
        let d = if d.is_custom() { app.cfg.custom_difficulty() } else { *d };
        let (rows, cols, mines) = d.params();
        let mark = if i == selected { "*" } else { " " };
        let name = d.name();
        let pad = 13usize.saturating_sub(name.width());
        let best = match app.cfg.get_record(&d) {
            Some(r) => format!("{}s", r.secs),
            None => "-".to_string(),
        };
        let text = format!(
            "{}{}) {}{} {:>2}x{:<2} {:>3} mines  {:>5}",
            mark,
            i + 1,
            name,
            " ".repeat(pad),
            rows,
            cols,
            mines,
            best
        );
        let line = if i == hover {
            Spans::from(vec![Span::raw(" "), Span::styled(text, focus_style)])
        } else {
            Spans::from(vec![Span::raw(" "), Span::raw(text)])
        };
        lines.push(line);
    }
    f.render_widget(Paragraph::new(Text::from(lines)), inner);
    close_button(f, app, p, mrect, " CLOSE ");
}

fn draw_result<B: Backend>(f: &mut Frame<B>, app: &mut App, p: &Palette, outcome: Outcome, size: Rect) {
    let mrect = bottom_centered_block(42, 8, size);
    let secs = app.elapsed_secs();
    let (title, lines) = match outcome {
        Outcome::Won => {
            let time_line = if app.new_record {
                format!("Time: {} seconds (New Record!)", secs)
            } else {
                format!("Time: {} seconds", secs)
            };
            let best_line = match app.cfg.get_record(&app.cfg.difficulty) {
                Some(r) if !app.new_record => format!("Best: {} seconds on {}", r.secs, r.date),
                _ => String::new(),
            };
            ("Success", vec![String::new(), "All mines flagged. You win!".to_string(), time_line, best_line])
        }
        Outcome::Lost => (
            "Failure",
            vec![String::new(), "Mine exploded. You lose!".to_string(), "Better luck next time.".to_string()],
        ),
    };
    let inner = open_modal(f, app, title, mrect);
    let lines: Vec<Spans> = lines.into_iter().map(|s| Spans::from(Span::raw(s))).collect();
    f.render_widget(Paragraph::new(Text::from(lines)).alignment(Alignment::Center), inner);
    close_button(f, app, p, mrect, " CLOSE ");
}

fn center_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn bottom_centered_block(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + r.height.saturating_sub(height);
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tsw_board::Board;
    use crate::tsw_game::Config;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    fn render(app: &mut App, w: u16, h: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
        let palette = Palette::new(ColorDepth::Basic);
        let glyphs = Glyphs::new(true);
        let now = Local::now();
        terminal.draw(|f| draw(f, app, &palette, &glyphs, now)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn text(buffer: &Buffer) -> String {
        buffer.content.iter().map(|c| c.symbol.as_str()).collect()
    }

    fn app() -> App {
        let mut app = App::new(Config::default(), None).unwrap();
        app.board = Board::with_mines(8, 8, &[0, 9]).unwrap();
        app
    }

    #[test]
    fn centered_rects() {
        let outer = Rect::new(0, 0, 80, 24);
        assert_eq!(center_rect(20, 10, outer), Rect::new(30, 7, 20, 10));
        assert_eq!(bottom_centered_block(20, 4, outer), Rect::new(30, 20, 20, 4));
        assert_eq!(center_rect(100, 30, outer), Rect::new(0, 0, 80, 24));
    }

    #[test]
    fn draw_records_hit_areas_that_match_cells() {
        let mut app = app();
        let screen = text(&render(&mut app, 80, 24));
        assert!(screen.contains("Restart"));
        assert!(screen.contains("Mines: 2"));
        let area = app.hit.board.unwrap();
        assert_eq!((area.width, area.height), (19, 10));
        assert_eq!(app.cell_at(area.x + 1, area.y + 1), Some(0));
        assert!(app.hit.restart.is_some());
        assert!(app.hit.modal.is_none());
    }

    #[test]
    fn too_small_terminal_shows_warning() {
        let mut app = app();
        let screen = text(&render(&mut app, 40, 10));
        assert!(screen.contains("too small"));
        assert!(app.hit.board.is_none());
    }

    #[test]
    fn loss_dialog_is_drawn() {
        let mut app = app();
        app.reveal(0).unwrap();
        let screen = text(&render(&mut app, 80, 24));
        assert!(screen.contains("You lose!"));
        assert!(screen.contains("Boom!"));
        assert!(app.hit.close.is_some());
    }

    #[test]
    fn difficulty_dialog_lists_best_times() {
        let mut app = app();
        app.cfg.set_record(&Difficulty::Beginner, 57);
        app.modal = Some(Modal::Difficulty { hover: 0 });
        let screen = text(&render(&mut app, 80, 24));
        assert!(screen.contains("Beginner"));
        assert!(screen.contains("57s"));
        assert!(screen.contains("99 mines"));
    }

    #[test]
    fn win_dialog_shows_previous_best() {
        let mut app = app();
        app.cfg.set_record(&Difficulty::Classic, 0);
        app.toggle_flag(0).unwrap();
        app.toggle_flag(9).unwrap();
        assert!(!app.new_record);
        let screen = text(&render(&mut app, 80, 24));
        assert!(screen.contains("You win!"));
        assert!(screen.contains("Best: 0 seconds"));
    }

    #[test]
    fn dropping_the_guard_restores_the_screen() {
        let mut out = Vec::new();
        drop(TerminalGuard { out: &mut out, raw_mode: false });
        let written = String::from_utf8(out).unwrap();
        // leave alternate screen, show cursor
        assert!(written.contains("\x1b[?1049l"));
        assert!(written.contains("\x1b[?25h"));
    }

    #[test]
    fn revealed_count_is_drawn_in_its_cell() {
        let mut app = app();
        app.reveal(1).unwrap();
        let buffer = render(&mut app, 80, 24);
        let area = app.hit.board.unwrap();
        // cell 1 spans inner columns 2..4, glyph in the second
        assert_eq!(buffer.get(area.x + 1 + 3, area.y + 1).symbol, "2");
    }
}
