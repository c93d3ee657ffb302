// Presentation controller: owns the single Board for the current game plus
// cursor, modal and config state. Input events come in, board calls go out.

use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
use log::{debug, info, warn};
use ratatui::layout::Rect;
use std::path::PathBuf;

use crate::tsw_board::{Board, GameState, Outcome};
use crate::tsw_error::Result;
use crate::tsw_game::{Config, Difficulty, save_config_to};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Help,
    Difficulty { hover: usize },
    Result(Outcome),
}

/// Screen areas recorded while drawing, used to route mouse clicks
#[derive(Debug, Clone, Copy, Default)]
pub struct HitAreas {
    pub board: Option<Rect>,
    pub restart: Option<Rect>,
    pub modal: Option<Rect>,
    pub close: Option<Rect>,
}

pub struct App {
    pub cfg: Config,
    pub board: Board,
    pub cursor: (usize, usize), // (row, col)
    pub modal: Option<Modal>,
    pub new_record: bool,
    pub should_quit: bool,
    pub hit: HitAreas,
    /// None when the config file must not be written
    config_file: Option<PathBuf>,
}

fn contains(r: Rect, x: u16, y: u16) -> bool {
    x >= r.x && x < r.x + r.width && y >= r.y && y < r.y + r.height
}

impl App {
    pub fn new(cfg: Config, config_file: Option<PathBuf>) -> Result<Self> {
        let board = cfg.difficulty.new_board()?;
        info!(
            "New {} game: {}x{}, {} mines",
            cfg.difficulty.name(),
            board.rows(),
            board.cols(),
            board.mine_count()
        );
        Ok(App {
            cfg,
            board,
            cursor: (0, 0),
            modal: None,
            new_record: false,
            should_quit: false,
            hit: HitAreas::default(),
            config_file,
        })
    }

    /// Throw the current board away and deal a new one
    pub fn restart(&mut self) -> Result<()> {
        self.board = self.cfg.difficulty.new_board()?;
        self.cursor = (
            self.cursor.0.min(self.board.rows() - 1),
            self.cursor.1.min(self.board.cols() - 1),
        );
        self.modal = None;
        self.new_record = false;
        info!("Restarted ({})", self.cfg.difficulty.name());
        Ok(())
    }

    pub fn select_difficulty(&mut self, index: usize) -> Result<()> {
        let d = match Difficulty::ALL.get(index) {
            Some(d) if d.is_custom() => self.cfg.custom_difficulty(),
            Some(d) => *d,
            None => return Ok(()),
        };
        self.cfg.difficulty = d;
        self.save();
        self.restart()
    }

    pub fn cursor_id(&self) -> usize {
        self.cursor.0 * self.board.cols() + self.cursor.1
    }

    pub fn move_cursor(&mut self, dr: isize, dc: isize) {
        let max_r = (self.board.rows() - 1) as isize;
        let max_c = (self.board.cols() - 1) as isize;
        let r = (self.cursor.0 as isize + dr).clamp(0, max_r) as usize;
        let c = (self.cursor.1 as isize + dc).clamp(0, max_c) as usize;
        self.cursor = (r, c);
    }

    pub fn reveal(&mut self, id: usize) -> Result<()> {
        let before = self.board.state();
        let out = self.board.reveal(id)?;
        self.after_move(before, out.state);
        Ok(())
    }

    pub fn toggle_flag(&mut self, id: usize) -> Result<()> {
        let before = self.board.state();
        let out = self.board.toggle_flag(id)?;
        self.after_move(before, out.state);
        Ok(())
    }

    /// Seconds shown in the result dialog and used for records
    pub fn elapsed_secs(&self) -> u64 {
        self.board.clock_snapshot().elapsed_secs(chrono::Local::now())
    }

    fn after_move(&mut self, before: GameState, after: GameState) {
        let GameState::Ended(outcome) = after else {
            return;
        };
        if before.is_ended() {
            return;
        }
        if outcome == Outcome::Won {
            let secs = self.elapsed_secs();
            let difficulty = self.cfg.difficulty;
            self.new_record = self.cfg.set_record(&difficulty, secs);
            if self.new_record {
                info!("New record for {}: {secs}s", self.cfg.difficulty.name());
                self.save();
            }
        }
        self.modal = Some(Modal::Result(outcome));
    }

    pub fn save(&self) {
        let Some(path) = &self.config_file else {
            debug!("Config not saved: no writable config file");
            return;
        };
        if let Err(e) = save_config_to(path, &self.cfg) {
            warn!("Could not save config: {e}");
        }
    }

    /// Map a terminal position to the cell drawn there.
    /// Each cell is two columns wide inside the board border.
    pub fn cell_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.hit.board?;
        let x0 = area.x + 1;
        let y0 = area.y + 1;
        if column < x0 || row < y0 {
            return None;
        }
        let col = ((column - x0) / 2) as usize;
        let r = (row - y0) as usize;
        self.board.id_at(r, col)
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<()> {
        match self.modal {
            Some(Modal::Difficulty { hover }) => return self.difficulty_key(code, hover),
            Some(_) => {
                match code {
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') => self.modal = None,
                    KeyCode::F(2) | KeyCode::Char('r') | KeyCode::Char('R') => self.restart()?,
                    KeyCode::Char('q') => self.should_quit = true,
                    _ => {}
                }
                return Ok(());
            }
            None => {}
        }
        match code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::F(1) | KeyCode::Char('?') => self.modal = Some(Modal::Help),
            KeyCode::F(2) | KeyCode::Char('r') | KeyCode::Char('R') => self.restart()?,
            KeyCode::F(5) | KeyCode::Char('d') | KeyCode::Char('D') => {
                self.modal = Some(Modal::Difficulty {
                    hover: self.cfg.difficulty.to_index(),
                })
            }
            KeyCode::Left => self.move_cursor(0, -1),
            KeyCode::Right => self.move_cursor(0, 1),
            KeyCode::Up => self.move_cursor(-1, 0),
            KeyCode::Down => self.move_cursor(1, 0),
            KeyCode::Char(' ') | KeyCode::Enter => self.reveal(self.cursor_id())?,
            KeyCode::Char('f') | KeyCode::Char('F') => self.toggle_flag(self.cursor_id())?,
            _ => {}
        }
        Ok(())
    }

    fn difficulty_key(&mut self, code: KeyCode, hover: usize) -> Result<()> {
        let n = Difficulty::ALL.len();
        match code {
            KeyCode::Esc => self.modal = None,
            KeyCode::Up => self.modal = Some(Modal::Difficulty { hover: (hover + n - 1) % n }),
            KeyCode::Down => self.modal = Some(Modal::Difficulty { hover: (hover + 1) % n }),
            KeyCode::Enter | KeyCode::Char(' ') => self.select_difficulty(hover)?,
            KeyCode::Char(c) => {
                if let Some(i) = c.to_digit(10).and_then(|d| (d as usize).checked_sub(1)) {
                    if i < n {
                        self.select_difficulty(i)?;
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    pub fn handle_mouse(&mut self, kind: MouseEventKind, column: u16, row: u16) -> Result<()> {
        let on_restart = self.hit.restart.is_some_and(|r| contains(r, column, row));
        if let Some(modal) = self.modal {
            if let MouseEventKind::Down(MouseButton::Left) = kind {
                if on_restart {
                    return self.restart();
                }
                if self.hit.close.is_some_and(|r| contains(r, column, row)) {
                    self.modal = None;
                } else if let (Modal::Difficulty { .. }, Some(area)) = (modal, self.hit.modal) {
                    // items start on the second inner line of the dialog
                    let first = area.y + 2;
                    if contains(area, column, row) && row >= first {
                        let i = (row - first) as usize;
                        if i < Difficulty::ALL.len() {
                            self.select_difficulty(i)?;
                        }
                    }
                }
            }
            return Ok(());
        }

        let cell = self.cell_at(column, row);
        match kind {
            MouseEventKind::Moved => {
                if let Some(id) = cell {
                    self.cursor = (id / self.board.cols(), id % self.board.cols());
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if on_restart {
                    self.restart()?;
                } else if let Some(id) = cell {
                    self.cursor = (id / self.board.cols(), id % self.board.cols());
                    self.reveal(id)?;
                }
            }
            MouseEventKind::Down(MouseButton::Right) => {
                if let Some(id) = cell {
                    self.cursor = (id / self.board.cols(), id % self.board.cols());
                    self.toggle_flag(id)?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}
