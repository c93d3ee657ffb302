// Board model: the cell grid, mine placement, adjacency counting and game state
// Holds no reference to any rendering primitive; the UI reads it through CellView

use chrono::{DateTime, Local};
use log::{debug, info, warn};
use rand::prelude::*;
use std::fmt;

use crate::tsw_clock::ClockSnapshot;

/// Row/column offsets of the 8 grid neighbours, top-left first
const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

/// Game lifecycle. Only ever moves forward; restart builds a new Board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    NotStarted,
    InProgress,
    Ended(Outcome),
}

impl GameState {
    pub fn is_ended(&self) -> bool {
        matches!(self, GameState::Ended(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Zero-sized grid, or not enough room for the requested mines
    InvalidConfig { rows: usize, cols: usize, mines: usize },
    /// Cell id outside `0..rows*cols`; a caller bug
    IndexOutOfRange { id: usize, len: usize },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { rows, cols, mines } => {
                write!(f, "invalid board: {rows}x{cols} with {mines} mines")
            }
            Self::IndexOutOfRange { id, len } => {
                write!(f, "cell id {id} out of range (board has {len} cells)")
            }
        }
    }
}

impl std::error::Error for BoardError {}

/// One grid position. Row/column derive from the id: `id / cols`, `id % cols`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    id: usize,
    is_mine: bool,
    is_revealed: bool,
    is_flagged: bool,
}

impl Cell {
    fn new(id: usize) -> Self {
        Cell {
            id,
            is_mine: false,
            is_revealed: false,
            is_flagged: false,
        }
    }
}

#[cfg(test)]
impl Cell {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn is_mine(&self) -> bool {
        self.is_mine
    }

    pub fn is_revealed(&self) -> bool {
        self.is_revealed
    }

    pub fn is_flagged(&self) -> bool {
        self.is_flagged
    }

    pub fn row(&self, cols: usize) -> usize {
        self.id / cols
    }

    pub fn col(&self, cols: usize) -> usize {
        self.id % cols
    }
}

/// What a cell should look like right now, for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Hidden,
    Flagged,
    /// Revealed safe cell with its adjacency count
    Open(u8),
    /// Mine exposed at the end of a lost game
    Mine,
    /// Mine the player had flagged before losing
    FlaggedMine,
    /// The mine whose reveal lost the game
    Detonated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealedCell {
    pub id: usize,
    pub adjacent_mines: u8,
}

/// Result of a reveal. `mines_if_lost` is empty unless this reveal lost the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealOutcome {
    pub state: GameState,
    pub revealed: Vec<RevealedCell>,
    pub mines_if_lost: Vec<usize>,
}

impl RevealOutcome {
    fn unchanged(state: GameState) -> Self {
        RevealOutcome {
            state,
            revealed: Vec::new(),
            mines_if_lost: Vec::new(),
        }
    }
}

/// Result of a flag toggle. `flagged` is the cell's flag after the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagOutcome {
    pub state: GameState,
    pub flagged: bool,
    pub won: bool,
}

/// The full grid plus game state. One instance per game.
#[derive(Debug, Clone)]
pub struct Board {
    rows: usize,
    cols: usize,
    mine_count: usize,
    cells: Vec<Cell>,
    state: GameState,
    mines_placed: bool,
    start_time: Option<DateTime<Local>>,
    end_time: Option<DateTime<Local>>,
    detonated: Option<usize>,
}

impl Board {
    /// Build an empty board: no mines, nothing revealed or flagged
    pub fn new(rows: usize, cols: usize, mine_count: usize) -> Result<Self, BoardError> {
        let invalid = BoardError::InvalidConfig {
            rows,
            cols,
            mines: mine_count,
        };
        if rows == 0 || cols == 0 {
            return Err(invalid);
        }
        let total = rows.checked_mul(cols).ok_or(invalid.clone())?;
        if mine_count >= total {
            return Err(invalid);
        }

        Ok(Board {
            rows,
            cols,
            mine_count,
            cells: (0..total).map(Cell::new).collect(),
            state: GameState::NotStarted,
            mines_placed: false,
            start_time: None,
            end_time: None,
            detonated: None,
        })
    }

    /// Construct and place mines in one go. Used both for the first game and restart.
    pub fn new_game(rows: usize, cols: usize, mine_count: usize) -> Result<Self, BoardError> {
        let mut board = Board::new(rows, cols, mine_count)?;
        board.place_mines();
        Ok(board)
    }

    pub fn place_mines(&mut self) {
        let mut rng = thread_rng();
        self.place_mines_with(&mut rng);
    }

    /// Pick `mine_count` distinct ids uniformly at random, retrying on collision.
    /// Only the first call per board has any effect.
    pub fn place_mines_with<R: Rng>(&mut self, rng: &mut R) {
        if self.mines_placed {
            warn!("Mines already placed on this board; ignoring");
            return;
        }
        let total = self.cells.len();
        let mut placed = Vec::with_capacity(self.mine_count);
        while placed.len() < self.mine_count {
            let id = rng.gen_range(0..total);
            if self.cells[id].is_mine {
                continue;
            }
            self.cells[id].is_mine = true;
            placed.push(id);
        }
        self.mines_placed = true;
        debug!("Mine ids: {:?}", placed);
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn cell(&self, id: usize) -> Result<&Cell, BoardError> {
        self.check_id(id)?;
        Ok(&self.cells[id])
    }

    /// Convert (row, col) to a cell id, if inside the grid
    pub fn id_at(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.rows && col < self.cols {
            Some(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn mine_ids(&self) -> Vec<usize> {
        self.cells.iter().filter(|c| c.is_mine).map(|c| c.id).collect()
    }

    pub fn flagged_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_flagged).count()
    }

    /// Mines not yet covered by a flag
    pub fn unflagged_mines(&self) -> usize {
        let flagged_mines = self
            .cells
            .iter()
            .filter(|c| c.is_mine && c.is_flagged)
            .count();
        self.mine_count - flagged_mines
    }

    /// Mine counter display value: total mines minus flags placed.
    /// Goes negative when the player over-flags.
    pub fn remaining_mines(&self) -> isize {
        self.mine_count as isize - self.flagged_count() as isize
    }

    pub fn clock_snapshot(&self) -> ClockSnapshot {
        ClockSnapshot {
            state: self.state,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }

    /// Number of mines among the grid neighbours of `id` (0-8)
    pub fn count_adjacent_mines(&self, id: usize) -> Result<u8, BoardError> {
        self.check_id(id)?;
        let count = self
            .neighbor_ids(id)
            .filter(|&n| self.cells[n].is_mine)
            .count();
        Ok(count as u8)
    }

    /// Reveal one cell. No flood fill: zero cells do not open their neighbours.
    pub fn reveal(&mut self, id: usize) -> Result<RevealOutcome, BoardError> {
        self.check_id(id)?;
        let cell = self.cells[id];
        if self.state.is_ended() || cell.is_flagged || cell.is_revealed {
            return Ok(RevealOutcome::unchanged(self.state));
        }
        self.start_if_needed();

        if cell.is_mine {
            info!("Tile {id} was a mine");
            self.detonated = Some(id);
            self.end_game(Outcome::Lost);
            return Ok(RevealOutcome {
                state: self.state,
                revealed: Vec::new(),
                mines_if_lost: self.mine_ids(),
            });
        }

        self.cells[id].is_revealed = true;
        let adjacent_mines = self.count_adjacent_mines(id)?;
        info!("Revealed tile {id} ({adjacent_mines} adjacent)");
        Ok(RevealOutcome {
            state: self.state,
            revealed: vec![RevealedCell { id, adjacent_mines }],
            mines_if_lost: Vec::new(),
        })
    }

    /// Flip the flag on an unrevealed cell. Flagging every mine wins outright,
    /// even with safe cells still hidden.
    pub fn toggle_flag(&mut self, id: usize) -> Result<FlagOutcome, BoardError> {
        self.check_id(id)?;
        let cell = self.cells[id];
        if self.state.is_ended() || cell.is_revealed {
            return Ok(FlagOutcome {
                state: self.state,
                flagged: cell.is_flagged,
                won: false,
            });
        }
        self.start_if_needed();

        let flagged = !cell.is_flagged;
        self.cells[id].is_flagged = flagged;
        info!("{} tile {id}", if flagged { "Flagged" } else { "Unflagged" });

        let won = self.unflagged_mines() == 0;
        if won {
            self.end_game(Outcome::Won);
        }
        Ok(FlagOutcome {
            state: self.state,
            flagged,
            won,
        })
    }

    /// Finish the game. A loss exposes every mine; a win leaves the board as is.
    /// Does nothing on an already ended board.
    pub fn end_game(&mut self, outcome: Outcome) {
        if self.state.is_ended() {
            return;
        }
        self.state = GameState::Ended(outcome);
        self.end_time = Some(Local::now());
        if outcome == Outcome::Lost {
            for cell in self.cells.iter_mut().filter(|c| c.is_mine) {
                cell.is_revealed = true;
            }
        }
        info!("Game ended: {:?}", outcome);
    }

    pub fn cell_view(&self, id: usize) -> Result<CellView, BoardError> {
        let cell = self.cell(id)?;
        let view = if cell.is_revealed {
            if !cell.is_mine {
                CellView::Open(self.count_adjacent_mines(id)?)
            } else if self.detonated == Some(id) {
                CellView::Detonated
            } else if cell.is_flagged {
                CellView::FlaggedMine
            } else {
                CellView::Mine
            }
        } else if cell.is_flagged {
            CellView::Flagged
        } else {
            CellView::Hidden
        };
        Ok(view)
    }

    fn start_if_needed(&mut self) {
        if self.state == GameState::NotStarted {
            self.state = GameState::InProgress;
            self.start_time = Some(Local::now());
            debug!("Game started");
        }
    }

    fn check_id(&self, id: usize) -> Result<(), BoardError> {
        if id < self.cells.len() {
            Ok(())
        } else {
            Err(BoardError::IndexOutOfRange {
                id,
                len: self.cells.len(),
            })
        }
    }

    // Caller guarantees `id` is in range
    fn neighbor_ids(&self, id: usize) -> impl Iterator<Item = usize> + '_ {
        let row = id / self.cols;
        let col = id % self.cols;
        DIRECTIONS.iter().filter_map(move |&(dr, dc)| {
            let r = row.checked_add_signed(dr)?;
            let c = col.checked_add_signed(dc)?;
            self.id_at(r, c)
        })
    }
}

/// Fixed layouts and raw inspection for tests
#[cfg(test)]
impl Board {
    /// Build a board with mines at exactly the given ids
    pub fn with_mines(rows: usize, cols: usize, mine_ids: &[usize]) -> Result<Self, BoardError> {
        let mut board = Board::new(rows, cols, mine_ids.len())?;
        for &id in mine_ids {
            if id >= board.cells.len() || board.cells[id].is_mine {
                return Err(BoardError::InvalidConfig {
                    rows,
                    cols,
                    mines: mine_ids.len(),
                });
            }
            board.cells[id].is_mine = true;
        }
        board.mines_placed = true;
        Ok(board)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn start_time(&self) -> Option<DateTime<Local>> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Local>> {
        self.end_time
    }

    /// Id of the mine that lost the game, if any
    pub fn detonated(&self) -> Option<usize> {
        self.detonated
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn revealed_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.is_revealed && !c.is_mine)
            .count()
    }

    /// Ids of the up-to-8 grid neighbours of `id`, without wrapping across rows
    pub fn neighbors(&self, id: usize) -> Result<Vec<usize>, BoardError> {
        self.check_id(id)?;
        Ok(self.neighbor_ids(id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    fn sorted(mut v: Vec<usize>) -> Vec<usize> {
        v.sort_unstable();
        v
    }

    #[test]
    fn construct_validates_dimensions_and_mine_count() {
        assert!(Board::new(8, 8, 12).is_ok());
        assert!(Board::new(8, 8, 63).is_ok());
        assert!(Board::new(8, 8, 0).is_ok());
        assert_eq!(
            Board::new(8, 8, 64).unwrap_err(),
            BoardError::InvalidConfig { rows: 8, cols: 8, mines: 64 }
        );
        assert!(matches!(Board::new(8, 8, 65), Err(BoardError::InvalidConfig { .. })));
        assert!(matches!(Board::new(0, 8, 0), Err(BoardError::InvalidConfig { .. })));
        assert!(matches!(Board::new(8, 0, 0), Err(BoardError::InvalidConfig { .. })));
    }

    #[test]
    fn new_board_is_blank() {
        let board = Board::new(8, 8, 12).unwrap();
        assert_eq!(board.state(), GameState::NotStarted);
        assert_eq!(board.len(), 64);
        assert!(board.start_time().is_none());
        for (i, cell) in board.cells().iter().enumerate() {
            assert_eq!(cell.id(), i);
            assert!(!cell.is_mine() && !cell.is_revealed() && !cell.is_flagged());
        }
    }

    #[test]
    fn place_mines_marks_exact_count() {
        for (rows, cols, mines) in [(8, 8, 12), (1, 2, 1), (9, 9, 80), (16, 30, 99), (3, 3, 0)] {
            let mut board = Board::new(rows, cols, mines).unwrap();
            let mut rng = StdRng::seed_from_u64(rows as u64 * 31 + mines as u64);
            board.place_mines_with(&mut rng);
            assert_eq!(board.mine_ids().len(), mines);
        }
    }

    #[test]
    fn place_mines_twice_is_ignored() {
        let mut board = Board::new(8, 8, 12).unwrap();
        board.place_mines_with(&mut StdRng::seed_from_u64(1));
        let first = board.mine_ids();
        board.place_mines_with(&mut StdRng::seed_from_u64(2));
        assert_eq!(board.mine_ids(), first);
    }

    #[test]
    fn with_mines_rejects_duplicates_and_out_of_range() {
        assert!(Board::with_mines(8, 8, &[0, 0]).is_err());
        assert!(Board::with_mines(8, 8, &[64]).is_err());
        let board = Board::with_mines(8, 8, &[0, 9]).unwrap();
        assert_eq!(board.mine_count(), 2);
        assert_eq!(board.mine_ids(), vec![0, 9]);
    }

    #[test]
    fn neighbors_respect_grid_edges() {
        let board = Board::new(8, 8, 0).unwrap();
        assert_eq!(sorted(board.neighbors(0).unwrap()), vec![1, 8, 9]);
        assert_eq!(sorted(board.neighbors(1).unwrap()), vec![0, 2, 8, 9, 10]);
        assert_eq!(
            sorted(board.neighbors(9).unwrap()),
            vec![0, 1, 2, 8, 10, 16, 17, 18]
        );
        assert_eq!(sorted(board.neighbors(63).unwrap()), vec![54, 55, 62]);
        // column 0 and last column must not wrap into the adjacent row
        assert_eq!(sorted(board.neighbors(8).unwrap()), vec![0, 1, 9, 16, 17]);
        assert_eq!(sorted(board.neighbors(15).unwrap()), vec![6, 7, 14, 22, 23]);
    }

    #[test]
    fn neighbors_on_non_square_grid() {
        let board = Board::new(2, 5, 0).unwrap();
        assert_eq!(sorted(board.neighbors(4).unwrap()), vec![3, 8, 9]);
        assert_eq!(sorted(board.neighbors(5).unwrap()), vec![0, 1, 6]);
        let single = Board::new(1, 2, 0).unwrap();
        assert_eq!(single.neighbors(0).unwrap(), vec![1]);
    }

    #[test]
    fn count_adjacent_mines_examples() {
        let board = Board::with_mines(8, 8, &[0, 9]).unwrap();
        assert_eq!(board.count_adjacent_mines(1).unwrap(), 2);
        assert_eq!(board.count_adjacent_mines(18).unwrap(), 1);
        assert_eq!(board.count_adjacent_mines(8).unwrap(), 2);
        assert_eq!(board.count_adjacent_mines(0).unwrap(), 1);
        assert_eq!(board.count_adjacent_mines(63).unwrap(), 0);
    }

    #[test]
    fn count_adjacent_mines_does_not_wrap_rows() {
        let board = Board::with_mines(8, 8, &[7]).unwrap();
        assert_eq!(board.count_adjacent_mines(8).unwrap(), 0);
        assert_eq!(board.count_adjacent_mines(15).unwrap(), 1);
        assert_eq!(board.count_adjacent_mines(6).unwrap(), 1);
    }

    #[test]
    fn count_adjacent_mines_all_surrounded() {
        let board = Board::with_mines(3, 3, &[0, 1, 2, 3, 5, 6, 7, 8]).unwrap();
        assert_eq!(board.count_adjacent_mines(4).unwrap(), 8);
    }

    #[test]
    fn out_of_range_ids_are_errors() {
        let mut board = Board::new(8, 8, 1).unwrap();
        let err = BoardError::IndexOutOfRange { id: 64, len: 64 };
        assert_eq!(board.reveal(64).unwrap_err(), err);
        assert_eq!(board.toggle_flag(64).unwrap_err(), err);
        assert_eq!(board.count_adjacent_mines(64).unwrap_err(), err);
        assert_eq!(board.cell_view(64).unwrap_err(), err);
        assert_eq!(board.state(), GameState::NotStarted);
    }

    #[test]
    fn reveal_safe_cell_starts_game_without_flood_fill() {
        let mut board = Board::with_mines(8, 8, &[63]).unwrap();
        let out = board.reveal(0).unwrap();
        assert_eq!(out.state, GameState::InProgress);
        assert_eq!(out.revealed, vec![RevealedCell { id: 0, adjacent_mines: 0 }]);
        assert!(out.mines_if_lost.is_empty());
        assert!(board.start_time().is_some());
        // zero-adjacency cell does not expand
        assert_eq!(board.revealed_count(), 1);
        assert_eq!(board.cell_view(1).unwrap(), CellView::Hidden);
        assert_eq!(board.cell_view(0).unwrap(), CellView::Open(0));
    }

    #[test]
    fn reveal_flagged_cell_is_noop() {
        let mut board = Board::with_mines(8, 8, &[0, 9]).unwrap();
        board.toggle_flag(5).unwrap();
        let state = board.state();
        let out = board.reveal(5).unwrap();
        assert_eq!(out.state, state);
        assert!(out.revealed.is_empty());
        assert!(!board.cell(5).unwrap().is_revealed());
    }

    #[test]
    fn reveal_twice_is_noop() {
        let mut board = Board::with_mines(8, 8, &[0, 9]).unwrap();
        board.reveal(1).unwrap();
        let out = board.reveal(1).unwrap();
        assert!(out.revealed.is_empty());
        assert_eq!(board.revealed_count(), 1);
    }

    #[test]
    fn reveal_mine_loses_and_exposes_all_mines() {
        let mut board = Board::with_mines(8, 8, &[0, 9, 30]).unwrap();
        board.toggle_flag(30).unwrap();
        let out = board.reveal(9).unwrap();
        assert_eq!(out.state, GameState::Ended(Outcome::Lost));
        assert_eq!(out.mines_if_lost, vec![0, 9, 30]);
        assert!(board.end_time().is_some());
        assert_eq!(board.detonated(), Some(9));
        assert_eq!(board.cell_view(9).unwrap(), CellView::Detonated);
        assert_eq!(board.cell_view(0).unwrap(), CellView::Mine);
        assert_eq!(board.cell_view(30).unwrap(), CellView::FlaggedMine);
        assert_eq!(board.cell_view(1).unwrap(), CellView::Hidden);
    }

    #[test]
    fn first_reveal_can_hit_a_mine() {
        let mut board = Board::with_mines(2, 2, &[3]).unwrap();
        let out = board.reveal(3).unwrap();
        assert_eq!(out.state, GameState::Ended(Outcome::Lost));
        assert!(board.start_time().is_some());
    }

    #[test]
    fn toggle_flag_on_revealed_cell_is_noop() {
        let mut board = Board::with_mines(8, 8, &[0]).unwrap();
        board.reveal(20).unwrap();
        let out = board.toggle_flag(20).unwrap();
        assert!(!out.flagged);
        assert!(!board.cell(20).unwrap().is_flagged());
    }

    #[test]
    fn toggle_flag_flips_and_starts_game() {
        let mut board = Board::with_mines(8, 8, &[0, 9]).unwrap();
        let out = board.toggle_flag(4).unwrap();
        assert!(out.flagged && !out.won);
        assert_eq!(out.state, GameState::InProgress);
        assert!(board.start_time().is_some());
        assert_eq!(board.remaining_mines(), 1);
        let out = board.toggle_flag(4).unwrap();
        assert!(!out.flagged);
        assert_eq!(board.remaining_mines(), 2);
    }

    #[test]
    fn flagging_every_mine_wins_with_safe_cells_hidden() {
        let mut board = Board::with_mines(8, 8, &[0, 9]).unwrap();
        assert!(!board.toggle_flag(0).unwrap().won);
        let out = board.toggle_flag(9).unwrap();
        assert!(out.won);
        assert_eq!(out.state, GameState::Ended(Outcome::Won));
        assert_eq!(board.revealed_count(), 0);
        // a win exposes nothing
        assert_eq!(board.cell_view(0).unwrap(), CellView::Flagged);
    }

    #[test]
    fn extra_wrong_flags_do_not_block_win() {
        let mut board = Board::with_mines(4, 4, &[5]).unwrap();
        board.toggle_flag(0).unwrap();
        let out = board.toggle_flag(5).unwrap();
        assert!(out.won);
        assert_eq!(board.remaining_mines(), -1);
    }

    #[test]
    fn zero_mine_board_is_won_by_first_flag() {
        let mut board = Board::new_game(3, 3, 0).unwrap();
        let out = board.toggle_flag(4).unwrap();
        assert!(out.won && out.flagged);
        assert_eq!(board.state(), GameState::Ended(Outcome::Won));
    }

    #[test]
    fn flags_never_win_before_mines_are_placed() {
        let mut board = Board::new(2, 2, 1).unwrap();
        for id in 0..3 {
            assert!(!board.toggle_flag(id).unwrap().won);
        }
        assert_eq!(board.unflagged_mines(), 1);
        assert_eq!(board.state(), GameState::InProgress);
    }

    #[test]
    fn ended_board_ignores_further_actions() {
        let mut board = Board::with_mines(8, 8, &[0]).unwrap();
        board.reveal(0).unwrap();
        let out = board.reveal(5).unwrap();
        assert_eq!(out.state, GameState::Ended(Outcome::Lost));
        assert!(out.revealed.is_empty());
        let out = board.toggle_flag(5).unwrap();
        assert!(!out.flagged && !out.won);
        assert!(!board.cell(5).unwrap().is_flagged());
    }

    #[test]
    fn end_game_is_idempotent() {
        let mut board = Board::with_mines(8, 8, &[0]).unwrap();
        board.toggle_flag(0).unwrap();
        assert_eq!(board.state(), GameState::Ended(Outcome::Won));
        let end = board.end_time();
        board.end_game(Outcome::Lost);
        assert_eq!(board.state(), GameState::Ended(Outcome::Won));
        assert_eq!(board.end_time(), end);
        assert!(!board.cell(0).unwrap().is_revealed());
    }

    #[test]
    fn restart_builds_a_fresh_board() {
        let mut board = Board::new_game(8, 8, 12).unwrap();
        board.toggle_flag(3).unwrap();
        board.reveal(4).unwrap();

        let board = Board::new_game(8, 8, 12).unwrap();
        assert_eq!(board.state(), GameState::NotStarted);
        assert_eq!(board.flagged_count(), 0);
        assert!(board.cells().iter().all(|c| !c.is_revealed()));
        assert_eq!(board.mine_ids().len(), 12);
    }

    #[test]
    fn cell_row_and_col() {
        let board = Board::new(3, 5, 0).unwrap();
        let cell = board.cell(13).unwrap();
        assert_eq!(cell.row(board.cols()), 2);
        assert_eq!(cell.col(board.cols()), 3);
        assert_eq!(board.id_at(2, 3), Some(13));
        assert_eq!(board.id_at(3, 0), None);
        assert_eq!(board.id_at(0, 5), None);
    }
}
