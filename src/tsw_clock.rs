// Clock label text: wall clock before the first move, elapsed time afterwards
// Pure functions of a board snapshot and "now"; the ticker never touches the board

use chrono::{DateTime, Local};

use crate::tsw_board::{Board, GameState};

/// Unix `date` style, e.g. "Fri Jan  2 15:04:05 +00:00 2026"
const UNIX_DATE: &str = "%a %b %e %H:%M:%S %Z %Y";

/// The parts of a board the clock needs, copied out so a reader on another
/// thread never sees a half-updated board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSnapshot {
    pub state: GameState,
    pub start_time: Option<DateTime<Local>>,
    pub end_time: Option<DateTime<Local>>,
}

impl ClockSnapshot {
    /// Whole seconds played. Frozen once the game has ended.
    pub fn elapsed_secs(&self, now: DateTime<Local>) -> u64 {
        let Some(start) = self.start_time else {
            return 0;
        };
        let end = match self.state {
            GameState::Ended(_) => self.end_time.unwrap_or(now),
            _ => now,
        };
        end.signed_duration_since(start).num_seconds().max(0) as u64
    }

    pub fn display(&self, now: DateTime<Local>) -> String {
        match self.state {
            GameState::NotStarted => now.format(UNIX_DATE).to_string(),
            GameState::InProgress | GameState::Ended(_) => format_elapsed(self.elapsed_secs(now)),
        }
    }
}

pub fn clock_display(board: &Board, now: DateTime<Local>) -> String {
    board.clock_snapshot().display(now)
}

/// Compact duration like "0s", "42s", "1m5s", "2h0m9s"
pub fn format_elapsed(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{h}h{m}m{s}s")
    } else if m > 0 {
        format!("{m}m{s}s")
    } else {
        format!("{s}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tsw_board::Outcome;
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 1, 2, h, m, s).unwrap()
    }

    #[test]
    fn elapsed_formatting() {
        assert_eq!(format_elapsed(0), "0s");
        assert_eq!(format_elapsed(59), "59s");
        assert_eq!(format_elapsed(65), "1m5s");
        assert_eq!(format_elapsed(600), "10m0s");
        assert_eq!(format_elapsed(3603), "1h0m3s");
    }

    #[test]
    fn not_started_shows_wall_clock() {
        let snap = ClockSnapshot {
            state: GameState::NotStarted,
            start_time: None,
            end_time: None,
        };
        let text = snap.display(at(15, 4, 5));
        assert!(text.starts_with("Fri Jan  2 15:04:05"), "{text}");
        assert!(text.ends_with("2026"), "{text}");
        assert_eq!(snap.elapsed_secs(at(15, 4, 5)), 0);
    }

    #[test]
    fn in_progress_shows_elapsed() {
        let start = at(10, 0, 0);
        let snap = ClockSnapshot {
            state: GameState::InProgress,
            start_time: Some(start),
            end_time: None,
        };
        assert_eq!(snap.display(start), "0s");
        assert_eq!(snap.display(start + Duration::milliseconds(65_900)), "1m5s");
        assert_eq!(snap.elapsed_secs(start + Duration::seconds(30)), 30);
    }

    #[test]
    fn ended_clock_is_frozen() {
        let start = at(10, 0, 0);
        let snap = ClockSnapshot {
            state: GameState::Ended(Outcome::Won),
            start_time: Some(start),
            end_time: Some(start + Duration::seconds(12)),
        };
        assert_eq!(snap.display(start + Duration::seconds(500)), "12s");
    }

    #[test]
    fn board_snapshot_follows_state() {
        let mut board = Board::with_mines(8, 8, &[0]).unwrap();
        let now = Local::now();
        assert_eq!(board.clock_snapshot().state, GameState::NotStarted);
        assert!(!clock_display(&board, now).ends_with('s'));
        board.reveal(10).unwrap();
        let snap = board.clock_snapshot();
        assert_eq!(snap.state, GameState::InProgress);
        assert_eq!(snap.start_time, board.start_time());
        let later = board.start_time().unwrap() + Duration::seconds(3);
        assert_eq!(clock_display(&board, later), "3s");
    }
}
