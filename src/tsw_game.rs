// Difficulty presets, user configuration and best-time records
// Config is persisted as TOML under the platform config directory

use chrono::Local;
use directories::ProjectDirs;
use log::{debug, info, warn};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::tsw_board::Board;
use crate::tsw_error::{Error, Result};

pub const APP_NAME: &str = "tileswpr";

/// Largest custom board the terminal layout is designed for
pub const MAX_ROWS: usize = 24;
pub const MAX_COLS: usize = 36;

/// Board presets and custom settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Classic,                     // 8x8, 12 mines
    Beginner,                    // 9x9, 10 mines
    Intermediate,                // 16x16, 40 mines
    Expert,                      // 16 rows x 30 cols, 99 mines
    Custom(usize, usize, usize), // rows, cols, mines
}

impl Serialize for Difficulty {
    /// Stored by name; Custom dimensions live in their own config fields
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Difficulty, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Difficulty::ALL
            .iter()
            .copied()
            .find(|d| d.name() == s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown difficulty: {s}")))
    }
}

impl Difficulty {
    /// Selection order in the difficulty menu. Custom is a placeholder here;
    /// its real dimensions come from the config.
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Classic,
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Expert,
        Difficulty::Custom(0, 0, 0),
    ];

    /// (rows, cols, mines)
    pub fn params(&self) -> (usize, usize, usize) {
        match self {
            Difficulty::Classic => (8, 8, 12),
            Difficulty::Beginner => (9, 9, 10),
            Difficulty::Intermediate => (16, 16, 40),
            Difficulty::Expert => (16, 30, 99),
            Difficulty::Custom(r, c, n) => (*r, *c, *n),
        }
    }

    /// Config file identifier; keep stable across versions
    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Classic => "Classic",
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Expert => "Expert",
            Difficulty::Custom(_, _, _) => "Custom",
        }
    }

    pub fn to_index(&self) -> usize {
        match self {
            Difficulty::Classic => 0,
            Difficulty::Beginner => 1,
            Difficulty::Intermediate => 2,
            Difficulty::Expert => 3,
            Difficulty::Custom(_, _, _) => 4,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Difficulty::Custom(_, _, _))
    }

    /// Start a fresh game at this difficulty
    pub fn new_board(&self) -> std::result::Result<Board, crate::tsw_board::BoardError> {
        let (rows, cols, mines) = self.params();
        Board::new_game(rows, cols, mines)
    }
}

/// Best completion time
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub secs: u64,
    pub date: String, // YYYY-MM-DD
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub difficulty: Difficulty,

    pub best_classic: Option<Record>,
    pub best_beginner: Option<Record>,
    pub best_intermediate: Option<Record>,
    pub best_expert: Option<Record>,

    pub custom_rows: usize,
    pub custom_cols: usize,
    pub custom_mines: usize,

    pub show_indicator: bool, // Mark the cursor cell with an arrow
    pub ascii_icons: bool,    // Plain ASCII glyphs for limited fonts
    pub log_level: String,    // env_logger filter, overridden by TILESWPR_LOG
}

impl Default for Config {
    fn default() -> Self {
        Config {
            difficulty: Difficulty::Classic,
            best_classic: None,
            best_beginner: None,
            best_intermediate: None,
            best_expert: None,
            custom_rows: 12,
            custom_cols: 20,
            custom_mines: 40,
            show_indicator: false,
            ascii_icons: false,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn custom_difficulty(&self) -> Difficulty {
        Difficulty::Custom(self.custom_rows, self.custom_cols, self.custom_mines)
    }

    fn record_slot(&self, d: &Difficulty) -> Option<&Option<Record>> {
        match d {
            Difficulty::Classic => Some(&self.best_classic),
            Difficulty::Beginner => Some(&self.best_beginner),
            Difficulty::Intermediate => Some(&self.best_intermediate),
            Difficulty::Expert => Some(&self.best_expert),
            Difficulty::Custom(_, _, _) => None,
        }
    }

    fn record_slot_mut(&mut self, d: &Difficulty) -> Option<&mut Option<Record>> {
        match d {
            Difficulty::Classic => Some(&mut self.best_classic),
            Difficulty::Beginner => Some(&mut self.best_beginner),
            Difficulty::Intermediate => Some(&mut self.best_intermediate),
            Difficulty::Expert => Some(&mut self.best_expert),
            Difficulty::Custom(_, _, _) => None,
        }
    }

    /// Best record for a preset; always None for Custom
    pub fn get_record(&self, d: &Difficulty) -> Option<&Record> {
        self.record_slot(d).and_then(|r| r.as_ref())
    }

    /// Store `secs` if it beats the current best. Returns true on a new record.
    /// Custom boards are never recorded.
    pub fn set_record(&mut self, d: &Difficulty, secs: u64) -> bool {
        let Some(slot) = self.record_slot_mut(d) else {
            return false;
        };
        if slot.as_ref().is_some_and(|r| secs >= r.secs) {
            return false;
        }
        let date = Local::now().format("%Y-%m-%d").to_string();
        *slot = Some(Record { secs, date });
        true
    }

    /// Bring a freshly parsed config into a playable state
    fn normalize(&mut self) {
        if self.difficulty.is_custom() {
            self.difficulty = self.custom_difficulty();
        }
        let (rows, cols, mines) = self.custom_difficulty().params();
        let fits = rows <= MAX_ROWS && cols <= MAX_COLS;
        if !fits || Board::new(rows, cols, mines).is_err() {
            warn!("Custom board {rows}x{cols} with {mines} mines is not playable; using defaults");
            let d = Config::default();
            self.custom_rows = d.custom_rows;
            self.custom_cols = d.custom_cols;
            self.custom_mines = d.custom_mines;
            if self.difficulty.is_custom() {
                self.difficulty = Difficulty::Classic;
            }
        }
    }
}

pub fn parse_config(s: &str) -> Result<Config> {
    let mut cfg = toml::from_str::<Config>(s)?;
    cfg.normalize();
    Ok(cfg)
}

/// Platform config file, e.g. ~/.config/tileswpr/tileswpr.toml on Linux.
/// Falls back to the current directory when no home is available.
pub fn config_path() -> Option<PathBuf> {
    if let Some(proj) = ProjectDirs::from("com", "xhbl", APP_NAME) {
        let mut path = proj.config_dir().to_path_buf();
        path.push(format!("{APP_NAME}.toml"));
        return Some(path);
    }
    env::current_dir()
        .ok()
        .map(|dir| dir.join(format!("{APP_NAME}.toml")))
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    let s = fs::read_to_string(path)?;
    parse_config(&s)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string(cfg)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, s)?;
    debug!("Saved config to {}", path.display());
    Ok(())
}

/// Where the in-memory config came from, and whether it may be written back
#[derive(Debug)]
pub enum ConfigSource {
    Loaded(PathBuf),
    Created(PathBuf),
    /// Defaults are in use and writing them out failed; retried on save
    CreateFailed(PathBuf, Error),
    /// The file exists but could not be used. It is never overwritten.
    Ignored(PathBuf, Error),
    NoConfigDir,
}

impl ConfigSource {
    /// File that saving may replace, if any
    pub fn writable_path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Loaded(p) | ConfigSource::Created(p) | ConfigSource::CreateFailed(p, _) => Some(p),
            ConfigSource::Ignored(_, _) | ConfigSource::NoConfigDir => None,
        }
    }

    /// Loading runs before the logger exists, so the outcome is logged here
    pub fn report(&self) {
        match self {
            ConfigSource::Loaded(p) => info!("Loaded config from {}", p.display()),
            ConfigSource::Created(p) => info!("Wrote default config to {}", p.display()),
            ConfigSource::CreateFailed(p, e) => warn!("Could not write default config to {}: {e}", p.display()),
            ConfigSource::Ignored(p, e) => {
                warn!("Ignoring config at {}: {e}; the file is left untouched", p.display())
            }
            ConfigSource::NoConfigDir => warn!("No config directory; settings will not be saved"),
        }
    }
}

/// Load the config at `path`, writing defaults when it does not exist.
/// A broken file yields defaults and is not written back.
pub fn load_or_create_config_at(path: &Path) -> (Config, ConfigSource) {
    let path = path.to_path_buf();
    if path.exists() {
        return match load_config_from(&path) {
            Ok(cfg) => (cfg, ConfigSource::Loaded(path)),
            Err(e) => (Config::default(), ConfigSource::Ignored(path, e)),
        };
    }
    let cfg = Config::default();
    match save_config_to(&path, &cfg) {
        Ok(()) => (cfg, ConfigSource::Created(path)),
        Err(e) => (cfg, ConfigSource::CreateFailed(path, e)),
    }
}

pub fn load_or_create_config() -> (Config, ConfigSource) {
    match config_path() {
        Some(path) => load_or_create_config_at(&path),
        None => (Config::default(), ConfigSource::NoConfigDir),
    }
}
