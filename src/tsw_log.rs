// File logging. The terminal belongs to the UI, so records go to a log file
// in the platform data directory instead of stderr.

use directories::ProjectDirs;
use env_logger::{Builder, Env, Target};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use crate::tsw_error::Result;
use crate::tsw_game::APP_NAME;

/// Environment variable that overrides the configured log filter
pub const LOG_ENV: &str = "TILESWPR_LOG";

pub fn log_path() -> PathBuf {
    let dir = ProjectDirs::from("com", "xhbl", APP_NAME)
        .map(|p| p.data_local_dir().to_path_buf())
        .unwrap_or_else(env::temp_dir);
    dir.join(format!("{APP_NAME}.log"))
}

/// Install env_logger writing to `log_path()`. `default_filter` applies when
/// `TILESWPR_LOG` is unset.
pub fn init(default_filter: &str) -> Result<PathBuf> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Builder::from_env(Env::default().filter_or(LOG_ENV, default_filter))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_secs()
        .try_init()?;
    Ok(path)
}
