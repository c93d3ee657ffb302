// Entry point for the Minesweeper TUI application
// Loads configuration, starts file logging, and launches the main UI

mod tsw_app;   // Input handling and game session control
mod tsw_board; // Board model: mines, adjacency, game state
mod tsw_clock; // Clock label text
mod tsw_color; // Terminal color adaptation
mod tsw_error; // Application error type
mod tsw_game;  // Difficulty, configuration and records
mod tsw_log;   // File logger setup
mod tsw_ui;    // Terminal UI rendering and event loop

use log::info;

use tsw_app::App;
use tsw_game::load_or_create_config;
use tsw_ui::run as run_ui;

fn main() -> tsw_error::Result<()> {
    // Load or create user configuration (difficulty, preferences, records)
    let (cfg, source) = load_or_create_config();

    // Logging must not break the game; continue without it on failure
    match tsw_log::init(&cfg.log_level) {
        Ok(path) => info!("{} v{} logging to {}", tsw_game::APP_NAME, env!("CARGO_PKG_VERSION"), path.display()),
        Err(e) => eprintln!("logging disabled: {e}"),
    }
    source.report();

    // A file that failed to load is never handed to the app for saving
    let config_file = source.writable_path().map(|p| p.to_path_buf());
    let mut app = App::new(cfg, config_file)?;
    let res = run_ui(&mut app);

    // Save current difficulty before exiting
    app.save();
    info!("Exiting");
    res
}
