//! Tabnest headless shell
//!
//! Stands in for the visual shell: requests arrive one JSON object per line
//! on stdin and each is answered with one JSON `CommandResult` on stdout.
//! Logs go to stderr.
//!
//! ```text
//! {"command": "navigate", "url": "example.com"}
//! {"command": "load_complete", "tab_id": "1712345678901", "title": "Example"}
//! {"command": "back"}
//! ```

pub mod commands;
mod renderer;
mod state;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use tabnest_core::Config;

pub use commands::{dispatch, handle_line, CommandResult, Request};
pub use renderer::HeadlessRenderer;
pub use state::AppState;

pub fn run() -> anyhow::Result<()> {
    tabnest_core::init_logging();

    let in_memory = std::env::args().any(|arg| arg == "--in-memory");
    let config_path = std::env::var_os("TABNEST_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| Config::data_dir().join("config.json"));
    let config = Config::load(&config_path);

    let state = if in_memory {
        AppState::in_memory(config)
    } else {
        AppState::new(config).context("failed to open session store")?
    };

    tracing::info!(in_memory, "Tabnest shell started");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("failed to read request")?;
        if line.trim().is_empty() {
            continue;
        }

        let response = commands::handle_line(&state, &line);
        serde_json::to_writer(&mut stdout, &response)?;
        writeln!(stdout)?;
        stdout.flush()?;
    }

    tracing::info!("Input closed, shutting down");
    Ok(())
}
