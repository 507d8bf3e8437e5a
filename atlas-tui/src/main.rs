//! Company Atlas TUI: drill-down browser for clustered company datasets.
//!
//! Screens:
//! 1. Coarse: bar chart of coarse clusters and a grid of cluster buttons
//! 2. Fine: fine clusters under the selected coarse cluster
//! 3. Results: matching rows with CSV export

mod app;
mod input;
mod logging;
mod persistence;
mod theme;
mod ui;

#[cfg(test)]
mod test_helpers;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use atlas_core::AtlasConfig;

use crate::app::AppState;

/// Browse a clustered company CSV by coarse and fine cluster.
#[derive(Parser)]
#[command(name = "atlas-tui", version, about)]
struct Args {
    /// CSV to open; replaces the file restored from the last session.
    file: Option<PathBuf>,

    /// Config file (defaults to ./atlas.toml, then the platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = AtlasConfig::discover(args.config.as_deref()).context("failed to load config")?;

    // Logging failures are not fatal; the UI still works without a log file.
    let _log_guard = match logging::init(&config.logging.level) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: {e:#}");
            None
        }
    };

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let state_path = persistence::default_path();
    let persisted = persistence::load(&state_path);

    let mut app = AppState::new(&config);
    persistence::apply(&mut app, persisted);

    // A file on the command line replaces the restored one.
    if let Some(file) = &args.file {
        app.open_file(file);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    let persisted = persistence::extract(&app);
    let saved = persistence::save(&state_path, &persisted);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = saved {
        tracing::warn!(path = %state_path.display(), error = %e, "failed to save state");
        eprintln!("warning: failed to save state to {}: {e:#}", state_path.display());
    }

    tracing::info!("exiting");
    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}
