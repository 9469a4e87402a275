mod app;
mod components;
mod config;
mod editor;
mod error;
mod event;
mod fs;
mod handler;
mod list;
mod render;
mod tui;
mod ui;

use std::env;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::app::{Action, App, Mode};
use crate::config::AppConfig;
use crate::error::Result;
use crate::render::Renderer;
use crate::tui::{install_panic_hook, terminal_size, Tui};

/// Browse a directory tree, search file contents and open files in an editor.
#[derive(Parser, Debug)]
#[command(name = "dirt", version, about)]
struct Cli {
    /// Directory to start in (defaults to the current directory)
    path: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Err(e) = init_tracing() {
        eprintln!("dirt: cannot open log file: {e}");
    }

    let start = match cli.path {
        Some(path) => path,
        None => env::current_dir()?,
    };
    let config = AppConfig::load();
    let mut app = App::new(&start)?;
    change_dir(app.tree.root_path());
    info!(root = %app.tree.root_path().display(), "starting");

    install_panic_hook();
    let mut tui = Tui::new()?;
    let result = run(&mut app, &mut tui, &config);
    exit_status(result, tui.restore())?;

    export_cwd(app.tree.root_path());
    Ok(())
}

/// Log to the file named by `DIRT_LOG`; without it nothing is recorded.
fn init_tracing() -> io::Result<()> {
    let Some(log_path) = env::var_os("DIRT_LOG") else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(log_path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::<File>::new(file)),
        )
        .with(filter)
        .init();
    Ok(())
}

fn run(app: &mut App, tui: &mut Tui, config: &AppConfig) -> Result<()> {
    let mut renderer = Renderer::new();

    loop {
        if app.take_full_redraw() {
            renderer.invalidate();
        }
        let (cols, rows) = terminal_size();
        let frame = ui::render(app, cols, rows);
        renderer.draw(frame, &mut tui.sink())?;

        let key = event::read_key()?;
        match handler::handle_key_event(app, key) {
            Action::None => {}
            Action::Quit => return Ok(()),
            Action::ChangeDir(path) => change_dir(&path),
            Action::OpenEditor { path, line } => {
                app.mode = Mode::Paused;
                {
                    let _suspended = tui.suspend()?;
                    editor::open_in_editor(&path, line, &config.editor);
                }
                app.resume();
            }
            Action::Search => run_search(app, tui, config)?,
        }
    }
}

/// Ask for a query on the bottom row and search under the current root.
fn run_search(app: &mut App, tui: &mut Tui, config: &AppConfig) -> Result<()> {
    app.mode = Mode::Prompting;
    let answer = tui.prompt("find: ");
    app.resume();
    let Some(query) = accepted_query(answer) else {
        return Ok(());
    };

    tui.notice(&format!("Searching for \"{query}\"..."))?;
    let base = app.tree.root_path().to_path_buf();
    let matches = fs::search::search(&base, &query, config.max_file_bytes());
    app.show_matches(query, base, matches, config.preview_width());
    Ok(())
}

/// The query to search for, if any. A cancelled, empty or failed prompt
/// means "back to browsing"; failures are only logged.
fn accepted_query(answer: Result<Option<String>>) -> Option<String> {
    match answer {
        Ok(query) => query.filter(|q| !q.is_empty()),
        Err(e) => {
            warn!(error = %e, "search prompt failed");
            None
        }
    }
}

/// Combine the main loop's outcome with the terminal restore. The loop's
/// own error wins; a restore failure behind it is logged.
fn exit_status(run: Result<()>, restore: Result<()>) -> Result<()> {
    match (run, restore) {
        (Err(e), Err(restore_err)) => {
            warn!(error = %restore_err, "cannot restore terminal");
            Err(e)
        }
        (run, restore) => run.and(restore),
    }
}

fn change_dir(path: &Path) {
    if let Err(e) = env::set_current_dir(path) {
        warn!(path = %path.display(), error = %e, "cannot change working directory");
    }
}

/// Hand the final root to the calling shell through `DIRT_CWD_FILE`.
fn export_cwd(dir: &Path) {
    let Some(target) = env::var_os("DIRT_CWD_FILE") else {
        return;
    };
    if let Err(e) = write_cwd_file(Path::new(&target), dir) {
        warn!(file = ?target, error = %e, "cannot write cwd file");
    }
}

fn write_cwd_file(target: &Path, dir: &Path) -> io::Result<()> {
    std::fs::write(target, dir.to_string_lossy().as_bytes())
}
