use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use connect_four::config::AppConfig;
use connect_four::history::{FileStore, History, HistoryStore, MemoryStore};
use connect_four::session::{Mode, Session};
use connect_four::ui::App;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Pvp,
    Pve,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Pvp => Mode::Pvp,
            ModeArg::Pve => Mode::Pve,
        }
    }
}

/// Play Connect Four in the terminal.
#[derive(Parser)]
#[command(name = "connect_four", about = "Play Connect Four in the terminal")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "connect4.toml")]
    config: PathBuf,

    /// Override the starting mode
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Keep the history in memory only
    #[arg(long)]
    no_save: bool,

    /// Write logs to this file (the terminal is taken by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(mode) = cli.mode {
        config.game.mode = mode.into();
    }
    if cli.no_save {
        config.storage.enabled = false;
    }

    if config.storage.enabled {
        let store = FileStore::new(config.storage.dir.clone());
        info!(dir = %store.dir().display(), key = %config.storage.key, "using saved history");
        play(History::open(store, config.storage.key.clone()), &config)
    } else {
        play(History::open(MemoryStore::new(), config.storage.key.clone()), &config)
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let log_file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn play<S: HistoryStore>(history: History<S>, config: &AppConfig) -> Result<()> {
    let session = Session::new(
        history,
        config.game.mode,
        config.game.human,
        config.game.opponent.build(),
    );
    info!(
        mode = session.mode().label(),
        opponent = session.opponent_name(),
        moves = session.history().len() - 1,
        "starting game"
    );
    let mut app = App::new(session, &config.timing);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal — always runs, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res.context("running the terminal UI")
}
