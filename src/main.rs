use anyhow::{Context, Result};
use clap::Parser;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use clipsight::app::App;
use clipsight::clipboard::{self, watch};
use clipsight::config::{ConfigStorage, TomlConfigStorage, ensure_directories};
use clipsight::logging;
use clipsight::ui::ImagePane;

#[derive(Parser)]
#[command(name = "clipsight")]
#[command(about = "Clipboard inspector TUI for Wayland", long_about = None)]
struct Cli {
    /// Config file path (default: $XDG_CONFIG_HOME/clipsight/clipsight.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log to stderr instead of the log file
    #[arg(long)]
    foreground: bool,

    /// Override the configured log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (data_dir, config_dir) = ensure_directories()?;
    let config_path = cli
        .config
        .unwrap_or_else(|| config_dir.join("clipsight.toml"));
    let config = TomlConfigStorage::new(config_path).load()?;

    let level = cli
        .log_level
        .unwrap_or_else(|| config.general.log_level.clone());
    if cli.foreground {
        env_logger::Builder::new()
            .filter_level(logging::parse_level(&level))
            .init();
    } else {
        logging::init_logger(data_dir.join("clipsight.log"), &level)?;
    }
    log::info!("Starting clipsight");

    let backend = clipboard::create_backend()?;
    let (events_tx, events_rx) = mpsc::channel();
    let watchers =
        watch::start_watchers(&events_tx).context("Failed to start clipboard watchers")?;

    // Query the terminal for its graphics protocol before raw mode
    let image_pane = ImagePane::detect();

    let mut app = App::new(config, backend, events_rx, image_pane);
    let result = run_terminal(&mut app);

    for watcher in watchers {
        watcher.stop();
    }
    log::info!("Stopped");

    result
}

/// Set up the terminal, run the event loop, and restore the terminal
/// afterwards, also when the loop errored
fn run_terminal(app: &mut App) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = run_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// Event loop: drain watcher notifications, draw, then poll input with a
/// 50ms tick so change notifications and the pulse stay fresh without
/// burning CPU
fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while !app.should_quit {
        app.drain_events();
        terminal.draw(|frame| app.draw(frame))?;

        if event::poll(Duration::from_millis(50)).context("Failed to poll events")? {
            match event::read().context("Failed to read event")? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }
    Ok(())
}
