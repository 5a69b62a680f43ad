mod app;
mod catalog;
mod config;
mod constants;
mod display;
mod gallery;
mod graphics;
mod input;
mod links;
mod modal;
mod page;
mod player;
mod query;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use directories::ProjectDirs;
use ratatui::{
  DefaultTerminal,
  crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
  },
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use app::{App, AppOptions};
use catalog::Catalog;
use config::Config;
use constants::constants;
use display::CliDisplayMode;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Browse a video editor's portfolio in the terminal", long_about = None)]
struct Args {
  /// Preview display mode: 'auto', 'direct' or 'ascii' (default: auto-detect)
  #[arg(short, long, default_value = "auto")]
  display_mode: CliDisplayMode,

  /// Catalog file (.ron, .toml or .json). Defaults to the prefs entry, then the built-in catalog.
  #[arg(short, long)]
  catalog: Option<PathBuf>,

  /// Seed for the featured selection, for reproducible shuffles
  #[arg(long)]
  seed: Option<u64>,

  /// Do not download preview images from the video host
  #[arg(long)]
  no_previews: bool,

  /// Print shell completions and exit
  #[arg(long, value_name = "SHELL")]
  completions: Option<Shell>,
}

// --- Logging ---

/// Log to a daily file under the data dir; stdout belongs to the TUI.
/// Filter with `REEL_LOG` (default `info`).
fn init_logging() -> Option<WorkerGuard> {
  let dirs = ProjectDirs::from("", "", "reel")?;
  let log_dir = dirs.data_local_dir().join("logs");
  std::fs::create_dir_all(&log_dir).ok()?;

  let appender = tracing_appender::rolling::daily(log_dir, "reel.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);
  let filter = EnvFilter::try_from_env("REEL_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();
  Some(guard)
}

fn load_catalog(args: &Args, config: &Config) -> Result<Catalog> {
  match args.catalog.as_ref().or(config.catalog_path.as_ref()) {
    Some(path) => Catalog::load(path),
    None => Catalog::builtin(),
  }
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(shell) = args.completions {
    clap_complete::generate(shell, &mut Args::command(), "reel", &mut std::io::stdout());
    return Ok(());
  }

  let _log_guard = init_logging();
  let config = Config::load();
  // Fail before touching the terminal so the error is readable.
  let catalog = load_catalog(&args, &config)?;
  info!(videos = catalog.len(), "starting");

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  execute!(std::io::stdout(), EnableMouseCapture).context("Failed to enable mouse capture")?;

  let options = AppOptions {
    display_mode: display::resolve_display_mode(args.display_mode),
    seed: args.seed,
    fetch_previews: !args.no_previews,
    persist_config: true,
  };
  let result = run(&mut terminal, App::new(catalog, config, options)).await;

  let _ = execute!(std::io::stdout(), DisableMouseCapture);
  ratatui::restore();
  result
}

async fn run(terminal: &mut DefaultTerminal, mut app: App) -> Result<()> {
  let poll_interval = Duration::from_millis(constants().poll_interval_ms);

  loop {
    app.check_pending();
    app.expire_error();

    terminal.draw(|frame| ui::ui(frame, &mut app)).context("Failed to draw frame")?;

    if event::poll(poll_interval)? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(&mut app, key)?;
        }
        Event::Mouse(mouse) => input::handle_mouse_event(&mut app, mouse),
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }

  app.shutdown();
  info!("bye");
  Ok(())
}
