//! `fracto`: terminal editor for a fractional executive's profile tags.
//!
//! # Usage
//!
//! ```text
//! fracto --url http://localhost:8080 --user u_123 --name "Sam Carter"
//! fracto --config ~/.config/fracto/config.toml add skill "M&A"
//! fracto rates cfo --days 2 --clients 3
//! ```

mod app;
mod commands;
mod ui;

use std::{io, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result, bail};
use app::App;
use clap::{Parser, Subcommand};
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use fracto_core::{ItemId, ItemType};
use fracto_sync::{HttpTagStore, POLL_INTERVAL, ProfileSync};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:8080";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "fracto", version, about = "Edit fractional-executive profile tags")]
struct Args {
  /// Path to a TOML config file (url, user, name, poll_secs).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the fracto server (default: http://localhost:8080).
  #[arg(long, env = "FRACTO_URL")]
  url: Option<String>,

  /// Id of the user whose profile is edited.
  #[arg(long, env = "FRACTO_USER_ID")]
  user: Option<String>,

  /// Display name for the centre of the graph.
  #[arg(long)]
  name: Option<String>,

  /// Seconds between background refreshes in the TUI.
  #[arg(long, value_name = "SECS")]
  poll_secs: Option<u64>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Interactive editor (the default).
  Tui,
  /// Print every section and its items.
  List {
    /// One plain sentence per item instead, e.g. "User is based in London".
    #[arg(long)]
    facts: bool,
  },
  /// Add a value; replaces the existing one in single-valued sections.
  Add {
    /// location, role_preference, company or skill.
    item_type: ItemType,
    value:     String,
  },
  /// Change the value of an item, keeping its metadata.
  Edit { item_id: ItemId, value: String },
  /// Remove an item.
  Delete { item_id: ItemId },
  /// Print the profile graph.
  Graph {
    /// Emit `{nodes, links}` JSON instead of a tree.
    #[arg(long)]
    json: bool,
  },
  /// Day rates, earnings and IR35 take-home for a role (no server needed).
  Rates {
    /// Role code: ceo, cfo, cmo, cto, coo, ciso, chro, cpo, cco.
    role:    String,
    #[arg(long, default_value_t = 2.0)]
    days:    f64,
    #[arg(long, default_value_t = 1)]
    clients: u32,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default, Debug, PartialEq)]
struct ConfigFile {
  #[serde(default)]
  url:       String,
  #[serde(default)]
  user:      String,
  #[serde(default)]
  name:      String,
  #[serde(default)]
  poll_secs: Option<u64>,
}

/// Connection settings after merging flags, file and defaults.
#[derive(Debug, PartialEq)]
struct Settings {
  url:  String,
  user: Option<String>,
  name: Option<String>,
  poll: Duration,
}

fn non_empty(s: String) -> Option<String> { (!s.is_empty()).then_some(s) }

/// CLI flags override the config file, which overrides defaults.
fn merge(args: &Args, file: ConfigFile) -> Settings {
  Settings {
    url:  args
      .url
      .clone()
      .or_else(|| non_empty(file.url))
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
    user: args.user.clone().or_else(|| non_empty(file.user)),
    name: args.name.clone().or_else(|| non_empty(file.name)),
    poll: args
      .poll_secs
      .or(file.poll_secs)
      .map(Duration::from_secs)
      .unwrap_or(POLL_INTERVAL),
  }
}

fn load_config_file(path: Option<&PathBuf>) -> Result<ConfigFile> {
  let Some(path) = path else {
    return Ok(ConfigFile::default());
  };
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading config file {}", path.display()))?;
  toml::from_str(&raw).context("parsing config file")
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let mut args = Args::parse();
  let command = args.command.take().unwrap_or(Command::Tui);

  // Log lines would tear the alternate screen; the TUI reports through its
  // status bar instead.
  if !matches!(command, Command::Tui) {
    tracing_subscriber::fmt()
      .with_writer(io::stderr)
      .with_env_filter(
        EnvFilter::builder()
          .with_default_directive(LevelFilter::WARN.into())
          .from_env_lossy(),
      )
      .init();
  }

  if let Command::Rates { role, days, clients } = &command {
    return commands::rates(role, *days, *clients, &mut io::stdout());
  }

  let settings = merge(&args, load_config_file(args.config.as_ref())?);
  let Some(user) = settings.user.clone() else {
    bail!("no user id: pass --user, set FRACTO_USER_ID, or add `user` to the config file");
  };
  let store = HttpTagStore::new(&settings.url)?;
  let sync = ProfileSync::new(store, user);
  let out = &mut io::stdout();

  match command {
    Command::Tui => run_tui(Arc::new(sync), &settings).await,
    Command::List { facts } => commands::list(&sync, facts, out).await,
    Command::Add { item_type, value } => commands::add(&sync, item_type, &value, out).await,
    Command::Edit { item_id, value } => commands::edit(&sync, item_id, &value, out).await,
    Command::Delete { item_id } => commands::delete(&sync, item_id, out).await,
    Command::Graph { json } => commands::graph(&sync, settings.name.as_deref(), json, out).await,
    // Answered before connecting.
    Command::Rates { .. } => Ok(()),
  }
}

// ─── TUI ──────────────────────────────────────────────────────────────────────

async fn run_tui(sync: Arc<ProfileSync<HttpTagStore>>, settings: &Settings) -> Result<()> {
  let guard = sync.start_polling(settings.poll);
  let mut app = App::new(sync, settings.name.clone()).with_polling(guard);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app);

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<HttpTagStore>,
) -> Result<()> {
  loop {
    app.tick();
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event {
      if key.kind == KeyEventKind::Press && !app.handle_key(key) {
        break;
      }
    }
  }

  Ok(())
}
