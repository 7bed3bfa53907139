//! `padron` — terminal client for the citizen registry.
//!
//! # Usage
//!
//! ```
//! padron --url http://localhost:3000 --role Capturista
//! padron --config ~/.config/padron/config.toml --citizen 42
//! ```

mod app;
mod client;
mod ui;

use std::{io, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use client::{ApiClient, ApiConfig};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use padron_core::citizen::CitizenId;
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "padron", about = "Terminal client for the citizen registry")]
struct Args {
  /// Path to a TOML config file (url, username, password, role).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the registry API (default: http://localhost:3000).
  #[arg(long, env = "PADRON_URL")]
  url: Option<String>,

  /// API username.
  #[arg(long, env = "PADRON_USER")]
  user: Option<String>,

  /// API password (plaintext).
  #[arg(long, env = "PADRON_PASSWORD")]
  password: Option<String>,

  /// Session role, checked by the edit-screen guard.
  #[arg(long, env = "PADRON_ROLE")]
  role: Option<String>,

  /// Open the editor for this citizen id directly (guard permitting).
  #[arg(long, env = "PADRON_CITIZEN", value_name = "ID")]
  citizen: Option<String>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
  #[serde(default)]
  role:     String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  // Diagnostics go to stderr so the alternate screen stays clean.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(io::stderr)
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:3000".to_string()),
    username: args
      .user
      .or_else(|| (!file_cfg.username.is_empty()).then(|| file_cfg.username.clone()))
      .unwrap_or_default(),
    password: args
      .password
      .or_else(|| (!file_cfg.password.is_empty()).then(|| file_cfg.password.clone()))
      .unwrap_or_default(),
  };
  let role = args
    .role
    .or_else(|| (!file_cfg.role.is_empty()).then(|| file_cfg.role.clone()));

  let client = ApiClient::new(api_config)?;
  let mut app = App::new(client, role);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Load initial data.
  app.load_citizens().await;

  // A `--citizen` id jumps straight to the editor. An unparseable id is
  // ignored without loading anything, like a malformed route parameter.
  if let Some(raw) = &args.citizen {
    match raw.parse::<CitizenId>() {
      Ok(id) => app.open_edit(id).await,
      Err(e) => tracing::debug!("ignoring --citizen: {e}"),
    }
  }

  // Run the event loop; restore the terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    app.tick();
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // The candidate list loads on the tick after the edit form first
    // renders, so the record is on screen before the second fetch runs.
    if app.candidates_pending {
      app.load_candidates().await;
      continue;
    }

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(evt) = maybe_event {
      match evt {
        Event::Key(key) => {
          if !app.handle_key(key).await {
            break;
          }
        }
        Event::Resize(_, _) => {
          // Terminal will redraw on next iteration.
        }
        _ => {}
      }
    }
  }

  Ok(())
}
