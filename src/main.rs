mod app;
mod candidates;
mod config;
mod error;
mod event;
mod github;
mod history;
mod query;
mod store;
mod ui;

use clap::{Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::app::{App, AppContext};
use crate::candidates::CandidateRepository;
use crate::store::{KeyValueStore, MemoryStore, SqliteStore};
use crate::ui::views::{CandidateListView, ProfileView};

const LOG_ENV: &str = "HIREDECK_LOG";

#[derive(Parser, Debug)]
#[command(name = "hiredeck")]
#[command(about = "A terminal dashboard for tracking candidates and their GitHub profiles")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/hiredeck/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Directory for the database and logs
  #[arg(long)]
  data_dir: Option<PathBuf>,

  /// Keep everything in memory; nothing is persisted
  #[arg(long)]
  ephemeral: bool,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Write all candidates to candidates.csv and exit
  Export {
    /// Output directory (default: export_dir from config)
    #[arg(short, long)]
    out: Option<PathBuf>,
  },
  /// Open directly on a GitHub user's profile
  User { username: String },
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let mut config = config::Config::load(args.config.as_deref())?;
  if let Some(dir) = args.data_dir {
    config.set_data_dir(dir);
  }

  let _guard = init_logging(&config.log_dir())?;

  let store: Arc<dyn KeyValueStore> = if args.ephemeral {
    info!("using in-memory store");
    Arc::new(MemoryStore::new())
  } else {
    let path = config.database_path();
    info!(path = %path.display(), "opening store");
    Arc::new(SqliteStore::open(&path)?)
  };

  match args.command {
    Some(Command::Export { out }) => {
      if let Some(dir) = out {
        config.set_export_dir(dir);
      }
      let repository = CandidateRepository::load(store)?;
      if let Some(warning) = repository.load_warning() {
        eprintln!("warning: {}", warning);
      }
      let path = candidates::export::export_to_dir(repository.all(), &config.export_dir())?;
      println!("Exported {} candidates to {}", repository.len(), path.display());
    }
    command => {
      let page_size = config.candidates.page_size;
      let ctx = AppContext::new(store, config)?;
      let mut app = App::new(ctx, Box::new(CandidateListView::new(page_size)));
      if let Some(Command::User { username }) = command {
        let profile = ProfileView::new(username, app.ctx());
        app.push(Box::new(profile));
      }
      app.run().await?;
    }
  }

  Ok(())
}

/// Log to a daily rolling file; the terminal belongs to the UI.
fn init_logging(dir: &Path) -> Result<WorkerGuard> {
  std::fs::create_dir_all(dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let appender = tracing_appender::rolling::daily(dir, "hiredeck.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);
  let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Ok(guard)
}
