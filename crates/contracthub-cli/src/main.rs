//! `contracthub`: manage contract blueprints and their approval workflow
//! from the terminal.
//!
//! # Usage
//!
//! ```text
//! contracthub blueprint list
//! contracthub blueprint create --name NDA --field text:Party
//! contracthub contract create b2 --value "Client Organization=Acme" ...
//! contracthub contract transition <id> approved
//! ```

mod args;
mod commands;
mod output;
mod settings;

use anyhow::{Context, Result};
use clap::Parser;
use contracthub_core::Session;
use contracthub_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::args::Args;

fn main() -> Result<()> {
  // Logs go to stderr so command output stays pipeable.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  let cfg = settings::Settings::load(&args.config)?;
  let store_path = args
    .store
    .clone()
    .unwrap_or_else(|| settings::expand_tilde(&cfg.store_path));

  let store = SqliteStore::open(&store_path)
    .with_context(|| format!("failed to open store at {}", store_path.display()))?;
  let mut session = Session::open(store).context("failed to load stored data")?;

  let stdout = std::io::stdout();
  commands::run(&mut session, args.command, args.json, &mut stdout.lock())
}
