#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
pub mod error;
pub mod input;
pub mod providers;
pub mod record;
mod results;
pub mod user_config;

#[cfg(test)]
mod test_support;

pub use app::App;
pub use cli::Cli;

/// Runs the main application logic.
///
/// Parses command-line arguments, sets up logging, then collects a query,
/// looks it up and prints the resulting record.
///
/// # Errors
///
/// Returns an error if initialization fails (e.g., building the HTTP client),
/// if the console cannot be read, or if the lookup fails below the HTTP
/// status level (connection, DNS, malformed reply).
pub async fn run() -> Result<ExitCode> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let app = App::new(cli)?;
  let found = app.run().await?;

  Ok(if found {
    ExitCode::SUCCESS
  } else {
    ExitCode::FAILURE
  })
}

fn init_tracing(verbose: u8) {
  let level = match verbose {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };
  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();
}
