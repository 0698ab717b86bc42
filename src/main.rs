#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use anyhow::Result;
use iplook::run;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
  run().await
}
