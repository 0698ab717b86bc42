use crate::cli::Cli;
use crate::providers::geo::{DEFAULT_ENDPOINT, DEFAULT_FIELDS};
use serde::{Deserialize, Serialize};
use std::fmt;

const APP_NAME: &str = "iplook";
const FILE_NAME: Option<&str> = None;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct UserConfig {
  pub endpoint: Option<String>,
  pub fields: Option<u32>,
}

/// Read ~/.config/iplook/default-config.toml (or OS equivalent).
pub fn load() -> UserConfig {
  confy::load(APP_NAME, FILE_NAME).unwrap_or_default()
}

pub fn store(cfg: &UserConfig) -> anyhow::Result<()> {
  confy::store(APP_NAME, FILE_NAME, cfg).map_err(Into::into)
}

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
  pub endpoint: String,
  pub fields: u32,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      endpoint: DEFAULT_ENDPOINT.to_string(),
      fields: DEFAULT_FIELDS,
    }
  }
}

impl fmt::Display for Settings {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "endpoint = {}", self.endpoint)?;
    write!(f, "fields   = {}", self.fields)
  }
}

impl UserConfig {
  /// Flags win over the config file, which wins over the built-in defaults.
  pub fn resolve(&self, cli: &Cli) -> Settings {
    let defaults = Settings::default();
    Settings {
      endpoint: cli
        .endpoint
        .clone()
        .or_else(|| self.endpoint.clone().filter(|e| !e.is_empty()))
        .unwrap_or(defaults.endpoint),
      fields: cli.fields.or(self.fields).unwrap_or(defaults.fields),
    }
  }

  /// Copies any endpoint/field flags present on the command line into self.
  /// Returns whether anything changed.
  pub fn absorb_flags(&mut self, cli: &Cli) -> bool {
    let before = self.clone();
    if let Some(endpoint) = &cli.endpoint {
      self.endpoint = Some(endpoint.clone());
    }
    if let Some(fields) = cli.fields {
      self.fields = Some(fields);
    }
    *self != before
  }
}
