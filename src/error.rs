//! Error types for the lookup pipeline.
//!
//! Each stage reports its own error enum. Recoverable variants end the run
//! with a console message; the rest are propagated to `main`.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while collecting the query from the user.
#[derive(Debug, Error)]
pub enum InputError {
  /// Mode 1 was chosen but no address was typed.
  #[error("Enter a valid IP address")]
  EmptyAddress,

  /// Mode 2 input did not look like a domain name.
  #[error("Enter a valid domain name")]
  InvalidDomain(String),

  /// The menu selection was not one of the three modes.
  #[error("An invalid entry. Try again.")]
  InvalidChoice(String),

  #[error("Failed to read from the console")]
  Io(#[from] std::io::Error),
}

impl InputError {
  /// Whether the user can fix this by running again with different input.
  pub const fn is_recoverable(&self) -> bool {
    !matches!(self, Self::Io(_))
  }
}

/// Errors raised by the geolocation request.
#[derive(Debug, Error)]
pub enum LookupError {
  /// The service answered with something other than 200 OK.
  #[error("Error: Request failed with status code {}", .0.as_u16())]
  Status(StatusCode),

  #[error("Failed to send request to {url}")]
  Transport {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("Failed to read lookup response body")]
  Body(#[source] reqwest::Error),

  #[error("Failed to deserialize lookup response")]
  Decode(#[from] serde_json::Error),

  #[error("Lookup response was not a JSON object (got {0})")]
  NotAnObject(&'static str),
}

impl LookupError {
  /// Only an HTTP status failure is reported and survived; everything else
  /// is a transport or protocol fault.
  pub const fn is_recoverable(&self) -> bool {
    matches!(self, Self::Status(_))
  }
}
