//! Interactive collection of the lookup query.
//!
//! The user picks one of three modes from a menu and, for the first two,
//! types an address or a domain. Validation happens once: a bad entry ends
//! collection for this run.

use crate::error::InputError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};
use std::str::FromStr;

// Optional scheme, dot-terminated labels, an alphabetic TLD of two or more
// letters, then an optional path/query made of word chars and `./?%&=`.
static RE_DOMAIN: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^(https?://)?([a-zA-Z0-9.-]+\.)+([a-zA-Z]{2,})(/[\w./?%&=]*)?$")
    .unwrap()
});

const MENU: &str = "\
******************************************************
Welcome to IP look-up. Choose from the options below:
1. Use an IP address
2. Use a domain name
3. Look-up my own IP
******************************************************";

/// What to ask the geolocation service about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
  /// An address, passed through without syntax checks.
  Ip(String),
  /// A domain name, possibly with scheme and path.
  Domain(String),
  /// Let the service use the address the request came from.
  OwnIp,
}

impl Query {
  /// The text substituted into the request URL (empty for `OwnIp`).
  pub fn as_str(&self) -> &str {
    match self {
      Self::Ip(s) | Self::Domain(s) => s,
      Self::OwnIp => "",
    }
  }
}

impl fmt::Display for Query {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::OwnIp => f.write_str("<own IP>"),
      other => f.write_str(other.as_str()),
    }
  }
}

/// The three menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Ip,
  Domain,
  OwnIp,
}

impl FromStr for Mode {
  type Err = InputError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim() {
      "1" => Ok(Self::Ip),
      "2" => Ok(Self::Domain),
      "3" => Ok(Self::OwnIp),
      other => Err(InputError::InvalidChoice(other.to_string())),
    }
  }
}

/// Returns true if `input` looks like a domain name the service accepts.
pub fn is_valid_domain(input: &str) -> bool {
  RE_DOMAIN.is_match(input)
}

/// Accepts any non-blank address. Malformed addresses are left for the
/// service to reject.
///
/// # Errors
///
/// Returns [`InputError::EmptyAddress`] when `input` is empty or whitespace.
pub fn validate_ip(input: &str) -> Result<Query, InputError> {
  let address = input.trim();
  if address.is_empty() {
    return Err(InputError::EmptyAddress);
  }
  Ok(Query::Ip(address.to_string()))
}

/// Checks `input` against the domain pattern.
///
/// # Errors
///
/// Returns [`InputError::InvalidDomain`] if the pattern does not match.
pub fn validate_domain(input: &str) -> Result<Query, InputError> {
  let domain = input.trim();
  if is_valid_domain(domain) {
    Ok(Query::Domain(domain.to_string()))
  } else {
    Err(InputError::InvalidDomain(domain.to_string()))
  }
}

/// Resolves a mode plus its (already read) input into a query.
///
/// # Errors
///
/// Propagates the validation error for the chosen mode.
pub fn query_for(mode: Mode, input: &str) -> Result<Query, InputError> {
  match mode {
    Mode::Ip => validate_ip(input),
    Mode::Domain => validate_domain(input),
    Mode::OwnIp => Ok(Query::OwnIp),
  }
}

/// Drives the menu over any line reader and prompt writer.
pub struct InputCollector<R, W> {
  reader: R,
  writer: W,
}

impl InputCollector<BufReader<Stdin>, Stdout> {
  /// A collector bound to the process console.
  pub fn stdio() -> Self {
    Self::new(BufReader::new(io::stdin()), io::stdout())
  }
}

impl<R: BufRead, W: Write> InputCollector<R, W> {
  pub const fn new(reader: R, writer: W) -> Self {
    Self { reader, writer }
  }

  /// Shows the menu, reads the choice and, if needed, one more line.
  ///
  /// # Errors
  ///
  /// Returns a recoverable [`InputError`] for a bad choice or bad input, and
  /// [`InputError::Io`] if the console cannot be read or written.
  pub fn collect(&mut self) -> Result<Query, InputError> {
    writeln!(self.writer, "{MENU}")?;
    let mode: Mode = self.prompt("Your choice is: ")?.parse()?;

    let input = match mode {
      Mode::Ip => self.prompt("Enter an IP address: ")?,
      Mode::Domain => self.prompt("Enter a domain name: ")?,
      Mode::OwnIp => String::new(),
    };
    query_for(mode, &input)
  }

  /// Writes `label` and reads a single line. End of input reads as empty.
  fn prompt(&mut self, label: &str) -> Result<String, InputError> {
    write!(self.writer, "{label}")?;
    self.writer.flush()?;

    let mut line = String::new();
    self.reader.read_line(&mut line)?;
    Ok(line.trim().to_string())
  }

  #[cfg(test)]
  fn into_writer(self) -> W {
    self.writer
  }
}
