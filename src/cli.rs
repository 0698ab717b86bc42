use crate::error::InputError;
use crate::input::{self, Query};
use clap::{ArgAction, ArgGroup, Parser};

#[derive(Parser, Debug, Clone)]
#[command(name = "iplook", version)]
#[command(
  about = "Look up geolocation details for an IP address, a domain, or your own IP.",
  long_about = "A command-line utility that asks ip-api.com where an IP address or domain is located and prints the answer as a single-row table. Without --ip, --domain or --me an interactive menu asks what to look up."
)]
#[command(group(ArgGroup::new("target").args(["ip", "domain", "me"])))]
pub struct Cli {
  /// Look up this IP address instead of showing the menu.
  #[arg(long, value_name = "ADDRESS")]
  pub ip: Option<String>,

  /// Look up this domain name instead of showing the menu.
  #[arg(long, value_name = "DOMAIN")]
  pub domain: Option<String>,

  /// Look up the IP this request comes from.
  #[arg(long)]
  pub me: bool,

  /// Output the record in JSON format instead of a table.
  #[arg(long)]
  pub json: bool,

  /// Geolocation endpoint (overrides the config file).
  #[arg(long, value_name = "URL")]
  pub endpoint: Option<String>,

  /// ip-api.com field-selection bitmask (overrides the config file).
  #[arg(long, value_name = "BITMASK")]
  pub fields: Option<u32>,

  /// Persist any --endpoint/--fields flags into the user config file.
  #[arg(long)]
  pub save_config: bool,

  /// Print the current merged configuration and exit.
  #[arg(long)]
  pub config_show: bool,

  /// Increase log verbosity (-v info, -vv debug, -vvv trace).
  #[arg(short, long, action = ArgAction::Count)]
  pub verbose: u8,
}

impl Cli {
  /// The query picked on the command line, if any, validated the same way
  /// as the matching menu entry.
  pub fn preselected(&self) -> Option<Result<Query, InputError>> {
    if let Some(ip) = &self.ip {
      Some(input::validate_ip(ip))
    } else if let Some(domain) = &self.domain {
      Some(input::validate_domain(domain))
    } else if self.me {
      Some(Ok(Query::OwnIp))
    } else {
      None
    }
  }
}
