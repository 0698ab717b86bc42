use crate::cli::Cli;
use crate::error::{InputError, LookupError};
use crate::input::{InputCollector, Query};
use crate::providers::geo::{LookupClient, LookupResult};
use crate::record::ResultRecord;
use crate::results;
use crate::user_config::{self, Settings, UserConfig};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use std::io::{BufRead, Write};
use std::time::Duration;
use tracing::{debug, info};

pub struct App {
  cli: Cli,
  lookup: LookupClient,
}

impl App {
  pub fn new(cli: Cli) -> Result<Self> {
    let mut config = user_config::load();
    if cli.save_config && config.absorb_flags(&cli) {
      user_config::store(&config).context("Failed to save user config")?;
      info!("saved endpoint/fields flags to the user config file");
    }
    Self::with_config(cli, &config)
  }

  /// Builds the app against an explicit config instead of the user's file.
  pub fn with_config(cli: Cli, config: &UserConfig) -> Result<Self> {
    let settings = config.resolve(&cli);
    debug!(endpoint = %settings.endpoint, fields = settings.fields, "resolved settings");

    let client = Client::builder()
      .user_agent(format!("iplook/{}", env!("CARGO_PKG_VERSION")))
      .build()
      .context("Failed to build HTTP client")?;
    let lookup = LookupClient::new(client, settings.endpoint, settings.fields);

    Ok(Self { cli, lookup })
  }

  pub fn settings(&self) -> Settings {
    Settings {
      endpoint: self.lookup.endpoint().to_string(),
      fields: self.lookup.field_mask(),
    }
  }

  /// Runs the whole program against the console. Returns whether a record
  /// was produced.
  pub async fn run(&self) -> Result<bool> {
    if self.cli.config_show {
      println!("{}", self.settings());
      return Ok(true);
    }

    let record = self.execute(&mut InputCollector::stdio()).await?;
    let Some(record) = record else {
      return Ok(false);
    };

    if self.cli.json {
      results::print_json(&record)?;
    } else {
      results::print_table(&record);
    }
    Ok(true)
  }

  /// The lookup pipeline: collect, fetch, flatten.
  ///
  /// Recoverable failures are reported on the console and end the pipeline
  /// with `Ok(None)`; transport and decoding faults are returned as errors.
  pub async fn execute<R: BufRead, W: Write>(
    &self,
    collector: &mut InputCollector<R, W>,
  ) -> Result<Option<ResultRecord>> {
    let Some(query) = self.collect_query(collector)? else {
      return Ok(None);
    };
    let Some(result) = self.fetch(&query).await? else {
      return Ok(None);
    };

    if !self.cli.json {
      results::print_confirmation();
      results::print_service_warning(&result);
    }
    Ok(Some(ResultRecord::from_lookup(&result)))
  }

  fn collect_query<R: BufRead, W: Write>(
    &self,
    collector: &mut InputCollector<R, W>,
  ) -> Result<Option<Query>> {
    let collected = self
      .cli
      .preselected()
      .unwrap_or_else(|| collector.collect());

    match collected {
      Ok(query) => {
        debug!(%query, "query accepted");
        Ok(Some(query))
      }
      Err(e) if e.is_recoverable() => {
        report_input_error(&e);
        Ok(None)
      }
      Err(e) => Err(e).context("Failed to collect the lookup query"),
    }
  }

  async fn fetch(&self, query: &Query) -> Result<Option<LookupResult>> {
    let progress = (!self.cli.json).then(|| spinner(query));
    let outcome = self.lookup.fetch(query).await;
    if let Some(pb) = progress {
      pb.finish_and_clear();
    }

    match outcome {
      Ok(result) => Ok(Some(result)),
      Err(e @ LookupError::Status(_)) => {
        results::print_failure(&e.to_string());
        Ok(None)
      }
      Err(e) => {
        Err(e).with_context(|| format!("Geolocation lookup failed for {query}"))
      }
    }
  }
}

fn report_input_error(err: &InputError) {
  debug!(?err, "input rejected");
  results::print_failure(&err.to_string());
}

fn spinner(query: &Query) -> ProgressBar {
  let pb = ProgressBar::new_spinner();
  pb.set_style(
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
      .unwrap_or_else(|_| ProgressStyle::default_spinner()),
  );
  pb.set_message(format!("Looking up {query}..."));
  pb.enable_steady_tick(Duration::from_millis(100));
  pb
}
