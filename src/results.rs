use crate::providers::geo::LookupResult;
use crate::record::{self, ResultRecord};
use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};
use console::{style, Style};

/// Builds the one-row table: a header of column names and the `Data` row.
pub fn to_table(record: &ResultRecord) -> Table {
  let mut table = Table::new();
  table.load_preset(UTF8_FULL);
  table.set_content_arrangement(ContentArrangement::Dynamic);

  let header = std::iter::once(Cell::new("")).chain(
    record
      .column_names()
      .map(|name| Cell::new(name).add_attribute(Attribute::Bold)),
  );
  table.set_header(header);

  let row = std::iter::once(Cell::new(record.label()))
    .chain(record.cells().map(|(_, value)| Cell::new(record::render_cell(value))));
  table.add_row(row);

  table
}

pub fn print_table(record: &ResultRecord) {
  if record.is_empty() {
    println!("  {}", style("The service returned no fields.").dim());
    return;
  }
  println!("{}", to_table(record));
}

pub fn print_json(record: &ResultRecord) -> Result<()> {
  serde_json::to_string_pretty(record)
    .map(|s| println!("{s}"))
    .context("Failed to serialize record to JSON")
}

/// Heading printed once a lookup has come back.
pub fn print_confirmation() {
  println!(
    "{}",
    Style::new()
      .bold()
      .apply_to("The IP look-up details are as below:")
  );
}

/// Warns when the service answered 200 but flagged the query as failed.
pub fn print_service_warning(result: &LookupResult) {
  if result.is_success() {
    return;
  }
  eprintln!(
    "  {} {}",
    style("⚠").yellow(),
    style(format!(
      "The service could not resolve this query: {}",
      result.message().unwrap_or("no reason given")
    ))
    .yellow()
  );
}

/// A recoverable failure, shown instead of a record.
pub fn print_failure(message: &str) {
  eprintln!("{}", style(message).red().bold());
}
