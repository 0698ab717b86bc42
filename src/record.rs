//! Flattening of a lookup result into a single labelled row.

use crate::providers::geo::LookupResult;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Label of the only row in a [`ResultRecord`].
pub const ROW_LABEL: &str = "Data";

/// Joins parent and child keys in flattened column names.
pub const KEY_SEPARATOR: &str = ".";

/// One lookup result projected onto a single row.
///
/// Columns keep the order the service sent them in. Nested objects become
/// dotted column names (`location.city`); lists stay whole in one cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultRecord {
  columns: Vec<(String, Value)>,
}

impl ResultRecord {
  pub fn from_lookup(result: &LookupResult) -> Self {
    Self {
      columns: flatten(result.fields()),
    }
  }

  pub const fn label(&self) -> &'static str {
    ROW_LABEL
  }

  pub fn column_names(&self) -> impl Iterator<Item = &str> {
    self.columns.iter().map(|(name, _)| name.as_str())
  }

  /// First cell stored under `name`.
  pub fn get(&self, name: &str) -> Option<&Value> {
    self
      .columns
      .iter()
      .find(|(column, _)| column == name)
      .map(|(_, value)| value)
  }

  pub fn cells(&self) -> impl Iterator<Item = (&str, &Value)> {
    self.columns.iter().map(|(name, value)| (name.as_str(), value))
  }

  pub fn len(&self) -> usize {
    self.columns.len()
  }

  pub fn is_empty(&self) -> bool {
    self.columns.is_empty()
  }
}

impl From<&LookupResult> for ResultRecord {
  fn from(result: &LookupResult) -> Self {
    Self::from_lookup(result)
  }
}

/// Serializes as `{"Data": {column: value, ...}}`.
impl Serialize for ResultRecord {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    struct Row<'a>(&'a [(String, Value)]);

    impl Serialize for Row<'_> {
      fn serialize<S: Serializer>(
        &self,
        serializer: S,
      ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0 {
          map.serialize_entry(name, value)?;
        }
        map.end()
      }
    }

    let mut outer = serializer.serialize_map(Some(1))?;
    outer.serialize_entry(ROW_LABEL, &Row(&self.columns))?;
    outer.end()
  }
}

/// Walks `map` depth-first, emitting one `(dotted.key, value)` pair per leaf.
///
/// Objects are descended into; everything else, arrays included, is a leaf.
/// An empty nested object emits nothing.
pub fn flatten(map: &Map<String, Value>) -> Vec<(String, Value)> {
  let mut out = Vec::with_capacity(map.len());
  flatten_into(None, map, &mut out);
  out
}

fn flatten_into(
  prefix: Option<&str>,
  map: &Map<String, Value>,
  out: &mut Vec<(String, Value)>,
) {
  for (key, value) in map {
    let name = match prefix {
      Some(parent) => format!("{parent}{KEY_SEPARATOR}{key}"),
      None => key.clone(),
    };
    match value {
      Value::Object(child) => flatten_into(Some(&name), child, out),
      Value::Null
      | Value::Bool(_)
      | Value::Number(_)
      | Value::String(_)
      | Value::Array(_) => out.push((name, value.clone())),
    }
  }
}

/// Text shown in a table cell: strings unquoted, null blank, the rest as
/// compact JSON.
pub fn render_cell(value: &Value) -> String {
  match value {
    Value::Null => String::new(),
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}
