//! Storage-side representation of a single table row.
//!
//! Rows travel to and from the remote store as JSON objects keyed by
//! snake_case column names. The readers on [`StorageRow`] never fail: a value
//! that is absent, null or malformed degrades to the column's default so that
//! mapping a row into a domain record is total.

use std::str::FromStr;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageRow(Map<String, Value>);

impl StorageRow {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Set a column. Values that cannot be represented as JSON are stored as null.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Serialize) {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.0.insert(column.into(), value);
    }

    /// Builder form of [`StorageRow::insert`].
    pub fn with(mut self, column: impl Into<String>, value: impl Serialize) -> Self {
        self.insert(column, value);
        self
    }

    /// Drop the given columns, e.g. read-only ones before a write.
    pub fn without(mut self, columns: &[&str]) -> Self {
        for column in columns {
            self.0.remove(*column);
        }
        self
    }

    /// Overwrite this row's columns with the ones present in `changes`.
    pub fn merge(&mut self, changes: StorageRow) {
        for (column, value) in changes.0 {
            self.0.insert(column, value);
        }
    }

    /// Columns of `self` whose value differs from (or is missing in) `previous`.
    pub fn changes_from(&self, previous: &StorageRow) -> StorageRow {
        let changed = self
            .0
            .iter()
            .filter(|(column, value)| previous.0.get(column.as_str()) != Some(*value))
            .map(|(column, value)| (column.clone(), value.clone()))
            .collect();
        StorageRow(changed)
    }

    /// Required text column; absent or null reads as an empty string.
    pub fn text(&self, column: &str) -> String {
        self.opt_text(column).unwrap_or_default()
    }

    pub fn opt_text(&self, column: &str) -> Option<String> {
        match self.0.get(column)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Numeric column, parse-or-zero.
    pub fn number(&self, column: &str) -> f64 {
        self.opt_number(column).unwrap_or(0.0)
    }

    pub fn opt_number(&self, column: &str) -> Option<f64> {
        let parsed = match self.0.get(column)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.filter(|n| n.is_finite())
    }

    /// Integer column, parse-or-zero. Fractional values are truncated.
    pub fn integer(&self, column: &str) -> i64 {
        self.opt_integer(column).unwrap_or(0)
    }

    pub fn opt_integer(&self, column: &str) -> Option<i64> {
        match self.0.get(column)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
            }
            _ => None,
        }
    }

    /// Boolean column; anything but `true` reads as false.
    pub fn flag(&self, column: &str) -> bool {
        match self.0.get(column) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// JSON array column; absent or malformed arrays read as empty.
    pub fn list<T: DeserializeOwned>(&self, column: &str) -> Vec<T> {
        self.json(column).unwrap_or_default()
    }

    pub fn object<T: DeserializeOwned + Default>(&self, column: &str) -> T {
        self.json(column).unwrap_or_default()
    }

    /// Enumerated text column; unknown values read as the enum's default.
    pub fn variant<T: FromStr + Default>(&self, column: &str) -> T {
        self.opt_variant(column).unwrap_or_default()
    }

    pub fn opt_variant<T: FromStr>(&self, column: &str) -> Option<T> {
        self.opt_text(column).and_then(|s| s.parse().ok())
    }

    fn json<T: DeserializeOwned>(&self, column: &str) -> Option<T> {
        match self.0.get(column)? {
            Value::Null => None,
            // Some backends hand JSON columns back as encoded text.
            Value::String(encoded) => serde_json::from_str(encoded).ok(),
            value => serde_json::from_value(value.clone()).ok(),
        }
    }
}

impl From<Map<String, Value>> for StorageRow {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for StorageRow {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}

impl From<StorageRow> for Value {
    fn from(row: StorageRow) -> Self {
        Value::Object(row.0)
    }
}
