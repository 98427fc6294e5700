//! Remote table access shared by every storage backend.

use std::cmp::Ordering;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::row::StorageRow;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Stored row in {table} is not valid JSON: {source}")]
    Corrupt {
        table: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Store request failed: {0}")]
    Transport(String),
    #[error("Store request timed out")]
    Timeout,
    #[error("Malformed store response: {0}")]
    Decode(String),
    #[error("Store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Expected a single row from {table}")]
    NotSingle { table: String },
    #[error("Row {id} not found in {table}")]
    NotFound { table: String, id: String },
}

/// Row filter. `Contains` matches JSON arrays holding an object with the
/// given fields, the way the freelancer portal looks members up by
/// `team @> [{"memberId": ...}]`.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq { column: String, value: Value },
    Contains { column: String, value: Value },
}

impl Filter {
    fn matches(&self, row: &StorageRow) -> bool {
        match self {
            Filter::Eq { column, value } => row.get(column).is_some_and(|v| loosely_equal(v, value)),
            Filter::Contains { column, value } => {
                row.get(column).is_some_and(|v| json_contains(v, value))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// Select parameters understood by every [`TableStore`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    pub fn contains(mut self, column: impl Into<String>, value: Value) -> Self {
        self.filters.push(Filter::Contains {
            column: column.into(),
            value,
        });
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.into(),
            ascending,
        });
        self
    }

    /// Newest rows first, the ordering every list screen uses.
    pub fn newest_first(self) -> Self {
        self.order_by("created_at", false)
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Filter, sort and truncate rows in memory. Backends that cannot push a
    /// query down to the database run it through here.
    pub fn apply(&self, rows: Vec<StorageRow>) -> Vec<StorageRow> {
        let mut rows: Vec<StorageRow> = rows
            .into_iter()
            .filter(|row| self.filters.iter().all(|f| f.matches(row)))
            .collect();

        if let Some(order) = &self.order {
            // Stable sort keeps insertion order between equal keys
            rows.sort_by(|a, b| {
                let ordering = compare_values(a.get(&order.column), b.get(&order.column));
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }
        rows
    }
}

/// One remote table store. Every write returns the row as the store
/// persisted it, including columns it filled in itself.
#[async_trait]
pub trait TableStore: Send + Sync {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<StorageRow>, StoreError>;

    /// Exactly one row matching `query`, or `None` when nothing matches.
    async fn select_single(
        &self,
        table: &str,
        query: &Query,
    ) -> Result<Option<StorageRow>, StoreError> {
        let mut rows = self.select(table, &query.clone().limit(2)).await?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            _ => Err(StoreError::NotSingle {
                table: table.to_string(),
            }),
        }
    }

    async fn insert(&self, table: &str, row: StorageRow) -> Result<StorageRow, StoreError>;

    async fn update(
        &self,
        table: &str,
        id: &str,
        changes: StorageRow,
    ) -> Result<StorageRow, StoreError>;

    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError>;
}

fn loosely_equal(stored: &Value, expected: &Value) -> bool {
    match (stored, expected) {
        (Value::String(s), Value::Number(n)) | (Value::Number(n), Value::String(s)) => {
            s == &n.to_string()
        }
        (Value::String(s), Value::Bool(b)) | (Value::Bool(b), Value::String(s)) => {
            s == &b.to_string()
        }
        _ => stored == expected,
    }
}

fn json_contains(haystack: &Value, needle: &Value) -> bool {
    match (haystack, needle) {
        (Value::Array(items), Value::Array(wanted)) => wanted
            .iter()
            .all(|w| items.iter().any(|item| json_contains(item, w))),
        (Value::Object(fields), Value::Object(wanted)) => wanted
            .iter()
            .all(|(k, w)| fields.get(k).is_some_and(|v| json_contains(v, w))),
        (Value::Array(items), scalar) => items.iter().any(|item| item == scalar),
        _ => haystack == needle,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        // Nulls sort last ascending, first descending
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn rows() -> Vec<StorageRow> {
        vec![
            json!({ "id": "a", "created_at": "2024-01-01", "team": [{ "memberId": "TM-1" }] }),
            json!({ "id": "b", "created_at": "2024-03-01", "team": [] }),
            json!({ "id": "c", "created_at": "2024-02-01", "team": [{ "memberId": "TM-2" }, { "memberId": "TM-1" }] }),
        ]
        .into_iter()
        .map(|v| StorageRow::try_from(v).unwrap())
        .collect()
    }

    fn ids(rows: &[StorageRow]) -> Vec<String> {
        rows.iter().map(|r| r.text("id")).collect()
    }

    #[test]
    fn newest_first_orders_by_created_at_descending() {
        let result = Query::new().newest_first().apply(rows());
        assert_eq!(ids(&result), vec!["b", "c", "a"]);
    }

    #[test]
    fn contains_matches_nested_team_members() {
        let query = Query::new().contains("team", json!([{ "memberId": "TM-1" }]));
        assert_eq!(ids(&query.apply(rows())), vec!["a", "c"]);
    }

    #[test]
    fn eq_and_limit() {
        let query = Query::new().eq("id", "c");
        assert_eq!(ids(&query.apply(rows())), vec!["c"]);

        let limited = Query::new().order_by("id", true).limit(2).apply(rows());
        assert_eq!(ids(&limited), vec!["a", "b"]);
    }

    #[test]
    fn eq_tolerates_numbers_stored_as_text() {
        let row = StorageRow::try_from(json!({ "usage_count": "3" })).unwrap();
        assert!(Query::new().eq("usage_count", 3).apply(vec![row]).len() == 1);
    }
}
