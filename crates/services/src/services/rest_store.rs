//! Table store backed by the hosted PostgREST-style table API.

use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use db::{Filter, Query, StorageRow, StoreError, TableStore};
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::warn;
use url::Url;

/// Whether a failed request may succeed when sent again.
fn should_retry(error: &StoreError) -> bool {
    match error {
        StoreError::Transport(_) | StoreError::Timeout => true,
        StoreError::Rejected { status, .. } => *status == 429 || (500..=599).contains(status),
        _ => false,
    }
}

fn map_reqwest_error(e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::Timeout
    } else {
        StoreError::Transport(e.to_string())
    }
}

/// Render a filter value the way the table API expects it in a query string.
fn filter_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct RestStore {
    http: Client,
    base: Url,
    anon_key: SecretString,
}

impl RestStore {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(base: Url, anon_key: SecretString) -> Result<Self, StoreError> {
        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("studio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base,
            anon_key,
        })
    }

    fn table_url(&self, table: &str) -> Result<Url, StoreError> {
        self.base
            .join(&format!("rest/v1/{table}"))
            .map_err(|e| StoreError::Transport(e.to_string()))
    }

    /// URL for a select, with filters, ordering and limit as query parameters.
    pub fn select_url(&self, table: &str, query: &Query) -> Result<Url, StoreError> {
        let mut url = self.table_url(table)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", "*");
            for filter in &query.filters {
                match filter {
                    Filter::Eq { column, value } => {
                        pairs.append_pair(column, &format!("eq.{}", filter_value(value)));
                    }
                    Filter::Contains { column, value } => {
                        pairs.append_pair(column, &format!("cs.{value}"));
                    }
                }
            }
            if let Some(order) = &query.order {
                let direction = if order.ascending { "asc" } else { "desc" };
                pairs.append_pair("order", &format!("{}.{direction}", order.column));
            }
            if let Some(limit) = query.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }
        Ok(url)
    }

    fn row_url(&self, table: &str, id: &str) -> Result<Url, StoreError> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let key = self.anon_key.expose_secret();
        self.http
            .request(method, url)
            .header("apikey", key)
            .bearer_auth(key)
            .header("Prefer", "return=representation")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let res = request.send().await.map_err(map_reqwest_error)?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let body = res.text().await.unwrap_or_default();
        // The API reports failures as {"message": ...}
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or(body);
        Err(StoreError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn rows(res: Response) -> Result<Vec<StorageRow>, StoreError> {
        res.json::<Vec<StorageRow>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn fetch_rows(&self, url: &Url) -> Result<Vec<StorageRow>, StoreError> {
        let res = self.send(self.request(Method::GET, url.clone())).await?;
        Self::rows(res).await
    }

    fn first_row(table: &str, id: &str, rows: Vec<StorageRow>) -> Result<StorageRow, StoreError> {
        rows.into_iter().next().ok_or_else(|| StoreError::NotFound {
            table: table.to_string(),
            id: id.to_string(),
        })
    }
}

#[async_trait]
impl TableStore for RestStore {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<StorageRow>, StoreError> {
        let url = self.select_url(table, query)?;

        // Reads are idempotent; writes below are sent once
        (|| async { self.fetch_rows(&url).await })
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(250))
                    .with_max_delay(Duration::from_secs(5))
                    .with_max_times(3)
                    .with_jitter(),
            )
            .when(should_retry)
            .notify(|e, dur| {
                warn!(
                    table,
                    "Select failed, retrying after {:.2}s: {}",
                    dur.as_secs_f64(),
                    e
                )
            })
            .await
    }

    async fn insert(&self, table: &str, row: StorageRow) -> Result<StorageRow, StoreError> {
        let url = self.table_url(table)?;
        let res = self.send(self.request(Method::POST, url).json(&row)).await?;
        let id = row.text("id");
        Self::first_row(table, &id, Self::rows(res).await?)
    }

    async fn update(
        &self,
        table: &str,
        id: &str,
        changes: StorageRow,
    ) -> Result<StorageRow, StoreError> {
        let url = self.row_url(table, id)?;
        let res = self
            .send(self.request(Method::PATCH, url).json(&changes))
            .await?;
        Self::first_row(table, id, Self::rows(res).await?)
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
        let url = self.row_url(table, id)?;
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}
