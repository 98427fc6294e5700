use std::{str::FromStr, time::Duration};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use sqlx::{
    Pool, Sqlite, SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use uuid::Uuid;

pub mod entity;
pub mod models;
pub mod row;
pub mod store;

pub use entity::Entity;
pub use row::StorageRow;
pub use store::{Filter, Order, Query, StoreError, TableStore};

/// Every table the studio stores records in.
pub const TABLES: &[&str] = &[
    "clients",
    "projects",
    "transactions",
    "team_members",
    "packages",
    "add_ons",
    "cards",
    "financial_pockets",
    "leads",
    "assets",
    "contracts",
    "client_feedback",
    "social_media_posts",
    "promo_codes",
    "sops",
    "notifications",
    "user_profiles",
    "users",
];

/// Current time in the RFC 3339 form used for `created_at`/`updated_at`.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Local SQLite-backed table store, one JSON document table per entity.
#[derive(Clone)]
pub struct DBService {
    pub pool: Pool<Sqlite>,
}

impl DBService {
    pub async fn new(database_url: &str) -> Result<DBService, StoreError> {
        let in_memory = database_url.contains(":memory:");
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(if in_memory {
                SqliteJournalMode::Memory
            } else {
                SqliteJournalMode::Wal
            });

        // An in-memory database lives and dies with its one connection
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(8)
                .acquire_timeout(Duration::from_secs(10))
        };

        let pool = pool_options.connect_with(options).await?;
        Self::from_pool(pool).await
    }

    /// Run pending migrations on an existing pool.
    pub async fn from_pool(pool: SqlitePool) -> Result<DBService, StoreError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::debug!("SQLite store ready");
        Ok(DBService { pool })
    }

    fn table_name(table: &str) -> Result<&'static str, StoreError> {
        TABLES
            .iter()
            .copied()
            .find(|known| *known == table)
            .ok_or_else(|| StoreError::Rejected {
                status: 404,
                message: format!("Unknown table {table}"),
            })
    }

    fn decode(table: &str, data: &str, created_at: String) -> Result<StorageRow, StoreError> {
        let mut map: Map<String, Value> =
            serde_json::from_str(data).map_err(|source| StoreError::Corrupt {
                table: table.to_string(),
                source,
            })?;
        map.entry("created_at")
            .or_insert_with(|| Value::String(created_at));
        Ok(StorageRow::from(map))
    }

    fn encode(row: &StorageRow) -> String {
        Value::from(row.clone()).to_string()
    }
}

#[async_trait]
impl TableStore for DBService {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<StorageRow>, StoreError> {
        let table = Self::table_name(table)?;
        let sql = format!("SELECT data, created_at FROM {table} ORDER BY created_at ASC, rowid ASC");
        let records: Vec<(String, String)> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        let rows = records
            .into_iter()
            .map(|(data, created_at)| Self::decode(table, &data, created_at))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(query.apply(rows))
    }

    async fn insert(&self, table: &str, mut row: StorageRow) -> Result<StorageRow, StoreError> {
        let table = Self::table_name(table)?;

        let id = row
            .opt_text("id")
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let created_at = row
            .opt_text("created_at")
            .filter(|at| !at.is_empty())
            .unwrap_or_else(timestamp);
        row.insert("id", &id);
        row.insert("created_at", &created_at);

        let sql = format!("INSERT INTO {table} (id, data, created_at) VALUES ($1, $2, $3)");
        sqlx::query(&sql)
            .bind(&id)
            .bind(Self::encode(&row))
            .bind(&created_at)
            .execute(&self.pool)
            .await?;

        tracing::debug!(table, id = %id, "Inserted row");
        Ok(row)
    }

    async fn update(
        &self,
        table: &str,
        id: &str,
        changes: StorageRow,
    ) -> Result<StorageRow, StoreError> {
        let table = Self::table_name(table)?;
        let mut tx = self.pool.begin().await?;

        let select = format!("SELECT data, created_at FROM {table} WHERE id = $1");
        let existing: Option<(String, String)> = sqlx::query_as(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some((data, created_at)) = existing else {
            return Err(StoreError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            });
        };

        let mut row = Self::decode(table, &data, created_at)?;
        row.merge(changes.without(&["id"]));

        let update = format!("UPDATE {table} SET data = $1 WHERE id = $2");
        sqlx::query(&update)
            .bind(Self::encode(&row))
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::debug!(table, id, "Updated row");
        Ok(row)
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
        let table = Self::table_name(table)?;
        let sql = format!("DELETE FROM {table} WHERE id = $1");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            // Deleting an absent row is not an error for the remote store either
            tracing::debug!(table, id, "Delete matched no rows");
        }
        Ok(())
    }
}
