//! Start-up check that every studio table is reachable in the configured store

use std::sync::Arc;

use db::{Query, StoreError, TableStore};
use serde::Serialize;
use tracing::{info, warn};
use ts_rs::TS;

/// Store validator for ensuring every expected table answers a select
pub struct DatabaseValidator {
    store: Arc<dyn TableStore>,
}

impl DatabaseValidator {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// Check each table with a one-row select
    pub async fn validate(&self, required_tables: &[&str]) -> ValidationResult {
        let mut missing_tables = Vec::new();
        let mut warnings = Vec::new();

        for &table in required_tables {
            match self.store.select(table, &Query::new().limit(1)).await {
                Ok(_) => {}
                Err(StoreError::Rejected { status: 404, .. }) => {
                    warn!(table, "Table missing from store");
                    missing_tables.push(table.to_string());
                }
                Err(e) => {
                    warn!(table, error = %e, "Table check failed");
                    warnings.push(format!("{table}: {e}"));
                }
            }
        }

        let result = ValidationResult {
            tables_checked: required_tables.len(),
            missing_tables,
            warnings,
        };
        info!(summary = %result.summary(), "Store validation complete");
        result
    }
}

/// Result of store validation
#[derive(Debug, Clone, Serialize, TS)]
pub struct ValidationResult {
    pub tables_checked: usize,
    pub missing_tables: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Check if validation passed without issues
    pub fn is_ok(&self) -> bool {
        self.missing_tables.is_empty() && self.warnings.is_empty()
    }

    /// Get a summary message
    pub fn summary(&self) -> String {
        if !self.missing_tables.is_empty() {
            format!("Missing tables: {}", self.missing_tables.join(", "))
        } else if !self.warnings.is_empty() {
            format!("Store validation warnings: {}", self.warnings.join(", "))
        } else {
            format!("Store OK - {} tables reachable", self.tables_checked)
        }
    }
}

#[cfg(test)]
mod tests {
    use db::{DBService, TABLES};

    use super::*;
    use crate::services::test_store::MemoryStore;

    #[tokio::test]
    async fn migrated_sqlite_store_has_every_table() {
        let db = DBService::new("sqlite::memory:").await.unwrap();
        let result = DatabaseValidator::new(Arc::new(db)).validate(TABLES).await;
        assert!(result.is_ok(), "{}", result.summary());
        assert_eq!(result.tables_checked, TABLES.len());
    }

    #[tokio::test]
    async fn unknown_tables_are_reported_missing() {
        let db = DBService::new("sqlite::memory:").await.unwrap();
        let result = DatabaseValidator::new(Arc::new(db))
            .validate(&["clients", "team_payment_records"])
            .await;
        assert_eq!(result.missing_tables, vec!["team_payment_records"]);
        assert!(!result.is_ok());
    }

    #[tokio::test]
    async fn failures_become_warnings() {
        let store = Arc::new(MemoryStore::default());
        store.fail_after(0);
        let result = DatabaseValidator::new(store).validate(&["clients"]).await;
        assert_eq!(result.warnings.len(), 1);
        assert!(result.missing_tables.is_empty());
    }
}
