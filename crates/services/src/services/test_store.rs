//! In-memory [`TableStore`] with failure injection for service tests.

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use db::{Query, StorageRow, StoreError, TableStore};
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<StorageRow>>>,
    sequence: AtomicUsize,
    // Remaining successful calls before every call fails; None never fails
    budget: Mutex<Option<usize>>,
    updates: Mutex<Vec<(String, StorageRow)>>,
}

impl MemoryStore {
    /// Let `calls` more calls succeed, then fail every call after them.
    pub fn fail_after(&self, calls: usize) {
        *self.budget.lock().unwrap() = Some(calls);
    }

    pub fn seed(&self, table: &str, row: StorageRow) {
        let row = self.stamp(row);
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    pub fn rows(&self, table: &str) -> Vec<StorageRow> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn last_update(&self) -> Option<(String, StorageRow)> {
        self.updates.lock().unwrap().last().cloned()
    }

    fn stamp(&self, mut row: StorageRow) -> StorageRow {
        let n = self.sequence.fetch_add(1, Ordering::SeqCst);
        if row.text("id").is_empty() {
            row.insert("id", Uuid::new_v4().to_string());
        }
        if !row.contains("created_at") {
            row.insert("created_at", format!("2024-01-01T00:00:00.{n:06}Z"));
        }
        row
    }

    fn check(&self) -> Result<(), StoreError> {
        let mut budget = self.budget.lock().unwrap();
        match budget.as_mut() {
            Some(0) => Err(StoreError::Transport("injected failure".to_string())),
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<StorageRow>, StoreError> {
        self.check()?;
        Ok(query.apply(self.rows(table)))
    }

    async fn insert(&self, table: &str, row: StorageRow) -> Result<StorageRow, StoreError> {
        self.check()?;
        let row = self.stamp(row);
        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(table.to_string()).or_default();
        if rows.iter().any(|r| r.text("id") == row.text("id")) {
            return Err(StoreError::Rejected {
                status: 409,
                message: "duplicate key".to_string(),
            });
        }
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        table: &str,
        id: &str,
        changes: StorageRow,
    ) -> Result<StorageRow, StoreError> {
        self.check()?;
        self.updates
            .lock()
            .unwrap()
            .push((id.to_string(), changes.clone()));
        let mut tables = self.tables.lock().unwrap();
        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|r| r.text("id") == id))
            .ok_or_else(|| StoreError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            })?;
        row.merge(changes);
        Ok(row.clone())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
        self.check()?;
        if let Some(rows) = self.tables.lock().unwrap().get_mut(table) {
            rows.retain(|r| r.text("id") != id);
        }
        Ok(())
    }
}
