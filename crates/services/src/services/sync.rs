//! Reconciliation of a cached collection with its remote table.
//!
//! [`reconcile`] is the pure half: it compares the current collection with a
//! proposed next one and plans the minimal set of inserts, updates and
//! deletes. [`TableSynchronizer`] owns the cached collection of one table,
//! runs the plan against a [`TableStore`] one effect at a time and keeps the
//! cache in step with what the store accepted.
//!
//! There is no transaction: when an effect fails, the ones before it stay
//! applied and the error reports how many went through.

use std::{collections::HashSet, sync::Arc};

use db::{Entity, Query, StorageRow, StoreError, TableStore, timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info};
use ts_rs::TS;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Record {id} not found in {table}")]
    Missing { table: &'static str, id: String },
    #[error("Reconciliation stopped after {applied} change(s): {source}")]
    Partial {
        applied: usize,
        #[source]
        source: StoreError,
    },
}

/// Which remote operations a reconciliation may issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct SyncCapabilities {
    pub insert: bool,
    pub update: bool,
    pub delete: bool,
}

impl SyncCapabilities {
    pub const ALL: Self = Self {
        insert: true,
        update: true,
        delete: true,
    };
    pub const UPDATE_ONLY: Self = Self {
        insert: false,
        update: true,
        delete: false,
    };
}

impl Default for SyncCapabilities {
    fn default() -> Self {
        Self::ALL
    }
}

/// One planned remote call.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect<E> {
    Insert(E),
    /// Only the storage columns that changed
    Update { id: String, changes: StorageRow },
    Delete { id: String },
}

/// Plan the remote calls that turn `current` into `next`.
///
/// Records whose id is missing from `current` (or empty) are inserted, records
/// whose id is present but whose value differs are updated, and records that
/// disappeared are deleted. Operations missing from `capabilities` are not
/// planned. A repeated id in `next` is only considered once.
pub fn reconcile<E: Entity>(
    current: &[E],
    next: &[E],
    capabilities: SyncCapabilities,
) -> Vec<Effect<E>> {
    let mut effects = Vec::new();
    let mut seen = HashSet::new();

    for record in next {
        let id = record.id();
        if !id.is_empty() && !seen.insert(id) {
            continue;
        }
        match current.iter().find(|c| !id.is_empty() && c.id() == id) {
            None => {
                if capabilities.insert {
                    effects.push(Effect::Insert(record.clone()));
                }
            }
            Some(existing) if existing != record => {
                let changes = record.changes_since(existing);
                if capabilities.update && !changes.is_empty() {
                    effects.push(Effect::Update {
                        id: id.to_string(),
                        changes,
                    });
                }
            }
            Some(_) => {}
        }
    }

    if capabilities.delete {
        effects.extend(
            current
                .iter()
                .filter(|c| !seen.contains(c.id()))
                .map(|c| Effect::Delete {
                    id: c.id().to_string(),
                }),
        );
    }

    effects
}

/// Counts of the effects a reconciliation applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct SyncReport {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl SyncReport {
    pub fn total(&self) -> usize {
        self.inserted + self.updated + self.deleted
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct TableStatus {
    pub loading: bool,
    pub error: Option<String>,
}

struct TableState<E> {
    records: Vec<E>,
    loaded: bool,
    status: TableStatus,
}

impl<E: Entity> TableState<E> {
    fn put(&mut self, record: E) {
        match self.records.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => *slot = record,
            None if self.loaded => self.records.insert(0, record),
            None => {}
        }
    }

    fn splice(&mut self, id: &str) {
        self.records.retain(|r| r.id() != id);
    }
}

/// Read-through, write-through cache of one remote table.
pub struct TableSynchronizer<E: Entity> {
    store: Arc<dyn TableStore>,
    state: RwLock<TableState<E>>,
    // Serialises writes so reconciliations never interleave
    writes: Mutex<()>,
}

impl<E: Entity> TableSynchronizer<E> {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self {
            store,
            state: RwLock::new(TableState {
                records: Vec::new(),
                loaded: false,
                status: TableStatus::default(),
            }),
            writes: Mutex::new(()),
        }
    }

    pub fn table(&self) -> &'static str {
        E::TABLE
    }

    /// Load the whole table, newest first, replacing the cache.
    pub async fn fetch(&self) -> Result<Vec<E>, SyncError> {
        {
            let mut state = self.state.write().await;
            state.status.loading = true;
            state.status.error = None;
        }

        let result = self
            .store
            .select(E::TABLE, &Query::new().newest_first())
            .await;

        let mut state = self.state.write().await;
        state.status.loading = false;
        match result {
            Ok(rows) => {
                state.records = rows.iter().map(E::from_row).collect();
                state.loaded = true;
                debug!(table = E::TABLE, count = state.records.len(), "Fetched table");
                Ok(state.records.clone())
            }
            Err(e) => {
                error!(table = E::TABLE, error = %e, "Error fetching table");
                state.status.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    pub async fn refetch(&self) -> Result<Vec<E>, SyncError> {
        self.fetch().await
    }

    pub async fn snapshot(&self) -> Vec<E> {
        self.state.read().await.records.clone()
    }

    /// Whether the table has been fetched at least once.
    pub async fn is_loaded(&self) -> bool {
        self.state.read().await.loaded
    }

    pub async fn status(&self) -> TableStatus {
        self.state.read().await.status.clone()
    }

    /// Cached record with the given id.
    pub async fn find(&self, id: &str) -> Option<E> {
        self.state
            .read()
            .await
            .records
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }

    /// Cached record, or the stored one when the cache does not hold it.
    pub async fn get(&self, id: &str) -> Result<E, SyncError> {
        if let Some(record) = self.find(id).await {
            return Ok(record);
        }
        let row = self
            .store
            .select_single(E::TABLE, &Query::new().eq("id", id))
            .await?
            .ok_or_else(|| SyncError::Missing {
                table: E::TABLE,
                id: id.to_string(),
            })?;
        Ok(E::from_row(&row))
    }

    /// Insert one record; the stored version is prepended to the cache.
    pub async fn insert(&self, record: E) -> Result<E, SyncError> {
        let _guard = self.writes.lock().await;
        self.insert_unlocked(&record).await.map_err(SyncError::from)
    }

    /// Write `changes` (storage columns) to one row, stamped with `updated_at`.
    pub async fn update(&self, id: &str, changes: StorageRow) -> Result<E, SyncError> {
        let _guard = self.writes.lock().await;
        self.update_unlocked(id, changes).await.map_err(SyncError::from)
    }

    /// Edit one record in place and write back only what changed.
    pub async fn modify(&self, id: &str, edit: impl FnOnce(&mut E)) -> Result<E, SyncError> {
        self.try_modify(id, |record| {
            edit(record);
            Ok::<_, SyncError>(())
        })
        .await
    }

    /// [`TableSynchronizer::modify`] with an editor that may reject the edit.
    ///
    /// The editor runs on the record as read under the table's write lock, so
    /// edits racing on other columns are not overwritten. A rejected edit
    /// writes nothing.
    pub async fn try_modify<X>(
        &self,
        id: &str,
        edit: impl FnOnce(&mut E) -> Result<(), X>,
    ) -> Result<E, X>
    where
        X: From<SyncError>,
    {
        let _guard = self.writes.lock().await;
        let previous = self.get(id).await?;
        let mut next = previous.clone();
        edit(&mut next)?;

        let changes = next.changes_since(&previous);
        if changes.is_empty() {
            return Ok(previous);
        }
        Ok(self.update_unlocked(id, changes).await.map_err(SyncError::from)?)
    }

    pub async fn remove(&self, id: &str) -> Result<(), SyncError> {
        let _guard = self.writes.lock().await;
        self.delete_unlocked(id).await.map_err(SyncError::from)
    }

    /// Converge the table to `updater(current)`.
    ///
    /// Effects run sequentially; the first failure stops the run and earlier
    /// effects are not rolled back.
    pub async fn apply(
        &self,
        updater: impl FnOnce(&[E]) -> Vec<E>,
        capabilities: SyncCapabilities,
    ) -> Result<SyncReport, SyncError> {
        let _guard = self.writes.lock().await;
        let current = self.snapshot().await;
        let next = updater(&current);
        let effects = reconcile(&current, &next, capabilities);

        let mut report = SyncReport::default();
        for effect in effects {
            let result = match effect {
                Effect::Insert(record) => self
                    .insert_unlocked(&record)
                    .await
                    .map(|_| report.inserted += 1),
                Effect::Update { id, changes } => self
                    .update_unlocked(&id, changes)
                    .await
                    .map(|_| report.updated += 1),
                Effect::Delete { id } => self
                    .delete_unlocked(&id)
                    .await
                    .map(|_| report.deleted += 1),
            };
            if let Err(source) = result {
                error!(
                    table = E::TABLE,
                    applied = report.total(),
                    error = %source,
                    "Reconciliation failed"
                );
                return Err(SyncError::Partial {
                    applied: report.total(),
                    source,
                });
            }
        }

        if report.total() > 0 {
            info!(
                table = E::TABLE,
                inserted = report.inserted,
                updated = report.updated,
                deleted = report.deleted,
                "Reconciled table"
            );
        }
        Ok(report)
    }

    async fn insert_unlocked(&self, record: &E) -> Result<E, StoreError> {
        let row = self.store.insert(E::TABLE, record.to_insert_row()).await?;
        let stored = E::from_row(&row);
        self.state.write().await.records.insert(0, stored.clone());
        Ok(stored)
    }

    async fn update_unlocked(&self, id: &str, changes: StorageRow) -> Result<E, StoreError> {
        let changes = changes
            .without(E::READ_ONLY)
            .without(&["id"])
            .with("updated_at", timestamp());
        let row = self.store.update(E::TABLE, id, changes).await?;
        let stored = E::from_row(&row);
        self.state.write().await.put(stored.clone());
        Ok(stored)
    }

    async fn delete_unlocked(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(E::TABLE, id).await?;
        self.state.write().await.splice(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use db::models::{
        lead::{Lead, LeadStatus},
        sop::Sop,
    };

    use super::*;
    use crate::services::test_store::MemoryStore;

    fn lead(id: &str, name: &str) -> Lead {
        Lead {
            id: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn reconciling_with_itself_is_a_no_op() {
        let current = vec![lead("L-1", "Budi"), lead("L-2", "Sari")];
        assert!(reconcile(&current, &current, SyncCapabilities::ALL).is_empty());
    }

    #[test]
    fn new_record_is_inserted_once() {
        let a = lead("L-1", "Budi");
        let effects = reconcile(&[], std::slice::from_ref(&a), SyncCapabilities::ALL);
        assert_eq!(effects, vec![Effect::Insert(a)]);
    }

    #[test]
    fn removed_record_is_deleted_only_with_capability() {
        let current = vec![lead("L-1", "Budi")];
        assert_eq!(
            reconcile(&current, &[], SyncCapabilities::ALL),
            vec![Effect::Delete {
                id: "L-1".to_string()
            }]
        );
        let keep = SyncCapabilities {
            delete: false,
            ..SyncCapabilities::ALL
        };
        assert!(reconcile(&current, &[], keep).is_empty());
    }

    #[test]
    fn changed_record_updates_only_changed_columns() {
        let current = vec![lead("L-1", "Budi")];
        let next = vec![Lead {
            status: LeadStatus::Converted,
            ..lead("L-1", "Budi")
        }];
        let effects = reconcile(&current, &next, SyncCapabilities::ALL);
        assert_eq!(effects.len(), 1);
        match &effects[0] {
            Effect::Update { id, changes } => {
                assert_eq!(id, "L-1");
                assert_eq!(changes.len(), 1);
                assert_eq!(changes.text("status"), "converted");
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn capabilities_mask_effects() {
        let current = vec![lead("L-1", "Budi")];
        let next = vec![lead("L-1", "Budi S."), lead("L-2", "Sari")];

        let insert_only = SyncCapabilities {
            insert: true,
            update: false,
            delete: false,
        };
        let inserts = reconcile(&current, &next, insert_only);
        assert_eq!(inserts, vec![Effect::Insert(lead("L-2", "Sari"))]);

        let updates = reconcile(&current, &next, SyncCapabilities::UPDATE_ONLY);
        assert!(matches!(updates.as_slice(), [Effect::Update { id, .. }] if id == "L-1"));
    }

    #[test]
    fn read_only_difference_is_not_an_update() {
        let current = vec![Sop {
            id: "SOP-1".to_string(),
            last_updated: "2024-01-01".to_string(),
            ..Default::default()
        }];
        let next = vec![Sop {
            last_updated: "2024-06-01".to_string(),
            ..current[0].clone()
        }];
        assert!(reconcile(&current, &next, SyncCapabilities::ALL).is_empty());
    }

    #[tokio::test]
    async fn apply_converges_the_store() {
        let store = Arc::new(MemoryStore::default());
        let leads = TableSynchronizer::<Lead>::new(store.clone());
        leads.insert(lead("L-1", "Budi")).await.unwrap();
        leads.insert(lead("L-2", "Sari")).await.unwrap();

        let report = leads
            .apply(
                |current| {
                    let mut next: Vec<Lead> =
                        current.iter().filter(|l| l.id != "L-2").cloned().collect();
                    next[0].notes = Some("call back friday".to_string());
                    next.push(lead("L-3", "Andi"));
                    next
                },
                SyncCapabilities::ALL,
            )
            .await
            .unwrap();

        assert_eq!(
            report,
            SyncReport {
                inserted: 1,
                updated: 1,
                deleted: 1
            }
        );

        let remote = leads.fetch().await.unwrap();
        let mut ids: Vec<_> = remote.iter().map(|l| l.id.clone()).collect();
        ids.sort();
        assert_eq!(ids, vec!["L-1", "L-3"]);
        assert_eq!(
            leads.find("L-1").await.unwrap().notes.as_deref(),
            Some("call back friday")
        );
    }

    #[tokio::test]
    async fn failure_stops_without_rollback() {
        let store = Arc::new(MemoryStore::default());
        let leads = TableSynchronizer::<Lead>::new(store.clone());

        store.fail_after(1);
        let err = leads
            .apply(
                |_| vec![lead("L-1", "Budi"), lead("L-2", "Sari"), lead("L-3", "Andi")],
                SyncCapabilities::ALL,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::Partial { applied: 1, .. }));
        assert_eq!(store.rows("leads").len(), 1);
        assert_eq!(leads.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn fetch_failure_is_reported_in_status() {
        let store = Arc::new(MemoryStore::default());
        let leads = TableSynchronizer::<Lead>::new(store.clone());

        store.fail_after(0);
        assert!(leads.fetch().await.is_err());
        let status = leads.status().await;
        assert!(!status.loading);
        assert!(status.error.is_some());
    }

    #[tokio::test]
    async fn modify_writes_changed_columns_with_stamp() {
        let store = Arc::new(MemoryStore::default());
        let leads = TableSynchronizer::<Lead>::new(store.clone());
        leads.insert(lead("L-1", "Budi")).await.unwrap();

        leads
            .modify("L-1", |l| l.status = LeadStatus::FollowUp)
            .await
            .unwrap();

        let (id, changes) = store.last_update().unwrap();
        assert_eq!(id, "L-1");
        assert_eq!(changes.text("status"), "follow_up");
        assert!(changes.contains("updated_at"));
        assert!(!changes.contains("name"));
    }

    #[tokio::test]
    async fn edits_apply_to_the_latest_record() {
        let store = Arc::new(MemoryStore::default());
        let leads = Arc::new(TableSynchronizer::<Lead>::new(store.clone()));
        leads.insert(lead("L-1", "Budi")).await.unwrap();

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let leads = leads.clone();
                tokio::spawn(async move {
                    leads
                        .modify("L-1", move |l| {
                            if i % 2 == 0 {
                                l.notes = Some(format!("{} note {i}", l.notes.clone().unwrap_or_default()));
                            } else {
                                l.location = format!("{}+{i}", l.location);
                            }
                        })
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let after = leads.get("L-1").await.unwrap();
        for i in 0..8 {
            let needle = if i % 2 == 0 { format!("note {i}") } else { format!("+{i}") };
            let field = if i % 2 == 0 { after.notes.clone().unwrap() } else { after.location.clone() };
            assert!(field.contains(&needle), "edit {i} lost: {after:?}");
        }
    }

    #[tokio::test]
    async fn rejected_edit_writes_nothing() {
        let store = Arc::new(MemoryStore::default());
        let leads = TableSynchronizer::<Lead>::new(store.clone());
        leads.insert(lead("L-1", "Budi")).await.unwrap();

        let result = leads
            .try_modify("L-1", |l| {
                l.name = "Changed".to_string();
                Err(SyncError::Missing {
                    table: "leads",
                    id: "L-1".to_string(),
                })
            })
            .await;
        assert!(result.is_err());
        assert!(store.last_update().is_none());
        assert_eq!(leads.find("L-1").await.unwrap().name, "Budi");
    }

    #[tokio::test]
    async fn get_reads_through_to_the_store() {
        let store = Arc::new(MemoryStore::default());
        store.seed("leads", lead("L-9", "Rudi").to_row());
        let leads = TableSynchronizer::<Lead>::new(store.clone());

        assert_eq!(leads.get("L-9").await.unwrap().name, "Rudi");
        assert!(matches!(
            leads.get("L-404").await,
            Err(SyncError::Missing { .. })
        ));
    }
}
