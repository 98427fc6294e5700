use std::sync::Arc;

use db::{
    Entity, Query, StoreError, TableStore,
    models::profile::{Profile, ProfileUpdate},
    timestamp,
};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// The studio's single company profile.
pub struct ProfileService {
    store: Arc<dyn TableStore>,
    cached: RwLock<Option<Profile>>,
    writes: Mutex<()>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self {
            store,
            cached: RwLock::new(None),
            writes: Mutex::new(()),
        }
    }

    /// The stored profile, or the defaults when none has been saved yet.
    pub async fn get(&self) -> Result<Profile, StoreError> {
        if let Some(profile) = self.cached.read().await.clone() {
            return Ok(profile);
        }
        self.refetch().await
    }

    pub async fn refetch(&self) -> Result<Profile, StoreError> {
        // Oldest row wins if more than one was ever created
        let rows = self
            .store
            .select(Profile::TABLE, &Query::new().order_by("created_at", true).limit(1))
            .await?;
        let profile = match rows.first() {
            Some(row) => Profile::from_row(row),
            None => {
                debug!("No stored profile, using defaults");
                Profile::default()
            }
        };
        *self.cached.write().await = Some(profile.clone());
        Ok(profile)
    }

    /// Apply a partial edit, creating the profile row on first save.
    pub async fn update(&self, update: ProfileUpdate) -> Result<Profile, StoreError> {
        // Serialised so two first saves cannot both insert a row
        let _guard = self.writes.lock().await;
        let current = self.get().await?;
        let changes = update.to_row();

        let row = if current.id.is_empty() {
            let mut row = current.to_insert_row();
            row.merge(changes);
            let row = self.store.insert(Profile::TABLE, row).await?;
            info!("Created studio profile");
            row
        } else {
            self.store
                .update(
                    Profile::TABLE,
                    &current.id,
                    changes.with("updated_at", timestamp()),
                )
                .await?
        };

        let profile = Profile::from_row(&row);
        *self.cached.write().await = Some(profile.clone());
        Ok(profile)
    }
}
