use std::sync::Arc;

use db::{DBService, StoreError, TableStore};
use services::services::{
    auth::AuthService,
    config::{Backend, Config},
    rest_store::RestStore,
    studio::Studio,
};

pub mod error;
pub mod middleware;
pub mod routes;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub studio: Arc<Studio>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self {
            studio: Arc::new(Studio::new(store.clone())),
            auth: Arc::new(AuthService::new(store)),
        }
    }
}

/// Open the table store the configuration points at.
pub async fn open_store(config: &Config) -> Result<Arc<dyn TableStore>, StoreError> {
    match &config.backend {
        Backend::Rest { url, anon_key } => {
            tracing::info!(url = %url, "Using hosted table store");
            Ok(Arc::new(RestStore::new(url.clone(), anon_key.clone())?))
        }
        Backend::Sqlite { database_url } => {
            tracing::info!(database_url, "Using local SQLite store");
            Ok(Arc::new(DBService::new(database_url).await?))
        }
    }
}
