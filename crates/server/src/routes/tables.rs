//! CRUD and reconciliation endpoints for every studio table.
//!
//! Each table is served under `/tables/{table}` by the same generic handlers;
//! [`StudioTable`] ties an entity to its synchronizer and to the view a user
//! needs permission for.

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, patch},
};
use db::{
    Entity,
    models::{
        asset::Asset,
        card::Card,
        client::Client,
        contract::Contract,
        feedback::ClientFeedback,
        lead::Lead,
        notification::Notification,
        package::{AddOn, Package},
        pocket::FinancialPocket,
        project::Project,
        promo_code::PromoCode,
        social_media::SocialMediaPost,
        sop::Sop,
        team_member::TeamMember,
        transaction::Transaction,
        user::ViewType,
    },
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use services::services::{
    studio::Studio,
    sync::{SyncCapabilities, SyncReport, TableSynchronizer},
};
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError, middleware::Session};

pub trait StudioTable: Entity + Serialize + DeserializeOwned {
    /// View a user must be allowed to open to work with this table
    const VIEW: ViewType;

    fn synchronizer(studio: &Studio) -> &TableSynchronizer<Self>;
}

macro_rules! studio_table {
    ($($entity:ty => $field:ident, $view:expr;)+) => {
        $(impl StudioTable for $entity {
            const VIEW: ViewType = $view;

            fn synchronizer(studio: &Studio) -> &TableSynchronizer<Self> {
                &studio.$field
            }
        })+
    };
}

studio_table! {
    Client => clients, ViewType::Clients;
    Project => projects, ViewType::Projects;
    Transaction => transactions, ViewType::Finance;
    TeamMember => team_members, ViewType::Team;
    Package => packages, ViewType::Packages;
    AddOn => add_ons, ViewType::Packages;
    Card => cards, ViewType::Finance;
    FinancialPocket => pockets, ViewType::Finance;
    Lead => leads, ViewType::Leads;
    Asset => assets, ViewType::Assets;
    Contract => contracts, ViewType::Contracts;
    ClientFeedback => feedback, ViewType::ClientFeedback;
    SocialMediaPost => social_media_posts, ViewType::SocialMedia;
    PromoCode => promo_codes, ViewType::PromoCodes;
    Sop => sops, ViewType::Sops;
    Notification => notifications, ViewType::Dashboard;
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub refresh: bool,
}

/// Proposed full collection for a table.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", bound = "T: DeserializeOwned")]
pub struct ReconcileRequest<T> {
    pub records: Vec<T>,
    #[serde(default)]
    pub capabilities: Option<SyncCapabilities>,
}

/// GET /api/tables/{table}
pub async fn list<T: StudioTable>(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(params): Query<ListParams>,
) -> Result<ResponseJson<ApiResponse<Vec<T>>>, ApiError> {
    session.require(T::VIEW)?;
    let sync = T::synchronizer(&state.studio);
    let records = if params.refresh || !sync.is_loaded().await {
        sync.fetch().await?
    } else {
        sync.snapshot().await
    };
    Ok(ResponseJson(ApiResponse::success(records)))
}

/// POST /api/tables/{table}
pub async fn create<T: StudioTable>(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(record): Json<T>,
) -> Result<ResponseJson<ApiResponse<T>>, ApiError> {
    session.require(T::VIEW)?;
    let record = T::synchronizer(&state.studio).insert(record).await?;
    Ok(ResponseJson(ApiResponse::success(record)))
}

/// PATCH /api/tables/{table}/{id}
///
/// The body holds the camelCase fields to change; everything else keeps its
/// current value.
pub async fn update<T: StudioTable>(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(patch): Json<Value>,
) -> Result<ResponseJson<ApiResponse<T>>, ApiError> {
    session.require(T::VIEW)?;
    let Value::Object(mut changes) = patch else {
        return Err(ApiError::BadRequest("Expected a JSON object".to_string()));
    };
    changes.remove("id");

    let record = T::synchronizer(&state.studio)
        .try_modify(&id, move |record| apply_patch(record, changes))
        .await?;
    Ok(ResponseJson(ApiResponse::success(record)))
}

/// Overlay `changes` on the record's wire form and read it back.
fn apply_patch<T: StudioTable>(record: &mut T, changes: Map<String, Value>) -> Result<(), ApiError> {
    let mut merged =
        serde_json::to_value(&*record).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    if let Value::Object(fields) = &mut merged {
        fields.extend(changes);
    }
    *record = serde_json::from_value(merged).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(())
}

/// DELETE /api/tables/{table}/{id}
pub async fn remove<T: StudioTable>(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    session.require(T::VIEW)?;
    T::synchronizer(&state.studio).remove(&id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

/// PUT /api/tables/{table}
pub async fn reconcile<T: StudioTable>(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(request): Json<ReconcileRequest<T>>,
) -> Result<ResponseJson<ApiResponse<SyncReport>>, ApiError> {
    session.require(T::VIEW)?;
    let sync = T::synchronizer(&state.studio);
    if !sync.is_loaded().await {
        sync.fetch().await?;
    }
    let capabilities = request.capabilities.unwrap_or_default();
    let records = request.records;
    let report = sync.apply(move |_| records, capabilities).await?;
    Ok(ResponseJson(ApiResponse::success(report)))
}

fn table<T: StudioTable>() -> Router<AppState> {
    Router::new()
        .route(
            &format!("/tables/{}", T::TABLE),
            get(list::<T>).post(create::<T>).put(reconcile::<T>),
        )
        .route(
            &format!("/tables/{}/{{id}}", T::TABLE),
            patch(update::<T>).delete(remove::<T>),
        )
}

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(table::<Client>())
        .merge(table::<Project>())
        .merge(table::<Transaction>())
        .merge(table::<TeamMember>())
        .merge(table::<Package>())
        .merge(table::<AddOn>())
        .merge(table::<Card>())
        .merge(table::<FinancialPocket>())
        .merge(table::<Lead>())
        .merge(table::<Asset>())
        .merge(table::<Contract>())
        .merge(table::<ClientFeedback>())
        .merge(table::<SocialMediaPost>())
        .merge(table::<PromoCode>())
        .merge(table::<Sop>())
        .merge(table::<Notification>())
}
