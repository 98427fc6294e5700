//! Client and freelancer portals, addressed by an opaque access id instead
//! of a session.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{
    contract::Contract,
    notification::Notification,
    project::{ConfirmationStage, Project},
};
use serde::{Deserialize, Serialize};
use services::services::portal::{ClientPortal, FreelancerPortal};
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize, TS)]
pub struct ConfirmStageRequest {
    pub stage: ConfirmationStage,
}

#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct SubStatusRequest {
    pub sub_status: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Serialize, TS)]
pub struct SubStatusConfirmed {
    pub project: Project,
    pub notification: Notification,
}

#[derive(Debug, Deserialize, TS)]
pub struct SignatureRequest {
    pub signature: String,
}

pub async fn client_portal(
    State(state): State<AppState>,
    Path(access_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<ClientPortal>>, ApiError> {
    let portal = state.studio.client_portal(&access_id).await?;
    Ok(ResponseJson(ApiResponse::success(portal)))
}

pub async fn confirm_stage(
    State(state): State<AppState>,
    Path((access_id, project_id)): Path<(String, String)>,
    Json(request): Json<ConfirmStageRequest>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let project = state
        .studio
        .portal_confirm_stage(&access_id, &project_id, request.stage)
        .await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub async fn confirm_sub_status(
    State(state): State<AppState>,
    Path((access_id, project_id)): Path<(String, String)>,
    Json(request): Json<SubStatusRequest>,
) -> Result<ResponseJson<ApiResponse<SubStatusConfirmed>>, ApiError> {
    let (project, notification) = state
        .studio
        .portal_confirm_sub_status(&access_id, &project_id, &request.sub_status, &request.note)
        .await?;
    Ok(ResponseJson(ApiResponse::success(SubStatusConfirmed {
        project,
        notification,
    })))
}

pub async fn sign_contract(
    State(state): State<AppState>,
    Path((access_id, contract_id)): Path<(String, String)>,
    Json(request): Json<SignatureRequest>,
) -> Result<ResponseJson<ApiResponse<Contract>>, ApiError> {
    let contract = state
        .studio
        .portal_sign_contract(&access_id, &contract_id, &request.signature)
        .await?;
    Ok(ResponseJson(ApiResponse::success(contract)))
}

pub async fn freelancer_portal(
    State(state): State<AppState>,
    Path(access_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<FreelancerPortal>>, ApiError> {
    let portal = state.studio.freelancer_portal(&access_id).await?;
    Ok(ResponseJson(ApiResponse::success(portal)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/portal/{access_id}", get(client_portal))
        .route(
            "/portal/{access_id}/projects/{project_id}/confirm",
            post(confirm_stage),
        )
        .route(
            "/portal/{access_id}/projects/{project_id}/sub-status",
            post(confirm_sub_status),
        )
        .route(
            "/portal/{access_id}/contracts/{contract_id}/sign",
            post(sign_contract),
        )
        .route("/freelancer-portal/{access_id}", get(freelancer_portal))
}
