//! Studio-side signatures on invoices, receipts and contracts.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::post,
};
use db::models::{
    contract::{Contract, Signer},
    project::Project,
    transaction::Transaction,
    user::ViewType,
};
use utils::response::ApiResponse;

use super::portal::SignatureRequest;
use crate::{AppState, error::ApiError, middleware::Session};

pub async fn sign_invoice(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(request): Json<SignatureRequest>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    session.require(ViewType::Projects)?;
    let project = state.studio.sign_invoice(&id, &request.signature).await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub async fn sign_transaction(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(request): Json<SignatureRequest>,
) -> Result<ResponseJson<ApiResponse<Transaction>>, ApiError> {
    session.require(ViewType::Finance)?;
    let transaction = state.studio.sign_transaction(&id, &request.signature).await?;
    Ok(ResponseJson(ApiResponse::success(transaction)))
}

pub async fn sign_contract(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(request): Json<SignatureRequest>,
) -> Result<ResponseJson<ApiResponse<Contract>>, ApiError> {
    session.require(ViewType::Contracts)?;
    let contract = state
        .studio
        .sign_contract(&id, &request.signature, Signer::Vendor)
        .await?;
    Ok(ResponseJson(ApiResponse::success(contract)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects/{id}/invoice-signature", post(sign_invoice))
        .route("/transactions/{id}/signature", post(sign_transaction))
        .route("/contracts/{id}/signature", post(sign_contract))
}
