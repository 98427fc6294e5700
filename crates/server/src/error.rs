use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::StoreError;
use services::services::{
    auth::AuthError, portal::PortalError, studio::StudioError, sync::SyncError,
};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error, ts_rs::TS)]
#[ts(type = "string")]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error(transparent)]
    Studio(#[from] StudioError),
    #[error(transparent)]
    Portal(#[from] PortalError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{0}")]
    SignIn(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

fn store_status(error: &StoreError) -> (StatusCode, &'static str) {
    match error {
        StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "Record not found"),
        StoreError::Rejected { status: 404, .. } => (StatusCode::NOT_FOUND, "Table not found"),
        StoreError::Rejected { status, .. } if (400..500).contains(status) => {
            (StatusCode::BAD_REQUEST, "Request rejected by the store")
        }
        StoreError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "Store timed out"),
        _ => (StatusCode::BAD_GATEWAY, "Store request failed"),
    }
}

fn sync_status(error: &SyncError) -> (StatusCode, String) {
    match error {
        SyncError::Store(e) => {
            let (status, message) = store_status(e);
            (status, message.to_string())
        }
        SyncError::Missing { .. } => (StatusCode::NOT_FOUND, error.to_string()),
        SyncError::Partial { applied, .. } => (
            StatusCode::BAD_GATEWAY,
            format!("Saving stopped after {applied} change(s); earlier changes were kept"),
        ),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, message) = match &self {
            ApiError::Store(e) => {
                let (status, message) = store_status(e);
                (status, message.to_string())
            }
            ApiError::Sync(e) => sync_status(e),
            ApiError::Studio(StudioError::Sync(e)) => sync_status(e),
            ApiError::Studio(StudioError::Store(e)) | ApiError::Portal(PortalError::Store(e)) => {
                let (status, message) = store_status(e);
                (status, message.to_string())
            }
            ApiError::Studio(StudioError::Portal(PortalError::Store(e))) => {
                let (status, message) = store_status(e);
                (status, message.to_string())
            }
            ApiError::Studio(StudioError::Portal(PortalError::UnknownAccessId))
            | ApiError::Portal(PortalError::UnknownAccessId) => {
                (StatusCode::NOT_FOUND, "Portal not found".to_string())
            }
            ApiError::Studio(e @ StudioError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, e.to_string())
            }
            ApiError::Studio(StudioError::Invalid(message)) | ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, message.clone())
            }
            ApiError::Auth(AuthError::Unauthenticated) => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            ApiError::Auth(AuthError::Forbidden(_)) => (StatusCode::FORBIDDEN, self.to_string()),
            ApiError::SignIn(message) => (StatusCode::UNAUTHORIZED, message.clone()),
        };

        if status_code.is_server_error() {
            tracing::error!(error = %self, status = %status_code, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status_code, "Request rejected");
        }

        let response = ApiResponse::<()>::error(&message);
        (status_code, Json(response)).into_response()
    }
}
