use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::post,
};
use db::models::notification::Notification;
use services::services::sync::SyncReport;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Notification>>, ApiError> {
    let notification = state.studio.mark_notification_read(&id).await?;
    Ok(ResponseJson(ApiResponse::success(notification)))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<SyncReport>>, ApiError> {
    let notifications = &state.studio.notifications;
    if !notifications.is_loaded().await {
        notifications.fetch().await?;
    }
    let report = state.studio.mark_all_notifications_read().await?;
    Ok(ResponseJson(ApiResponse::success(report)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/notifications/read-all", post(mark_all_read))
        .route("/notifications/{id}/read", post(mark_read))
}
