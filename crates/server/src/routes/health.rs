use axum::{Router, extract::State, response::Json as ResponseJson, routing::get};
use services::services::studio::TableHealth;
use utils::response::ApiResponse;

use crate::AppState;

/// Load state of every cached table.
pub async fn health(State(state): State<AppState>) -> ResponseJson<ApiResponse<Vec<TableHealth>>> {
    ResponseJson(ApiResponse::success(state.studio.table_health().await))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
