use axum::{Extension, Json, Router, extract::State, response::Json as ResponseJson, routing::get};
use db::models::{
    profile::{Profile, ProfileUpdate},
    user::ViewType,
};
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError, middleware::Session};

pub async fn get_profile(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Profile>>, ApiError> {
    let profile = state.studio.profile.get().await?;
    Ok(ResponseJson(ApiResponse::success(profile)))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(update): Json<ProfileUpdate>,
) -> Result<ResponseJson<ApiResponse<Profile>>, ApiError> {
    session.require(ViewType::Settings)?;
    let profile = state.studio.profile.update(update).await?;
    tracing::info!(user_id = %session.user.id, "Profile updated");
    Ok(ResponseJson(ApiResponse::success(profile)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).patch(update_profile))
}
