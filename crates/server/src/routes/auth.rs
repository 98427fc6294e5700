use axum::{
    Extension, Json, Router,
    extract::State,
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::user::User;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::Session};

#[derive(Debug, Deserialize, TS)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, TS)]
pub struct SignInResponse {
    pub token: Uuid,
    pub user: User,
}

/// POST /api/auth/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> Result<ResponseJson<ApiResponse<SignInResponse>>, ApiError> {
    let result = state.auth.sign_in(&payload.email, &payload.password).await;
    match (result.user, result.error) {
        (Some(user), None) => {
            let token = state.auth.start_session(user.clone());
            Ok(ResponseJson(ApiResponse::success(SignInResponse { token, user })))
        }
        (_, error) => Err(ApiError::SignIn(
            error.unwrap_or_else(|| "Invalid credentials".to_string()),
        )),
    }
}

/// POST /api/auth/sign-out
pub async fn sign_out(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ResponseJson<ApiResponse<()>> {
    state.auth.sign_out(session.token);
    ResponseJson(ApiResponse::success(()))
}

/// GET /api/auth/me
pub async fn current_user(Extension(session): Extension<Session>) -> ResponseJson<ApiResponse<User>> {
    ResponseJson(ApiResponse::success(session.user))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/auth/sign-in", post(sign_in))
}

pub fn session_router() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-out", post(sign_out))
        .route("/auth/me", get(current_user))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::test_support::{app, send, sign_in};

    #[tokio::test]
    async fn sign_in_opens_a_session() {
        let (_, router) = app().await;
        let token = sign_in(&router, "staff@studio.id").await;

        let (status, body) = send(&router, "GET", "/api/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], "U-STAFF");
        assert!(body["data"].get("password").is_none());

        let (status, _) = send(&router, "POST", "/api/auth/sign-out", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&router, "GET", "/api/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected_with_a_message() {
        let (_, router) = app().await;
        let (status, body) = send(
            &router,
            "POST",
            "/api/auth/sign-in",
            None,
            Some(serde_json::json!({ "email": "staff@studio.id", "password": "salah" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid credentials");
    }
}
