//! Bearer-token sessions for the authenticated part of the API.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use db::models::user::{User, ViewType};
use services::services::auth::AuthError;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// The signed-in user, inserted into request extensions by [`require_session`].
#[derive(Debug, Clone)]
pub struct Session {
    pub token: Uuid,
    pub user: User,
}

impl Session {
    /// Fail unless the user may open `view`.
    pub fn require(&self, view: ViewType) -> Result<(), ApiError> {
        if self.user.has_permission(view) {
            Ok(())
        } else {
            Err(AuthError::Forbidden(view).into())
        }
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(|token| Uuid::parse_str(token.trim()).ok())
}

pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers()).ok_or(AuthError::Unauthenticated)?;
    let user = state
        .auth
        .session(token)
        .ok_or(AuthError::Unauthenticated)?;

    request.extensions_mut().insert(Session { token, user });
    Ok(next.run(request).await)
}
