use axum::{Router, middleware::from_fn_with_state};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{AppState, middleware::require_session};

pub mod auth;
pub mod health;
pub mod notifications;
pub mod portal;
pub mod profile;
pub mod public;
pub mod signatures;
pub mod tables;

pub fn router(state: AppState) -> Router {
    let signed_in = Router::new()
        .merge(auth::session_router())
        .merge(profile::router())
        .merge(tables::router())
        .merge(notifications::router())
        .merge(signatures::router())
        .route_layer(from_fn_with_state(state.clone(), require_session));

    let api = Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(public::router())
        .merge(portal::router())
        .merge(signed_in);

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
    };
    use db::{DBService, Entity, TableStore, models::user::{User, UserRole, ViewType}};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::AppState;

    pub async fn app() -> (AppState, Router) {
        let store: Arc<dyn TableStore> = Arc::new(DBService::new("sqlite::memory:").await.unwrap());
        for (id, email, role, permissions) in [
            ("U-ADMIN", "admin@studio.id", UserRole::Admin, vec![]),
            (
                "U-STAFF",
                "staff@studio.id",
                UserRole::Member,
                vec![ViewType::Projects, ViewType::Leads],
            ),
        ] {
            let user = User {
                id: id.to_string(),
                email: email.to_string(),
                password: "rahasia".to_string(),
                full_name: id.to_string(),
                role,
                permissions,
            };
            store.insert(User::TABLE, user.to_insert_row()).await.unwrap();
        }
        let state = AppState::new(store);
        (state.clone(), super::router(state))
    }

    pub async fn sign_in(router: &Router, email: &str) -> String {
        let (status, body) = send(
            router,
            "POST",
            "/api/auth/sign-in",
            None,
            Some(serde_json::json!({ "email": email, "password": "rahasia" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    pub async fn send(
        router: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}
