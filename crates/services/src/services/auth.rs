//! Sign-in against the `users` table and in-memory sessions.
//!
//! Passwords are stored and compared as plaintext, which is how the existing
//! `users` table is populated.

use std::sync::Arc;

use dashmap::DashMap;
use db::{
    Entity, Query, TableStore,
    models::user::{User, ViewType},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Not signed in")]
    Unauthenticated,
    #[error("No access to {0}")]
    Forbidden(ViewType),
}

/// Outcome of a sign-in attempt. Exactly one of the fields is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct SignInResult {
    pub user: Option<User>,
    pub error: Option<String>,
}

impl SignInResult {
    fn failed(error: impl Into<String>) -> Self {
        Self {
            user: None,
            error: Some(error.into()),
        }
    }
}

pub struct AuthService {
    store: Arc<dyn TableStore>,
    sessions: DashMap<Uuid, User>,
}

impl AuthService {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self {
            store,
            sessions: DashMap::new(),
        }
    }

    /// Look the user up by email and compare the password.
    pub async fn sign_in(&self, email: &str, password: &str) -> SignInResult {
        let found = self
            .store
            .select_single(User::TABLE, &Query::new().eq("email", email))
            .await;

        let row = match found {
            Ok(Some(row)) => row,
            Ok(None) => return SignInResult::failed("User not found"),
            Err(e) => {
                warn!(error = %e, "User lookup failed");
                return SignInResult::failed(e.to_string());
            }
        };

        let user = User::from_row(&row);
        if user.password != password {
            info!(user_id = %user.id, "Rejected sign-in with wrong password");
            return SignInResult::failed("Invalid credentials");
        }

        SignInResult {
            user: Some(user),
            error: None,
        }
    }

    /// Open a session for a signed-in user and return its token.
    pub fn start_session(&self, user: User) -> Uuid {
        let token = Uuid::new_v4();
        info!(user_id = %user.id, "Session started");
        self.sessions.insert(token, user);
        token
    }

    pub fn sign_out(&self, token: Uuid) -> bool {
        self.sessions.remove(&token).is_some()
    }

    pub fn session(&self, token: Uuid) -> Option<User> {
        self.sessions.get(&token).map(|entry| entry.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use db::models::user::UserRole;

    use super::*;
    use crate::services::test_store::MemoryStore;

    fn service() -> (Arc<MemoryStore>, AuthService) {
        let store = Arc::new(MemoryStore::default());
        store.seed(
            "users",
            User {
                id: "U-1".to_string(),
                email: "staff@studio.id".to_string(),
                password: "rahasia".to_string(),
                full_name: "Staff".to_string(),
                role: UserRole::Member,
                permissions: vec![ViewType::Projects],
            }
            .to_row(),
        );
        (store.clone(), AuthService::new(store))
    }

    #[tokio::test]
    async fn matching_credentials_return_the_user() {
        let (_, auth) = service();
        let result = auth.sign_in("staff@studio.id", "rahasia").await;
        assert_eq!(result.user.unwrap().id, "U-1");
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn mismatches_return_an_error_string() {
        let (_, auth) = service();

        let wrong = auth.sign_in("staff@studio.id", "salah").await;
        assert!(wrong.user.is_none());
        assert_eq!(wrong.error.as_deref(), Some("Invalid credentials"));

        let unknown = auth.sign_in("nobody@studio.id", "rahasia").await;
        assert!(unknown.user.is_none());
        assert_eq!(unknown.error.as_deref(), Some("User not found"));
    }

    #[tokio::test]
    async fn lookup_failure_is_reported() {
        let (store, auth) = service();
        store.fail_after(0);
        let result = auth.sign_in("staff@studio.id", "rahasia").await;
        assert!(result.user.is_none());
        assert!(!result.error.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sessions_carry_the_user_until_sign_out() {
        let (_, auth) = service();
        let user = auth.sign_in("staff@studio.id", "rahasia").await.user.unwrap();
        let token = auth.start_session(user);

        let user = auth.session(token).unwrap();
        assert!(user.has_permission(ViewType::Projects));
        assert!(user.has_permission(ViewType::Dashboard));
        assert!(!user.has_permission(ViewType::Finance));
        assert!(auth.session(Uuid::new_v4()).is_none());

        assert!(auth.sign_out(token));
        assert!(!auth.sign_out(token));
        assert!(auth.session(token).is_none());
    }
}
