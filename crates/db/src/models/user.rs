use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::{entity::Entity, row::StorageRow};

/// Screens of the application; user permissions are expressed per view.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    TS,
    EnumString,
    Display,
    Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViewType {
    #[default]
    Dashboard,
    Leads,
    Clients,
    Projects,
    Team,
    Finance,
    Calendar,
    Reports,
    Packages,
    Assets,
    Contracts,
    ClientFeedback,
    SocialMedia,
    PromoCodes,
    Sops,
    Settings,
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UserRole {
    Admin,
    #[default]
    Member,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    #[ts(skip)]
    pub password: String,
    pub full_name: String,
    pub role: UserRole,
    pub permissions: Vec<ViewType>,
}

impl User {
    /// Admins see everything and the dashboard is open to every user.
    pub fn has_permission(&self, view: ViewType) -> bool {
        self.role == UserRole::Admin
            || view == ViewType::Dashboard
            || self.permissions.contains(&view)
    }
}

impl Entity for User {
    const TABLE: &'static str = "users";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &StorageRow) -> Self {
        Self {
            id: row.text("id"),
            email: row.text("email"),
            password: row.text("password"),
            full_name: row.text("full_name"),
            role: row.variant("role"),
            permissions: row.list("permissions"),
        }
    }

    fn to_row(&self) -> StorageRow {
        StorageRow::new()
            .with("id", &self.id)
            .with("email", &self.email)
            .with("password", &self.password)
            .with("full_name", &self.full_name)
            .with("role", self.role.to_string())
            .with("permissions", &self.permissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permissions_by_role() {
        let admin = User {
            role: UserRole::Admin,
            ..Default::default()
        };
        assert!(admin.has_permission(ViewType::Finance));

        let member = User {
            permissions: vec![ViewType::Projects],
            ..Default::default()
        };
        assert!(member.has_permission(ViewType::Dashboard));
        assert!(member.has_permission(ViewType::Projects));
        assert!(!member.has_permission(ViewType::Finance));
    }

    #[test]
    fn password_is_not_serialized() {
        let user = User {
            email: "a@b.c".to_string(),
            password: "secret".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "a@b.c");
    }
}
