use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use super::user::ViewType;
use crate::{entity::Entity, row::StorageRow};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationIcon {
    Lead,
    Deadline,
    Revision,
    Feedback,
    Payment,
    Completed,
    #[default]
    Comment,
}

/// Where the UI should navigate when a notification is opened
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationAction {
    #[serde(rename = "type")]
    pub action_type: String,
    pub id: Option<String>,
}

impl NavigationAction {
    pub fn view_project_details(project_id: impl Into<String>) -> Self {
        Self {
            action_type: "VIEW_PROJECT_DETAILS".to_string(),
            id: Some(project_id.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub timestamp: String,
    pub is_read: bool,
    pub icon: NotificationIcon,
    pub link_view: Option<ViewType>,
    pub link_action: Option<NavigationAction>,
}

impl Entity for Notification {
    const TABLE: &'static str = "notifications";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &StorageRow) -> Self {
        Self {
            id: row.text("id"),
            title: row.text("title"),
            message: row.text("message"),
            timestamp: row.text("timestamp"),
            is_read: row.flag("is_read"),
            icon: row.variant("icon"),
            link_view: row.opt_variant("link_view"),
            link_action: row.object("link_action"),
        }
    }

    fn to_row(&self) -> StorageRow {
        StorageRow::new()
            .with("id", &self.id)
            .with("title", &self.title)
            .with("message", &self.message)
            .with("timestamp", &self.timestamp)
            .with("is_read", self.is_read)
            .with("icon", self.icon.to_string())
            .with("link_view", self.link_view.map(|view| view.to_string()))
            .with("link_action", &self.link_action)
    }
}
