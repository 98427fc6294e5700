use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::{entity::Entity, row::StorageRow};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PostType {
    #[default]
    InstagramFeed,
    InstagramStory,
    InstagramReels,
    Tiktok,
    Blog,
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PostStatus {
    #[default]
    Draft,
    Scheduled,
    Posted,
    Canceled,
}

/// A planned social media post promoting a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialMediaPost {
    pub id: String,
    pub project_id: String,
    pub client_name: String,
    pub post_type: PostType,
    pub platform: String,
    pub scheduled_date: String,
    pub caption: String,
    pub media_url: Option<String>,
    pub status: PostStatus,
    pub notes: Option<String>,
}

impl Entity for SocialMediaPost {
    const TABLE: &'static str = "social_media_posts";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &StorageRow) -> Self {
        Self {
            id: row.text("id"),
            project_id: row.text("project_id"),
            client_name: row.text("client_name"),
            post_type: row.variant("post_type"),
            platform: row.text("platform"),
            scheduled_date: row.text("scheduled_date"),
            caption: row.text("caption"),
            media_url: row.opt_text("media_url"),
            status: row.variant("status"),
            notes: row.opt_text("notes"),
        }
    }

    fn to_row(&self) -> StorageRow {
        StorageRow::new()
            .with("id", &self.id)
            .with("project_id", &self.project_id)
            .with("client_name", &self.client_name)
            .with("post_type", self.post_type.to_string())
            .with("platform", &self.platform)
            .with("scheduled_date", &self.scheduled_date)
            .with("caption", &self.caption)
            .with("media_url", &self.media_url)
            .with("status", self.status.to_string())
            .with("notes", &self.notes)
    }
}
