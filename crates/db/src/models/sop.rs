use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{entity::Entity, row::StorageRow};

/// Standard operating procedure shared with freelancers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct Sop {
    pub id: String,
    pub title: String,
    pub category: String,
    pub content: String,
    pub last_updated: String,
}

impl Entity for Sop {
    const TABLE: &'static str = "sops";
    const READ_ONLY: &'static [&'static str] = &["updated_at"];

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &StorageRow) -> Self {
        Self {
            id: row.text("id"),
            title: row.text("title"),
            category: row.text("category"),
            content: row.text("content"),
            last_updated: row.text("updated_at"),
        }
    }

    fn to_row(&self) -> StorageRow {
        StorageRow::new()
            .with("id", &self.id)
            .with("title", &self.title)
            .with("category", &self.category)
            .with("content", &self.content)
            .with("updated_at", &self.last_updated)
    }
}
