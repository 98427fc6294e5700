use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::{entity::Entity, row::StorageRow};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContactChannel {
    #[default]
    Whatsapp,
    Instagram,
    Website,
    Phone,
    Referral,
    SuggestionForm,
    Other,
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    Discussion,
    FollowUp,
    Converted,
    Rejected,
}

/// A prospect that has not booked yet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub contact_channel: ContactChannel,
    pub location: String,
    pub status: LeadStatus,
    pub date: String,
    pub notes: Option<String>,
}

impl Entity for Lead {
    const TABLE: &'static str = "leads";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &StorageRow) -> Self {
        Self {
            id: row.text("id"),
            name: row.text("name"),
            contact_channel: row.variant("contact_channel"),
            location: row.text("location"),
            status: row.variant("status"),
            date: row.text("date"),
            notes: row.opt_text("notes"),
        }
    }

    fn to_row(&self) -> StorageRow {
        StorageRow::new()
            .with("id", &self.id)
            .with("name", &self.name)
            .with("contact_channel", self.contact_channel.to_string())
            .with("location", &self.location)
            .with("status", self.status.to_string())
            .with("date", &self.date)
            .with("notes", &self.notes)
    }
}
