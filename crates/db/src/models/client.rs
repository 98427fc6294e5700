use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::{entity::Entity, row::StorageRow};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ClientStatus {
    #[default]
    Active,
    Inactive,
    Prospect,
    Lost,
}

/// Whether the client books directly or through a vendor
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ClientType {
    #[default]
    Direct,
    Vendor,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub instagram: String,
    pub since: String,
    pub status: ClientStatus,
    pub client_type: ClientType,
    pub last_contact: String,
    pub portal_access_id: String, // Opaque token for the client portal
}

impl Entity for Client {
    const TABLE: &'static str = "clients";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &StorageRow) -> Self {
        Self {
            id: row.text("id"),
            name: row.text("name"),
            email: row.text("email"),
            phone: row.text("phone"),
            instagram: row.text("instagram"),
            since: row.text("since"),
            status: row.variant("status"),
            client_type: row.variant("client_type"),
            last_contact: row.text("last_contact"),
            portal_access_id: row.text("portal_access_id"),
        }
    }

    fn to_row(&self) -> StorageRow {
        StorageRow::new()
            .with("id", &self.id)
            .with("name", &self.name)
            .with("email", &self.email)
            .with("phone", &self.phone)
            .with("instagram", &self.instagram)
            .with("since", &self.since)
            .with("status", self.status.to_string())
            .with("client_type", self.client_type.to_string())
            .with("last_contact", &self.last_contact)
            .with("portal_access_id", &self.portal_access_id)
    }
}
