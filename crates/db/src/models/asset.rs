use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::{entity::Entity, row::StorageRow};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AssetStatus {
    #[default]
    Available,
    InUse,
    Maintenance,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub category: String,
    pub purchase_date: String,
    pub purchase_price: f64,
    pub serial_number: Option<String>,
    pub status: AssetStatus,
    pub notes: Option<String>,
}

impl Entity for Asset {
    const TABLE: &'static str = "assets";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &StorageRow) -> Self {
        Self {
            id: row.text("id"),
            name: row.text("name"),
            category: row.text("category"),
            purchase_date: row.text("purchase_date"),
            purchase_price: row.number("purchase_price"),
            serial_number: row.opt_text("serial_number"),
            status: row.variant("status"),
            notes: row.opt_text("notes"),
        }
    }

    fn to_row(&self) -> StorageRow {
        StorageRow::new()
            .with("id", &self.id)
            .with("name", &self.name)
            .with("category", &self.category)
            .with("purchase_date", &self.purchase_date)
            .with("purchase_price", self.purchase_price)
            .with("serial_number", &self.serial_number)
            .with("status", self.status.to_string())
            .with("notes", &self.notes)
    }
}
