use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{entity::Entity, row::StorageRow};

pub const DEFAULT_PROCESSING_TIME: &str = "30 hari kerja";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct PhysicalItem {
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct Package {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub physical_items: Vec<PhysicalItem>,
    pub digital_items: Vec<String>,
    pub processing_time: String,
    pub photographers: String,
    pub videographers: String,
}

impl Default for Package {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            price: 0.0,
            description: String::new(),
            physical_items: Vec::new(),
            digital_items: Vec::new(),
            processing_time: DEFAULT_PROCESSING_TIME.to_string(),
            photographers: String::new(),
            videographers: String::new(),
        }
    }
}

impl Entity for Package {
    const TABLE: &'static str = "packages";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &StorageRow) -> Self {
        Self {
            id: row.text("id"),
            name: row.text("name"),
            price: row.number("price"),
            description: row.text("description"),
            physical_items: row.list("physical_items"),
            digital_items: row.list("digital_items"),
            processing_time: row
                .opt_text("processing_time")
                .unwrap_or_else(|| DEFAULT_PROCESSING_TIME.to_string()),
            photographers: row.text("photographers"),
            videographers: row.text("videographers"),
        }
    }

    fn to_row(&self) -> StorageRow {
        StorageRow::new()
            .with("id", &self.id)
            .with("name", &self.name)
            .with("price", self.price)
            .with("description", &self.description)
            .with("physical_items", &self.physical_items)
            .with("digital_items", &self.digital_items)
            .with("processing_time", &self.processing_time)
            .with("photographers", &self.photographers)
            .with("videographers", &self.videographers)
    }
}

/// Optional extra sold on top of a package
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct AddOn {
    pub id: String,
    pub name: String,
    pub price: f64,
}

impl Entity for AddOn {
    const TABLE: &'static str = "add_ons";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &StorageRow) -> Self {
        Self {
            id: row.text("id"),
            name: row.text("name"),
            price: row.number("price"),
        }
    }

    fn to_row(&self) -> StorageRow {
        StorageRow::new()
            .with("id", &self.id)
            .with("name", &self.name)
            .with("price", self.price)
    }
}
