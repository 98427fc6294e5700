use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::{entity::Entity, row::StorageRow};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransactionType {
    #[default]
    Income,
    Expense,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct Transaction {
    pub id: String,
    pub date: String,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub project_id: Option<String>,
    pub category: String,
    pub method: String,
    pub pocket_id: Option<String>,
    pub card_id: Option<String>,
    pub printing_item_id: Option<String>,
    pub vendor_signature: Option<String>,
}

impl Entity for Transaction {
    const TABLE: &'static str = "transactions";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &StorageRow) -> Self {
        Self {
            id: row.text("id"),
            date: row.text("date"),
            description: row.text("description"),
            amount: row.number("amount"),
            kind: row.variant("type"),
            project_id: row.opt_text("project_id"),
            category: row.text("category"),
            method: row.text("method"),
            pocket_id: row.opt_text("pocket_id"),
            card_id: row.opt_text("card_id"),
            printing_item_id: row.opt_text("printing_item_id"),
            vendor_signature: row.opt_text("vendor_signature"),
        }
    }

    fn to_row(&self) -> StorageRow {
        StorageRow::new()
            .with("id", &self.id)
            .with("date", &self.date)
            .with("description", &self.description)
            .with("amount", self.amount)
            .with("type", self.kind.to_string())
            .with("project_id", &self.project_id)
            .with("category", &self.category)
            .with("method", &self.method)
            .with("pocket_id", &self.pocket_id)
            .with("card_id", &self.card_id)
            .with("printing_item_id", &self.printing_item_id)
            .with("vendor_signature", &self.vendor_signature)
    }
}
