use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::{entity::Entity, row::StorageRow};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PocketType {
    #[default]
    Saving,
    Locked,
    Shared,
    Expense,
    RewardPool,
}

/// Earmarked money set aside from a card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialPocket {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub kind: PocketType,
    pub amount: f64,
    pub goal_amount: Option<f64>,
    pub lock_end_date: Option<String>,
    pub source_card_id: Option<String>,
}

impl Entity for FinancialPocket {
    const TABLE: &'static str = "financial_pockets";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &StorageRow) -> Self {
        Self {
            id: row.text("id"),
            name: row.text("name"),
            description: row.text("description"),
            icon: row.text("icon"),
            kind: row.variant("type"),
            amount: row.number("amount"),
            goal_amount: row.opt_number("goal_amount"),
            lock_end_date: row.opt_text("lock_end_date"),
            source_card_id: row.opt_text("source_card_id"),
        }
    }

    fn to_row(&self) -> StorageRow {
        StorageRow::new()
            .with("id", &self.id)
            .with("name", &self.name)
            .with("description", &self.description)
            .with("icon", &self.icon)
            .with("type", self.kind.to_string())
            .with("amount", self.amount)
            .with("goal_amount", self.goal_amount)
            .with("lock_end_date", &self.lock_end_date)
            .with("source_card_id", &self.source_card_id)
    }
}
