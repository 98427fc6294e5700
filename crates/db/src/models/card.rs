use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::{entity::Entity, row::StorageRow};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CardType {
    #[default]
    Debit,
    Credit,
    Prepaid,
    Cash,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct Card {
    pub id: String,
    pub card_holder_name: String,
    pub bank_name: String,
    pub card_type: CardType,
    pub last_four_digits: String,
    pub expiry_date: Option<String>,
    pub balance: f64,
    pub color_gradient: String,
}

impl Entity for Card {
    const TABLE: &'static str = "cards";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &StorageRow) -> Self {
        Self {
            id: row.text("id"),
            card_holder_name: row.text("card_holder_name"),
            bank_name: row.text("bank_name"),
            card_type: row.variant("card_type"),
            last_four_digits: row.text("last_four_digits"),
            expiry_date: row.opt_text("expiry_date"),
            balance: row.number("balance"),
            color_gradient: row.text("color_gradient"),
        }
    }

    fn to_row(&self) -> StorageRow {
        StorageRow::new()
            .with("id", &self.id)
            .with("card_holder_name", &self.card_holder_name)
            .with("bank_name", &self.bank_name)
            .with("card_type", self.card_type.to_string())
            .with("last_four_digits", &self.last_four_digits)
            .with("expiry_date", &self.expiry_date)
            .with("balance", self.balance)
            .with("color_gradient", &self.color_gradient)
    }
}
