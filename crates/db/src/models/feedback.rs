use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::{entity::Entity, row::StorageRow};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SatisfactionLevel {
    VerySatisfied,
    #[default]
    Satisfied,
    Neutral,
    Unsatisfied,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientFeedback {
    pub id: String,
    pub client_name: String,
    pub satisfaction: SatisfactionLevel,
    pub rating: i64, // 1..=5 stars
    pub feedback: String,
    pub date: String,
}

impl Entity for ClientFeedback {
    const TABLE: &'static str = "client_feedback";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &StorageRow) -> Self {
        Self {
            id: row.text("id"),
            client_name: row.text("client_name"),
            satisfaction: row.variant("satisfaction"),
            rating: row.integer("rating"),
            feedback: row.text("feedback"),
            date: row.text("date"),
        }
    }

    fn to_row(&self) -> StorageRow {
        StorageRow::new()
            .with("id", &self.id)
            .with("client_name", &self.client_name)
            .with("satisfaction", self.satisfaction.to_string())
            .with("rating", self.rating)
            .with("feedback", &self.feedback)
            .with("date", &self.date)
    }
}
