use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::{entity::Entity, row::StorageRow};

/// Rating a freelancer starts with until reviewed
pub const DEFAULT_RATING: f64 = 5.0;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PerformanceNoteType {
    #[default]
    General,
    Praise,
    Concern,
    LateDeadline,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformanceNote {
    pub id: String,
    pub date: String,
    pub note: String,
    #[serde(rename = "type")]
    pub kind: PerformanceNoteType,
}

/// A freelancer working on projects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    pub email: String,
    pub phone: String,
    pub standard_fee: f64,
    pub no_rek: String, // Bank account number
    pub reward_balance: f64,
    pub rating: f64,
    pub performance_notes: Vec<PerformanceNote>,
    pub portal_access_id: String,
}

impl Default for TeamMember {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            role: String::new(),
            email: String::new(),
            phone: String::new(),
            standard_fee: 0.0,
            no_rek: String::new(),
            reward_balance: 0.0,
            rating: DEFAULT_RATING,
            performance_notes: Vec::new(),
            portal_access_id: String::new(),
        }
    }
}

impl Entity for TeamMember {
    const TABLE: &'static str = "team_members";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &StorageRow) -> Self {
        Self {
            id: row.text("id"),
            name: row.text("name"),
            role: row.text("role"),
            email: row.text("email"),
            phone: row.text("phone"),
            standard_fee: row.number("standard_fee"),
            no_rek: row.text("no_rek"),
            reward_balance: row.number("reward_balance"),
            // Only a missing or unreadable rating falls back; 0 is a real score
            rating: row.opt_number("rating").unwrap_or(DEFAULT_RATING),
            performance_notes: row.list("performance_notes"),
            portal_access_id: row.text("portal_access_id"),
        }
    }

    fn to_row(&self) -> StorageRow {
        StorageRow::new()
            .with("id", &self.id)
            .with("name", &self.name)
            .with("role", &self.role)
            .with("email", &self.email)
            .with("phone", &self.phone)
            .with("standard_fee", self.standard_fee)
            .with("no_rek", &self.no_rek)
            .with("reward_balance", self.reward_balance)
            .with("rating", self.rating)
            .with("performance_notes", &self.performance_notes)
            .with("portal_access_id", &self.portal_access_id)
    }
}
