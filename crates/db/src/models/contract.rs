use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{entity::Entity, row::StorageRow};

/// Which party is signing a contract
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
pub enum Signer {
    Vendor,
    Client,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct Contract {
    pub id: String,
    pub contract_number: String,
    pub client_id: String,
    pub project_id: String,
    pub signing_date: String,
    pub signing_location: String,
    pub client_name1: String,
    pub client_address1: String,
    pub client_phone1: String,
    pub client_name2: String,
    pub client_address2: String,
    pub client_phone2: String,
    pub shooting_duration: String,
    pub guaranteed_photos: String,
    pub album_details: String,
    pub digital_files_format: String,
    pub other_items: String,
    pub personnel_count: String,
    pub delivery_timeframe: String,
    pub dp_date: String,
    pub final_payment_date: String,
    pub cancellation_policy: String,
    pub jurisdiction: String,
    pub created_at: String,
    pub vendor_signature: Option<String>,
    pub client_signature: Option<String>,
}

impl Contract {
    pub fn is_fully_signed(&self) -> bool {
        self.vendor_signature.is_some() && self.client_signature.is_some()
    }
}

impl Entity for Contract {
    const TABLE: &'static str = "contracts";
    const READ_ONLY: &'static [&'static str] = &["created_at"];

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &StorageRow) -> Self {
        Self {
            id: row.text("id"),
            contract_number: row.text("contract_number"),
            client_id: row.text("client_id"),
            project_id: row.text("project_id"),
            signing_date: row.text("signing_date"),
            signing_location: row.text("signing_location"),
            client_name1: row.text("client_name1"),
            client_address1: row.text("client_address1"),
            client_phone1: row.text("client_phone1"),
            client_name2: row.text("client_name2"),
            client_address2: row.text("client_address2"),
            client_phone2: row.text("client_phone2"),
            shooting_duration: row.text("shooting_duration"),
            guaranteed_photos: row.text("guaranteed_photos"),
            album_details: row.text("album_details"),
            digital_files_format: row.text("digital_files_format"),
            other_items: row.text("other_items"),
            personnel_count: row.text("personnel_count"),
            delivery_timeframe: row.text("delivery_timeframe"),
            dp_date: row.text("dp_date"),
            final_payment_date: row.text("final_payment_date"),
            cancellation_policy: row.text("cancellation_policy"),
            jurisdiction: row.text("jurisdiction"),
            created_at: row.text("created_at"),
            vendor_signature: row.opt_text("vendor_signature"),
            client_signature: row.opt_text("client_signature"),
        }
    }

    fn to_row(&self) -> StorageRow {
        StorageRow::new()
            .with("id", &self.id)
            .with("contract_number", &self.contract_number)
            .with("client_id", &self.client_id)
            .with("project_id", &self.project_id)
            .with("signing_date", &self.signing_date)
            .with("signing_location", &self.signing_location)
            .with("client_name1", &self.client_name1)
            .with("client_address1", &self.client_address1)
            .with("client_phone1", &self.client_phone1)
            .with("client_name2", &self.client_name2)
            .with("client_address2", &self.client_address2)
            .with("client_phone2", &self.client_phone2)
            .with("shooting_duration", &self.shooting_duration)
            .with("guaranteed_photos", &self.guaranteed_photos)
            .with("album_details", &self.album_details)
            .with("digital_files_format", &self.digital_files_format)
            .with("other_items", &self.other_items)
            .with("personnel_count", &self.personnel_count)
            .with("delivery_timeframe", &self.delivery_timeframe)
            .with("dp_date", &self.dp_date)
            .with("final_payment_date", &self.final_payment_date)
            .with("cancellation_policy", &self.cancellation_policy)
            .with("jurisdiction", &self.jurisdiction)
            .with("created_at", &self.created_at)
            .with("vendor_signature", &self.vendor_signature)
            .with("client_signature", &self.client_signature)
    }
}
