use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use super::package::AddOn;
use crate::{entity::Entity, row::StorageRow};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    DownPayment,
    Paid,
}

impl PaymentStatus {
    /// Payment status implied by the amount paid against the total cost.
    pub fn derive(total_cost: f64, amount_paid: f64) -> Self {
        if amount_paid <= 0.0 {
            Self::Unpaid
        } else if amount_paid >= total_cost {
            Self::Paid
        } else {
            Self::DownPayment
        }
    }
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RevisionStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// Production stage a client can sign off from the portal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConfirmationStage {
    Editing,
    Printing,
    Delivery,
}

/// Freelancer assigned to a project, stored inside the project's `team` column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct AssignedTeamMember {
    pub member_id: String,
    pub name: String,
    pub role: String,
    pub fee: f64,
    pub reward: Option<f64>,
    pub sub_job: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct Revision {
    pub id: String,
    pub date: String,
    pub admin_notes: String,
    pub deadline: String,
    pub freelancer_id: String,
    pub status: RevisionStatus,
    pub freelancer_notes: Option<String>,
    pub drive_link: Option<String>,
    pub completed_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct PrintingItem {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub custom_name: Option<String>,
    pub details: String,
    pub cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: String,
    pub project_name: String,
    pub client_name: String,
    pub client_id: String,
    pub project_type: String,
    pub package_name: String,
    pub package_id: String,
    pub add_ons: Vec<AddOn>,
    pub date: String,
    pub deadline_date: Option<String>,
    pub location: String,
    pub progress: i64,
    pub status: String, // One of the profile's configured project statuses
    pub active_sub_statuses: Vec<String>,
    pub total_cost: f64,
    pub amount_paid: f64,
    pub payment_status: PaymentStatus,
    pub team: Vec<AssignedTeamMember>,
    pub notes: Option<String>,
    pub accommodation: Option<String>,
    pub drive_link: Option<String>,
    pub client_drive_link: Option<String>,
    pub final_drive_link: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub image: Option<String>,
    pub revisions: Vec<Revision>,
    pub promo_code_id: Option<String>,
    pub discount_amount: Option<f64>,
    pub shipping_details: Option<String>,
    pub dp_proof_url: Option<String>,
    pub printing_details: Vec<PrintingItem>,
    pub printing_cost: f64,
    pub transport_cost: f64,
    pub is_editing_confirmed_by_client: bool,
    pub is_printing_confirmed_by_client: bool,
    pub is_delivery_confirmed_by_client: bool,
    pub confirmed_sub_statuses: Vec<String>,
    pub client_sub_status_notes: BTreeMap<String, String>,
    pub sub_status_confirmation_sent_at: BTreeMap<String, String>,
    pub completed_digital_items: Vec<String>,
    pub invoice_signature: Option<String>,
}

impl Project {
    pub fn has_team_member(&self, member_id: &str) -> bool {
        self.team.iter().any(|m| m.member_id == member_id)
    }

    pub fn remaining_balance(&self) -> f64 {
        (self.total_cost - self.amount_paid).max(0.0)
    }
}

impl Entity for Project {
    const TABLE: &'static str = "projects";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &StorageRow) -> Self {
        Self {
            id: row.text("id"),
            project_name: row.text("project_name"),
            client_name: row.text("client_name"),
            client_id: row.text("client_id"),
            project_type: row.text("project_type"),
            package_name: row.text("package_name"),
            package_id: row.text("package_id"),
            add_ons: row.list("add_ons"),
            date: row.text("date"),
            deadline_date: row.opt_text("deadline_date"),
            location: row.text("location"),
            progress: row.integer("progress"),
            status: row.text("status"),
            active_sub_statuses: row.list("active_sub_statuses"),
            total_cost: row.number("total_cost"),
            amount_paid: row.number("amount_paid"),
            payment_status: row.variant("payment_status"),
            team: row.list("team"),
            notes: row.opt_text("notes"),
            accommodation: row.opt_text("accommodation"),
            drive_link: row.opt_text("drive_link"),
            client_drive_link: row.opt_text("client_drive_link"),
            final_drive_link: row.opt_text("final_drive_link"),
            start_time: row.opt_text("start_time"),
            end_time: row.opt_text("end_time"),
            image: row.opt_text("image"),
            revisions: row.list("revisions"),
            promo_code_id: row.opt_text("promo_code_id"),
            discount_amount: row.opt_number("discount_amount"),
            shipping_details: row.opt_text("shipping_details"),
            dp_proof_url: row.opt_text("dp_proof_url"),
            printing_details: row.list("printing_details"),
            printing_cost: row.number("printing_cost"),
            transport_cost: row.number("transport_cost"),
            is_editing_confirmed_by_client: row.flag("is_editing_confirmed_by_client"),
            is_printing_confirmed_by_client: row.flag("is_printing_confirmed_by_client"),
            is_delivery_confirmed_by_client: row.flag("is_delivery_confirmed_by_client"),
            confirmed_sub_statuses: row.list("confirmed_sub_statuses"),
            client_sub_status_notes: row.object("client_sub_status_notes"),
            sub_status_confirmation_sent_at: row.object("sub_status_confirmation_sent_at"),
            completed_digital_items: row.list("completed_digital_items"),
            invoice_signature: row.opt_text("invoice_signature"),
        }
    }

    fn to_row(&self) -> StorageRow {
        StorageRow::new()
            .with("id", &self.id)
            .with("project_name", &self.project_name)
            .with("client_name", &self.client_name)
            .with("client_id", &self.client_id)
            .with("project_type", &self.project_type)
            .with("package_name", &self.package_name)
            .with("package_id", &self.package_id)
            .with("add_ons", &self.add_ons)
            .with("date", &self.date)
            .with("deadline_date", &self.deadline_date)
            .with("location", &self.location)
            .with("progress", self.progress)
            .with("status", &self.status)
            .with("active_sub_statuses", &self.active_sub_statuses)
            .with("total_cost", self.total_cost)
            .with("amount_paid", self.amount_paid)
            .with("payment_status", self.payment_status.to_string())
            .with("team", &self.team)
            .with("notes", &self.notes)
            .with("accommodation", &self.accommodation)
            .with("drive_link", &self.drive_link)
            .with("client_drive_link", &self.client_drive_link)
            .with("final_drive_link", &self.final_drive_link)
            .with("start_time", &self.start_time)
            .with("end_time", &self.end_time)
            .with("image", &self.image)
            .with("revisions", &self.revisions)
            .with("promo_code_id", &self.promo_code_id)
            .with("discount_amount", self.discount_amount)
            .with("shipping_details", &self.shipping_details)
            .with("dp_proof_url", &self.dp_proof_url)
            .with("printing_details", &self.printing_details)
            .with("printing_cost", self.printing_cost)
            .with("transport_cost", self.transport_cost)
            .with("is_editing_confirmed_by_client", self.is_editing_confirmed_by_client)
            .with("is_printing_confirmed_by_client", self.is_printing_confirmed_by_client)
            .with("is_delivery_confirmed_by_client", self.is_delivery_confirmed_by_client)
            .with("confirmed_sub_statuses", &self.confirmed_sub_statuses)
            .with("client_sub_status_notes", &self.client_sub_status_notes)
            .with("sub_status_confirmation_sent_at", &self.sub_status_confirmation_sent_at)
            .with("completed_digital_items", &self.completed_digital_items)
            .with("invoice_signature", &self.invoice_signature)
    }
}
