use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{entity::Entity, row::StorageRow};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct SubStatus {
    pub name: String,
    pub note: String,
}

/// A project status column together with its sub-statuses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectStatusConfig {
    pub id: String,
    pub name: String,
    pub color: String,
    pub sub_statuses: Vec<SubStatus>,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub new_project: bool,
    pub payment_confirmation: bool,
    pub deadline_reminder: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            new_project: true,
            payment_confirmation: true,
            deadline_reminder: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct SecuritySettings {
    pub two_factor_enabled: bool,
}

/// Company profile and the configurable lists the screens offer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company_name: String,
    pub website: String,
    pub address: String,
    pub bank_account: String,
    pub authorized_signer: String,
    pub id_number: String,
    pub bio: String,
    pub income_categories: Vec<String>,
    pub expense_categories: Vec<String>,
    pub project_types: Vec<String>,
    pub event_types: Vec<String>,
    pub asset_categories: Vec<String>,
    pub sop_categories: Vec<String>,
    pub project_status_config: Vec<ProjectStatusConfig>,
    pub notification_settings: NotificationSettings,
    pub security_settings: SecuritySettings,
    pub briefing_template: String,
    pub terms_and_conditions: String,
}

/// Partial profile edit; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub bank_account: Option<String>,
    pub authorized_signer: Option<String>,
    pub id_number: Option<String>,
    pub bio: Option<String>,
    pub income_categories: Option<Vec<String>>,
    pub expense_categories: Option<Vec<String>>,
    pub project_types: Option<Vec<String>>,
    pub event_types: Option<Vec<String>>,
    pub asset_categories: Option<Vec<String>>,
    pub sop_categories: Option<Vec<String>>,
    pub project_status_config: Option<Vec<ProjectStatusConfig>>,
    pub notification_settings: Option<NotificationSettings>,
    pub security_settings: Option<SecuritySettings>,
    pub briefing_template: Option<String>,
    pub terms_and_conditions: Option<String>,
}

impl ProfileUpdate {
    /// Storage columns for the fields that are set.
    pub fn to_row(&self) -> StorageRow {
        let mut row = StorageRow::new();
        set_if(&mut row, "full_name", &self.full_name);
        set_if(&mut row, "email", &self.email);
        set_if(&mut row, "phone", &self.phone);
        set_if(&mut row, "company_name", &self.company_name);
        set_if(&mut row, "website", &self.website);
        set_if(&mut row, "address", &self.address);
        set_if(&mut row, "bank_account", &self.bank_account);
        set_if(&mut row, "authorized_signer", &self.authorized_signer);
        set_if(&mut row, "id_number", &self.id_number);
        set_if(&mut row, "bio", &self.bio);
        set_if(&mut row, "income_categories", &self.income_categories);
        set_if(&mut row, "expense_categories", &self.expense_categories);
        set_if(&mut row, "project_types", &self.project_types);
        set_if(&mut row, "event_types", &self.event_types);
        set_if(&mut row, "asset_categories", &self.asset_categories);
        set_if(&mut row, "sop_categories", &self.sop_categories);
        set_if(&mut row, "project_status_config", &self.project_status_config);
        set_if(&mut row, "notification_settings", &self.notification_settings);
        set_if(&mut row, "security_settings", &self.security_settings);
        set_if(&mut row, "briefing_template", &self.briefing_template);
        set_if(&mut row, "terms_and_conditions", &self.terms_and_conditions);
        row
    }
}

fn set_if<T: Serialize>(row: &mut StorageRow, column: &str, value: &Option<T>) {
    if let Some(value) = value {
        row.insert(column, value);
    }
}

impl Entity for Profile {
    const TABLE: &'static str = "user_profiles";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &StorageRow) -> Self {
        Self {
            id: row.text("id"),
            full_name: row.text("full_name"),
            email: row.text("email"),
            phone: row.text("phone"),
            company_name: row.text("company_name"),
            website: row.text("website"),
            address: row.text("address"),
            bank_account: row.text("bank_account"),
            authorized_signer: row.text("authorized_signer"),
            id_number: row.text("id_number"),
            bio: row.text("bio"),
            income_categories: row.list("income_categories"),
            expense_categories: row.list("expense_categories"),
            project_types: row.list("project_types"),
            event_types: row.list("event_types"),
            asset_categories: row.list("asset_categories"),
            sop_categories: row.list("sop_categories"),
            project_status_config: row.list("project_status_config"),
            notification_settings: row.object("notification_settings"),
            security_settings: row.object("security_settings"),
            briefing_template: row.text("briefing_template"),
            terms_and_conditions: row.text("terms_and_conditions"),
        }
    }

    fn to_row(&self) -> StorageRow {
        StorageRow::new()
            .with("id", &self.id)
            .with("full_name", &self.full_name)
            .with("email", &self.email)
            .with("phone", &self.phone)
            .with("company_name", &self.company_name)
            .with("website", &self.website)
            .with("address", &self.address)
            .with("bank_account", &self.bank_account)
            .with("authorized_signer", &self.authorized_signer)
            .with("id_number", &self.id_number)
            .with("bio", &self.bio)
            .with("income_categories", &self.income_categories)
            .with("expense_categories", &self.expense_categories)
            .with("project_types", &self.project_types)
            .with("event_types", &self.event_types)
            .with("asset_categories", &self.asset_categories)
            .with("sop_categories", &self.sop_categories)
            .with("project_status_config", &self.project_status_config)
            .with("notification_settings", &self.notification_settings)
            .with("security_settings", &self.security_settings)
            .with("briefing_template", &self.briefing_template)
            .with("terms_and_conditions", &self.terms_and_conditions)
    }
}
