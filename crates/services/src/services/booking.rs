//! Submissions from the public forms: bookings, leads and feedback.

use chrono::Utc;
use db::{
    models::{
        client::{Client, ClientStatus, ClientType},
        feedback::{ClientFeedback, SatisfactionLevel},
        lead::{ContactChannel, Lead, LeadStatus},
        package::AddOn,
        project::{PaymentStatus, Project},
        promo_code::PromoCode,
        transaction::{Transaction, TransactionType},
    },
    timestamp,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use super::studio::{Studio, StudioError};

/// Status given to a freshly booked project when the profile configures none.
pub const DEFAULT_PROJECT_STATUS: &str = "Pending";
pub const DOWN_PAYMENT_CATEGORY: &str = "DP Proyek";

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingRequest {
    pub client_name: String,
    pub email: String,
    pub phone: String,
    pub instagram: String,
    pub project_type: String,
    pub date: String,
    pub location: String,
    pub package_id: String,
    pub add_on_ids: Vec<String>,
    pub promo_code: Option<String>,
    pub down_payment: f64,
    pub dp_proof_url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct BookingReceipt {
    pub client: Client,
    pub project: Project,
    pub down_payment: Option<Transaction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadSubmission {
    pub name: String,
    pub contact_channel: ContactChannel,
    pub location: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedbackSubmission {
    pub client_name: String,
    pub satisfaction: SatisfactionLevel,
    pub rating: i64,
    pub feedback: String,
}

fn today() -> String {
    Utc::now().date_naive().to_string()
}

fn required(value: &str, field: &str) -> Result<(), StudioError> {
    if value.trim().is_empty() {
        Err(StudioError::Invalid(format!("{field} is required")))
    } else {
        Ok(())
    }
}

impl Studio {
    /// Book a package from the public form: creates the client, the project
    /// and, when something was paid up front, the down-payment income.
    pub async fn book(&self, request: BookingRequest) -> Result<BookingReceipt, StudioError> {
        required(&request.client_name, "Name")?;
        required(&request.package_id, "Package")?;
        if !request.down_payment.is_finite() || request.down_payment < 0.0 {
            return Err(StudioError::Invalid("Down payment must not be negative".to_string()));
        }

        let package = self.packages.get(&request.package_id).await?;
        let mut add_ons: Vec<AddOn> = Vec::with_capacity(request.add_on_ids.len());
        for id in &request.add_on_ids {
            add_ons.push(self.add_ons.get(id).await?);
        }
        let subtotal = package.price + add_ons.iter().map(|a| a.price).sum::<f64>();

        let promo = match request.promo_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => Some(self.redeemable_promo(code).await?),
            _ => None,
        };
        let discount = promo.as_ref().map(|p| p.discount_for(subtotal));
        let total_cost = subtotal - discount.unwrap_or(0.0);

        let profile = self.profile.get().await?;
        let status = profile
            .project_status_config
            .first()
            .map(|s| s.name.clone())
            .unwrap_or_else(|| DEFAULT_PROJECT_STATUS.to_string());

        let client = self
            .clients
            .insert(Client {
                name: request.client_name.clone(),
                email: request.email,
                phone: request.phone,
                instagram: request.instagram,
                since: today(),
                status: ClientStatus::Active,
                client_type: ClientType::Direct,
                last_contact: timestamp(),
                portal_access_id: Uuid::new_v4().to_string(),
                ..Default::default()
            })
            .await?;

        let project = self
            .projects
            .insert(Project {
                project_name: format!("{} ({})", request.client_name, request.project_type),
                client_name: client.name.clone(),
                client_id: client.id.clone(),
                project_type: request.project_type,
                package_name: package.name.clone(),
                package_id: package.id.clone(),
                add_ons,
                date: request.date,
                location: request.location,
                status,
                total_cost,
                amount_paid: request.down_payment,
                payment_status: PaymentStatus::derive(total_cost, request.down_payment),
                notes: request.notes,
                promo_code_id: promo.as_ref().map(|p| p.id.clone()),
                discount_amount: discount,
                dp_proof_url: request.dp_proof_url,
                ..Default::default()
            })
            .await?;

        let down_payment = if request.down_payment > 0.0 {
            let transaction = self
                .transactions
                .insert(Transaction {
                    date: today(),
                    description: format!("DP {}", project.project_name),
                    amount: request.down_payment,
                    kind: TransactionType::Income,
                    project_id: Some(project.id.clone()),
                    category: DOWN_PAYMENT_CATEGORY.to_string(),
                    method: "Transfer Bank".to_string(),
                    ..Default::default()
                })
                .await?;
            Some(transaction)
        } else {
            None
        };

        if let Some(promo) = &promo {
            self.promo_codes
                .modify(&promo.id, |p| p.usage_count += 1)
                .await?;
        }

        info!(
            client_id = %client.id,
            project_id = %project.id,
            total_cost,
            "Booking received"
        );
        Ok(BookingReceipt {
            client,
            project,
            down_payment,
        })
    }

    async fn redeemable_promo(&self, code: &str) -> Result<PromoCode, StudioError> {
        let today = today();
        let promos = match self.promo_codes.snapshot().await {
            cached if !cached.is_empty() => cached,
            _ => self.promo_codes.fetch().await?,
        };
        promos
            .into_iter()
            .find(|p| p.code.eq_ignore_ascii_case(code) && p.is_redeemable(&today))
            .ok_or_else(|| StudioError::Invalid(format!("Promo code {code} is not valid")))
    }

    pub async fn submit_lead(&self, submission: LeadSubmission) -> Result<Lead, StudioError> {
        required(&submission.name, "Name")?;
        let lead = self
            .leads
            .insert(Lead {
                name: submission.name,
                contact_channel: submission.contact_channel,
                location: submission.location,
                status: LeadStatus::Discussion,
                date: today(),
                notes: submission.notes,
                ..Default::default()
            })
            .await?;
        info!(lead_id = %lead.id, "Lead submitted");
        Ok(lead)
    }

    pub async fn submit_feedback(
        &self,
        submission: FeedbackSubmission,
    ) -> Result<ClientFeedback, StudioError> {
        required(&submission.client_name, "Name")?;
        if !(1..=5).contains(&submission.rating) {
            return Err(StudioError::Invalid("Rating must be between 1 and 5".to_string()));
        }
        let feedback = self
            .feedback
            .insert(ClientFeedback {
                client_name: submission.client_name,
                satisfaction: submission.satisfaction,
                rating: submission.rating,
                feedback: submission.feedback,
                date: today(),
                ..Default::default()
            })
            .await?;
        Ok(feedback)
    }
}
