//! The studio aggregate: one synchronizer per table plus the record-level
//! workflows the screens and portals trigger.

use std::sync::Arc;

use chrono::Utc;
use db::{
    StoreError, TableStore,
    models::{
        asset::Asset,
        card::Card,
        client::Client,
        contract::{Contract, Signer},
        feedback::ClientFeedback,
        lead::Lead,
        notification::{NavigationAction, Notification, NotificationIcon},
        package::{AddOn, Package},
        pocket::FinancialPocket,
        project::{ConfirmationStage, Project, RevisionStatus},
        promo_code::PromoCode,
        social_media::SocialMediaPost,
        sop::Sop,
        team_member::TeamMember,
        transaction::Transaction,
        user::ViewType,
    },
    timestamp,
};
use futures::{FutureExt, future::join_all};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use ts_rs::TS;

use super::{
    portal::PortalError,
    profile::ProfileService,
    sync::{SyncCapabilities, SyncError, SyncReport, TableStatus, TableSynchronizer},
};

#[derive(Debug, Error)]
pub enum StudioError {
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Portal(#[from] PortalError),
    #[error("{what} {id} not found")]
    NotFound { what: &'static str, id: String },
    #[error("{0}")]
    Invalid(String),
}

impl StudioError {
    fn not_found(what: &'static str, id: &str) -> Self {
        Self::NotFound {
            what,
            id: id.to_string(),
        }
    }
}

/// Load state of one cached table.
#[derive(Debug, Clone, Serialize, TS)]
pub struct TableHealth {
    pub table: String,
    pub records: usize,
    #[serde(flatten)]
    pub status: TableStatus,
}

/// Freelancer-submitted progress on one revision.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct RevisionUpdate {
    pub freelancer_id: String,
    #[serde(default)]
    pub freelancer_notes: String,
    #[serde(default)]
    pub drive_link: String,
    pub status: RevisionStatus,
}

pub struct Studio {
    store: Arc<dyn TableStore>,
    pub profile: ProfileService,
    pub clients: TableSynchronizer<Client>,
    pub projects: TableSynchronizer<Project>,
    pub transactions: TableSynchronizer<Transaction>,
    pub team_members: TableSynchronizer<TeamMember>,
    pub packages: TableSynchronizer<Package>,
    pub add_ons: TableSynchronizer<AddOn>,
    pub cards: TableSynchronizer<Card>,
    pub pockets: TableSynchronizer<FinancialPocket>,
    pub leads: TableSynchronizer<Lead>,
    pub assets: TableSynchronizer<Asset>,
    pub contracts: TableSynchronizer<Contract>,
    pub feedback: TableSynchronizer<ClientFeedback>,
    pub social_media_posts: TableSynchronizer<SocialMediaPost>,
    pub promo_codes: TableSynchronizer<PromoCode>,
    pub sops: TableSynchronizer<Sop>,
    pub notifications: TableSynchronizer<Notification>,
}

impl Studio {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self {
            profile: ProfileService::new(store.clone()),
            clients: TableSynchronizer::new(store.clone()),
            projects: TableSynchronizer::new(store.clone()),
            transactions: TableSynchronizer::new(store.clone()),
            team_members: TableSynchronizer::new(store.clone()),
            packages: TableSynchronizer::new(store.clone()),
            add_ons: TableSynchronizer::new(store.clone()),
            cards: TableSynchronizer::new(store.clone()),
            pockets: TableSynchronizer::new(store.clone()),
            leads: TableSynchronizer::new(store.clone()),
            assets: TableSynchronizer::new(store.clone()),
            contracts: TableSynchronizer::new(store.clone()),
            feedback: TableSynchronizer::new(store.clone()),
            social_media_posts: TableSynchronizer::new(store.clone()),
            promo_codes: TableSynchronizer::new(store.clone()),
            sops: TableSynchronizer::new(store.clone()),
            notifications: TableSynchronizer::new(store.clone()),
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn TableStore> {
        &self.store
    }

    /// Fetch every table. Tables that fail keep their error in their status;
    /// the returned count is the number of failures.
    pub async fn load(&self) -> usize {
        let results = join_all([
            self.clients.fetch().map(loaded).boxed(),
            self.projects.fetch().map(loaded).boxed(),
            self.transactions.fetch().map(loaded).boxed(),
            self.team_members.fetch().map(loaded).boxed(),
            self.packages.fetch().map(loaded).boxed(),
            self.add_ons.fetch().map(loaded).boxed(),
            self.cards.fetch().map(loaded).boxed(),
            self.pockets.fetch().map(loaded).boxed(),
            self.leads.fetch().map(loaded).boxed(),
            self.assets.fetch().map(loaded).boxed(),
            self.contracts.fetch().map(loaded).boxed(),
            self.feedback.fetch().map(loaded).boxed(),
            self.social_media_posts.fetch().map(loaded).boxed(),
            self.promo_codes.fetch().map(loaded).boxed(),
            self.sops.fetch().map(loaded).boxed(),
            self.notifications.fetch().map(loaded).boxed(),
        ])
        .await;

        if let Err(e) = self.profile.refetch().await {
            warn!(error = %e, "Failed to load profile");
        }

        let failures = results.iter().filter(|r| r.is_err()).count();
        info!(failures, "Studio tables loaded");
        failures
    }

    pub async fn table_health(&self) -> Vec<TableHealth> {
        let mut health = Vec::new();
        macro_rules! report {
            ($($table:ident),+ $(,)?) => {
                $(health.push(TableHealth {
                    table: self.$table.table().to_string(),
                    records: self.$table.snapshot().await.len(),
                    status: self.$table.status().await,
                });)+
            };
        }
        report!(
            clients,
            projects,
            transactions,
            team_members,
            packages,
            add_ons,
            cards,
            pockets,
            leads,
            assets,
            contracts,
            feedback,
            social_media_posts,
            promo_codes,
            sops,
            notifications,
        );
        health
    }

    /// Record a freelancer's progress on a revision. Completing it stamps
    /// the completion date.
    pub async fn update_revision(
        &self,
        project_id: &str,
        revision_id: &str,
        update: RevisionUpdate,
    ) -> Result<Project, StudioError> {
        let project = self.projects.get(project_id).await?;
        let revision = project
            .revisions
            .iter()
            .find(|r| r.id == revision_id)
            .ok_or_else(|| StudioError::not_found("Revision", revision_id))?;
        if revision.freelancer_id != update.freelancer_id {
            return Err(StudioError::not_found("Revision", revision_id));
        }

        let completed_at = timestamp();
        let project = self
            .projects
            .modify(project_id, |project| {
                if let Some(revision) = project.revisions.iter_mut().find(|r| r.id == revision_id) {
                    revision.freelancer_notes = Some(update.freelancer_notes);
                    revision.drive_link = Some(update.drive_link);
                    if update.status == RevisionStatus::Completed {
                        revision.completed_date = Some(completed_at);
                    }
                    revision.status = update.status;
                }
            })
            .await?;

        info!(project_id, revision_id, "Revision updated");
        Ok(project)
    }

    /// Mark a production stage as confirmed by the client.
    pub async fn confirm_stage(
        &self,
        project_id: &str,
        stage: ConfirmationStage,
    ) -> Result<Project, StudioError> {
        let project = self
            .projects
            .modify(project_id, |project| match stage {
                ConfirmationStage::Editing => project.is_editing_confirmed_by_client = true,
                ConfirmationStage::Printing => project.is_printing_confirmed_by_client = true,
                ConfirmationStage::Delivery => project.is_delivery_confirmed_by_client = true,
            })
            .await?;
        info!(project_id, %stage, "Client confirmed stage");
        Ok(project)
    }

    /// Record the client's confirmation of a sub-status together with their
    /// note, and notify the studio.
    pub async fn confirm_sub_status(
        &self,
        project_id: &str,
        sub_status: &str,
        note: &str,
    ) -> Result<(Project, Notification), StudioError> {
        if sub_status.trim().is_empty() {
            return Err(StudioError::Invalid("Sub-status name is required".to_string()));
        }

        let project = self
            .projects
            .modify(project_id, |project| {
                if !project.confirmed_sub_statuses.iter().any(|s| s == sub_status) {
                    project.confirmed_sub_statuses.push(sub_status.to_string());
                }
                project
                    .client_sub_status_notes
                    .insert(sub_status.to_string(), note.to_string());
            })
            .await?;

        let notification = Notification {
            id: format!("NOTIF-NOTE-{}", Utc::now().timestamp_millis()),
            title: "New client note".to_string(),
            message: format!(
                "Client {} left a note on sub-status \"{}\" of project \"{}\".",
                project.client_name, sub_status, project.project_name
            ),
            timestamp: timestamp(),
            is_read: false,
            icon: NotificationIcon::Comment,
            link_view: Some(ViewType::Projects),
            link_action: Some(NavigationAction::view_project_details(project_id)),
        };
        let notification = self.notifications.insert(notification).await?;

        Ok((project, notification))
    }

    pub async fn sign_contract(
        &self,
        contract_id: &str,
        signature: &str,
        signer: Signer,
    ) -> Result<Contract, StudioError> {
        require_signature(signature)?;
        let contract = self
            .contracts
            .modify(contract_id, |contract| match signer {
                Signer::Vendor => contract.vendor_signature = Some(signature.to_string()),
                Signer::Client => contract.client_signature = Some(signature.to_string()),
            })
            .await?;

        info!(
            contract_id,
            signer = ?signer,
            fully_signed = contract.is_fully_signed(),
            "Contract signed"
        );
        Ok(contract)
    }

    pub async fn sign_invoice(&self, project_id: &str, signature: &str) -> Result<Project, StudioError> {
        require_signature(signature)?;
        let project = self
            .projects
            .modify(project_id, |project| {
                project.invoice_signature = Some(signature.to_string())
            })
            .await?;
        Ok(project)
    }

    pub async fn sign_transaction(
        &self,
        transaction_id: &str,
        signature: &str,
    ) -> Result<Transaction, StudioError> {
        require_signature(signature)?;
        let transaction = self
            .transactions
            .modify(transaction_id, |transaction| {
                transaction.vendor_signature = Some(signature.to_string())
            })
            .await?;
        Ok(transaction)
    }

    pub async fn mark_notification_read(&self, id: &str) -> Result<Notification, StudioError> {
        Ok(self.notifications.modify(id, |n| n.is_read = true).await?)
    }

    /// Mark every cached unread notification as read.
    pub async fn mark_all_notifications_read(&self) -> Result<SyncReport, StudioError> {
        let report = self
            .notifications
            .apply(
                |current| {
                    current
                        .iter()
                        .cloned()
                        .map(|n| Notification { is_read: true, ..n })
                        .collect()
                },
                SyncCapabilities::UPDATE_ONLY,
            )
            .await?;
        Ok(report)
    }
}

fn loaded<T>(result: Result<Vec<T>, SyncError>) -> Result<(), SyncError> {
    result.map(|_| ())
}

fn require_signature(signature: &str) -> Result<(), StudioError> {
    if signature.trim().is_empty() {
        Err(StudioError::Invalid("Signature is required".to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use db::{
        Entity,
        models::project::{AssignedTeamMember, Revision},
    };

    use super::*;
    use crate::services::test_store::MemoryStore;

    pub(crate) fn seeded() -> (Arc<MemoryStore>, Studio) {
        let store = Arc::new(MemoryStore::default());
        store.seed(
            "projects",
            Project {
                id: "PRJ-1".to_string(),
                project_name: "Wedding Andi".to_string(),
                client_name: "Andi".to_string(),
                client_id: "CLI-1".to_string(),
                team: vec![AssignedTeamMember {
                    member_id: "TM-1".to_string(),
                    ..Default::default()
                }],
                revisions: vec![Revision {
                    id: "REV-1".to_string(),
                    freelancer_id: "TM-1".to_string(),
                    ..Default::default()
                }],
                ..Default::default()
            }
            .to_row(),
        );
        store.seed(
            "contracts",
            Contract {
                id: "CTR-1".to_string(),
                client_id: "CLI-1".to_string(),
                project_id: "PRJ-1".to_string(),
                ..Default::default()
            }
            .to_row(),
        );
        store.seed(
            "notifications",
            Notification {
                id: "N-1".to_string(),
                ..Default::default()
            }
            .to_row(),
        );
        store.seed(
            "notifications",
            Notification {
                id: "N-2".to_string(),
                is_read: true,
                ..Default::default()
            }
            .to_row(),
        );
        (store.clone(), Studio::new(store))
    }

    #[tokio::test]
    async fn completing_a_revision_stamps_the_date() {
        let (_, studio) = seeded();
        let project = studio
            .update_revision(
                "PRJ-1",
                "REV-1",
                RevisionUpdate {
                    freelancer_id: "TM-1".to_string(),
                    freelancer_notes: "done".to_string(),
                    drive_link: "https://drive/x".to_string(),
                    status: RevisionStatus::Completed,
                },
            )
            .await
            .unwrap();

        let revision = &project.revisions[0];
        assert_eq!(revision.status, RevisionStatus::Completed);
        assert_eq!(revision.drive_link.as_deref(), Some("https://drive/x"));
        assert!(revision.completed_date.is_some());
    }

    #[tokio::test]
    async fn revision_belongs_to_its_freelancer() {
        let (_, studio) = seeded();
        let result = studio
            .update_revision(
                "PRJ-1",
                "REV-1",
                RevisionUpdate {
                    freelancer_id: "TM-2".to_string(),
                    freelancer_notes: String::new(),
                    drive_link: String::new(),
                    status: RevisionStatus::InProgress,
                },
            )
            .await;
        assert!(matches!(result, Err(StudioError::NotFound { .. })));
    }

    #[tokio::test]
    async fn sub_status_confirmation_notifies() {
        let (store, studio) = seeded();
        studio.load().await;

        let (project, notification) = studio
            .confirm_sub_status("PRJ-1", "Color Grading", "warmer please")
            .await
            .unwrap();

        assert_eq!(project.confirmed_sub_statuses, vec!["Color Grading"]);
        assert_eq!(
            project.client_sub_status_notes.get("Color Grading").map(String::as_str),
            Some("warmer please")
        );
        assert_eq!(
            notification.link_action,
            Some(NavigationAction::view_project_details("PRJ-1"))
        );
        assert!(notification.id.starts_with("NOTIF-NOTE-"));
        assert_eq!(store.rows("notifications").len(), 3);
        assert_eq!(studio.notifications.snapshot().await[0].id, notification.id);
    }

    #[tokio::test]
    async fn stage_confirmation_sets_the_flag() {
        let (_, studio) = seeded();
        let project = studio
            .confirm_stage("PRJ-1", ConfirmationStage::Printing)
            .await
            .unwrap();
        assert!(project.is_printing_confirmed_by_client);
        assert!(!project.is_editing_confirmed_by_client);
    }

    #[tokio::test]
    async fn both_signatures_complete_a_contract() {
        let (_, studio) = seeded();
        let contract = studio
            .sign_contract("CTR-1", "data:image/png;base64,AA", Signer::Vendor)
            .await
            .unwrap();
        assert!(!contract.is_fully_signed());

        let contract = studio
            .sign_contract("CTR-1", "data:image/png;base64,BB", Signer::Client)
            .await
            .unwrap();
        assert!(contract.is_fully_signed());

        assert!(matches!(
            studio.sign_invoice("PRJ-1", " ").await,
            Err(StudioError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn mark_all_read_only_touches_unread() {
        let (store, studio) = seeded();
        studio.notifications.fetch().await.unwrap();

        let report = studio.mark_all_notifications_read().await.unwrap();
        assert_eq!(report.updated, 1);
        assert!(store.rows("notifications").iter().all(|r| r.flag("is_read")));
    }
}
