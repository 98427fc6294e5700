//! Read models for the unauthenticated pages: client portal, freelancer
//! portal and the public booking form. Portals are addressed by an opaque
//! access id and only see records that belong to it.

use db::{
    Entity, Query, StoreError,
    models::{
        client::Client,
        contract::{Contract, Signer},
        notification::Notification,
        package::{AddOn, Package},
        profile::Profile,
        project::{ConfirmationStage, Project},
        promo_code::PromoCode,
        sop::Sop,
        team_member::TeamMember,
        transaction::Transaction,
    },
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;
use ts_rs::TS;

use super::studio::{Studio, StudioError};

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("Portal not found")]
    UnknownAccessId,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct ClientPortal {
    pub client: Client,
    pub projects: Vec<Project>,
    pub contracts: Vec<Contract>,
    pub transactions: Vec<Transaction>,
    pub packages: Vec<Package>,
    pub profile: Profile,
    /// Sum of what is still owed across the client's projects
    pub outstanding_balance: f64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct FreelancerPortal {
    pub freelancer: TeamMember,
    pub projects: Vec<Project>,
    pub sops: Vec<Sop>,
    pub profile: Profile,
}

/// What the public booking and lead forms need to render.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct PublicData {
    pub packages: Vec<Package>,
    pub add_ons: Vec<AddOn>,
    pub promo_codes: Vec<PromoCode>,
    pub profile: Profile,
}

impl Studio {
    async fn select_all<E: Entity>(&self, query: Query) -> Result<Vec<E>, StoreError> {
        let rows = self.store().select(E::TABLE, &query).await?;
        Ok(rows.iter().map(E::from_row).collect())
    }

    async fn by_access_id<E: Entity>(&self, access_id: &str) -> Result<E, PortalError> {
        if access_id.trim().is_empty() {
            return Err(PortalError::UnknownAccessId);
        }
        let row = self
            .store()
            .select_single(E::TABLE, &Query::new().eq("portal_access_id", access_id))
            .await?
            .ok_or(PortalError::UnknownAccessId)?;
        Ok(E::from_row(&row))
    }

    pub async fn portal_client(&self, access_id: &str) -> Result<Client, PortalError> {
        self.by_access_id(access_id).await
    }

    pub async fn client_portal(&self, access_id: &str) -> Result<ClientPortal, PortalError> {
        let client: Client = self.by_access_id(access_id).await?;
        debug!(client_id = %client.id, "Client portal opened");

        let projects: Vec<Project> = self
            .select_all(Query::new().eq("client_id", client.id.as_str()).newest_first())
            .await?;
        let contracts: Vec<Contract> = self
            .select_all(Query::new().eq("client_id", client.id.as_str()).newest_first())
            .await?;
        let transactions = self
            .select_all::<Transaction>(Query::new().newest_first())
            .await?
            .into_iter()
            .filter(|t| {
                t.project_id
                    .as_deref()
                    .is_some_and(|id| projects.iter().any(|p| p.id == id))
            })
            .collect();
        let packages: Vec<Package> = self.select_all(Query::new().newest_first()).await?;
        let profile = self.profile.get().await?;

        let outstanding_balance = projects.iter().map(Project::remaining_balance).sum();
        Ok(ClientPortal {
            client,
            projects,
            contracts,
            transactions,
            packages,
            profile,
            outstanding_balance,
        })
    }

    pub async fn freelancer_portal(&self, access_id: &str) -> Result<FreelancerPortal, PortalError> {
        let freelancer: TeamMember = self.by_access_id(access_id).await?;
        debug!(member_id = %freelancer.id, "Freelancer portal opened");

        let projects: Vec<Project> = self
            .select_all(
                Query::new()
                    .contains("team", json!([{ "memberId": &freelancer.id }]))
                    .newest_first(),
            )
            .await?;
        let sops: Vec<Sop> = self.select_all(Query::new().newest_first()).await?;
        let profile = self.profile.get().await?;

        Ok(FreelancerPortal {
            freelancer,
            projects,
            sops,
            profile,
        })
    }

    pub async fn public_data(&self) -> Result<PublicData, StoreError> {
        Ok(PublicData {
            packages: self.select_all(Query::new().newest_first()).await?,
            add_ons: self.select_all(Query::new().newest_first()).await?,
            promo_codes: self
                .select_all(Query::new().eq("is_active", true).newest_first())
                .await?,
            profile: self.profile.get().await?,
        })
    }

    /// The client's own project, or not-found.
    async fn portal_project(&self, access_id: &str, project_id: &str) -> Result<Project, StudioError> {
        let client = self.portal_client(access_id).await?;
        let project = self.projects.get(project_id).await?;
        if project.client_id != client.id {
            return Err(StudioError::NotFound {
                what: "Project",
                id: project_id.to_string(),
            });
        }
        Ok(project)
    }

    pub async fn portal_confirm_stage(
        &self,
        access_id: &str,
        project_id: &str,
        stage: ConfirmationStage,
    ) -> Result<Project, StudioError> {
        self.portal_project(access_id, project_id).await?;
        self.confirm_stage(project_id, stage).await
    }

    pub async fn portal_confirm_sub_status(
        &self,
        access_id: &str,
        project_id: &str,
        sub_status: &str,
        note: &str,
    ) -> Result<(Project, Notification), StudioError> {
        self.portal_project(access_id, project_id).await?;
        self.confirm_sub_status(project_id, sub_status, note).await
    }

    pub async fn portal_sign_contract(
        &self,
        access_id: &str,
        contract_id: &str,
        signature: &str,
    ) -> Result<Contract, StudioError> {
        let client = self.portal_client(access_id).await?;
        let contract = self.contracts.get(contract_id).await?;
        if contract.client_id != client.id {
            return Err(StudioError::NotFound {
                what: "Contract",
                id: contract_id.to_string(),
            });
        }
        self.sign_contract(contract_id, signature, Signer::Client).await
    }
}
