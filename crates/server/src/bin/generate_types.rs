//! Writes the TypeScript declarations for every API type to
//! `shared/types.ts`. With `--check`, fails instead when the file is stale.

use std::{env, fs, path::Path, process::ExitCode};

use db::models::{
    asset::{Asset, AssetStatus},
    card::{Card, CardType},
    client::{Client, ClientStatus, ClientType},
    contract::{Contract, Signer},
    feedback::{ClientFeedback, SatisfactionLevel},
    lead::{ContactChannel, Lead, LeadStatus},
    notification::{NavigationAction, Notification, NotificationIcon},
    package::{AddOn, Package, PhysicalItem},
    pocket::{FinancialPocket, PocketType},
    profile::{
        NotificationSettings, Profile, ProfileUpdate, ProjectStatusConfig, SecuritySettings,
        SubStatus,
    },
    project::{
        AssignedTeamMember, ConfirmationStage, PaymentStatus, PrintingItem, Project, Revision,
        RevisionStatus,
    },
    promo_code::{DiscountType, PromoCode},
    social_media::{PostStatus, PostType, SocialMediaPost},
    sop::Sop,
    team_member::{PerformanceNote, PerformanceNoteType, TeamMember},
    transaction::{Transaction, TransactionType},
    user::{User, UserRole, ViewType},
};
use server::routes::{
    auth::{SignInRequest, SignInResponse},
    portal::{ConfirmStageRequest, SignatureRequest, SubStatusConfirmed, SubStatusRequest},
};
use services::services::{
    booking::{BookingReceipt, BookingRequest, FeedbackSubmission, LeadSubmission},
    portal::{ClientPortal, FreelancerPortal, PublicData},
    studio::{RevisionUpdate, TableHealth},
    sync::{SyncCapabilities, SyncReport, TableStatus},
};
use ts_rs::TS;

fn generate_types_content() -> String {
    let decls = [
        ViewType::decl(),
        UserRole::decl(),
        User::decl(),
        SubStatus::decl(),
        ProjectStatusConfig::decl(),
        NotificationSettings::decl(),
        SecuritySettings::decl(),
        Profile::decl(),
        ProfileUpdate::decl(),
        ClientStatus::decl(),
        ClientType::decl(),
        Client::decl(),
        PaymentStatus::decl(),
        RevisionStatus::decl(),
        ConfirmationStage::decl(),
        AssignedTeamMember::decl(),
        Revision::decl(),
        PrintingItem::decl(),
        Project::decl(),
        TransactionType::decl(),
        Transaction::decl(),
        PerformanceNoteType::decl(),
        PerformanceNote::decl(),
        TeamMember::decl(),
        PhysicalItem::decl(),
        Package::decl(),
        AddOn::decl(),
        CardType::decl(),
        Card::decl(),
        PocketType::decl(),
        FinancialPocket::decl(),
        ContactChannel::decl(),
        LeadStatus::decl(),
        Lead::decl(),
        AssetStatus::decl(),
        Asset::decl(),
        Signer::decl(),
        Contract::decl(),
        SatisfactionLevel::decl(),
        ClientFeedback::decl(),
        PostType::decl(),
        PostStatus::decl(),
        SocialMediaPost::decl(),
        DiscountType::decl(),
        PromoCode::decl(),
        Sop::decl(),
        NotificationIcon::decl(),
        NavigationAction::decl(),
        Notification::decl(),
        SyncCapabilities::decl(),
        SyncReport::decl(),
        TableStatus::decl(),
        TableHealth::decl(),
        RevisionUpdate::decl(),
        BookingRequest::decl(),
        BookingReceipt::decl(),
        LeadSubmission::decl(),
        FeedbackSubmission::decl(),
        ClientPortal::decl(),
        FreelancerPortal::decl(),
        PublicData::decl(),
        SignInRequest::decl(),
        SignInResponse::decl(),
        ConfirmStageRequest::decl(),
        SubStatusRequest::decl(),
        SubStatusConfirmed::decl(),
        SignatureRequest::decl(),
    ];

    let body = decls
        .into_iter()
        .map(|d| {
            let trimmed = d.trim_start();
            if trimmed.starts_with("export") {
                trimmed.to_string()
            } else {
                format!("export {trimmed}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("// This file was generated by `generate_types`. Do not edit it by hand.\n\n{body}\n")
}

fn main() -> ExitCode {
    let check = env::args().any(|arg| arg == "--check");
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../shared/types.ts");
    let content = generate_types_content();

    if check {
        return match fs::read_to_string(&path) {
            Ok(current) if current == content => {
                println!("shared/types.ts is up to date");
                ExitCode::SUCCESS
            }
            _ => {
                eprintln!("shared/types.ts is out of date; run generate_types to refresh it");
                ExitCode::FAILURE
            }
        };
    }

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Failed to create {}: {e}", parent.display());
            return ExitCode::FAILURE;
        }
    }
    match fs::write(&path, content) {
        Ok(()) => {
            println!("TypeScript types written to {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to write {}: {e}", path.display());
            ExitCode::FAILURE
        }
    }
}
