pub mod asset;
pub mod card;
pub mod client;
pub mod contract;
pub mod feedback;
pub mod lead;
pub mod notification;
pub mod package;
pub mod pocket;
pub mod profile;
pub mod project;
pub mod promo_code;
pub mod social_media;
pub mod sop;
pub mod team_member;
pub mod transaction;
pub mod user;

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{
        asset::{Asset, AssetStatus},
        card::{Card, CardType},
        client::{Client, ClientStatus, ClientType},
        contract::Contract,
        feedback::{ClientFeedback, SatisfactionLevel},
        lead::{ContactChannel, Lead, LeadStatus},
        notification::{NavigationAction, Notification, NotificationIcon},
        package::{AddOn, Package, PhysicalItem},
        pocket::{FinancialPocket, PocketType},
        profile::{ProjectStatusConfig, Profile, SubStatus},
        project::{AssignedTeamMember, PaymentStatus, Project, Revision, RevisionStatus},
        promo_code::{DiscountType, PromoCode},
        social_media::{PostStatus, PostType, SocialMediaPost},
        sop::Sop,
        team_member::{PerformanceNote, PerformanceNoteType, TeamMember},
        transaction::{Transaction, TransactionType},
        user::{User, UserRole, ViewType},
    };
    use crate::entity::Entity;

    fn assert_round_trip<E: Entity + std::fmt::Debug>(record: E) {
        let row = record.to_row();
        assert_eq!(E::from_row(&row), record);
    }

    #[test]
    fn populated_records_survive_storage() {
        let mut notes = BTreeMap::new();
        notes.insert("Color Grading".to_string(), "warmer tones please".to_string());

        assert_round_trip(Project {
            id: "PRJ-1".to_string(),
            project_name: "Wedding Andi & Sari".to_string(),
            total_cost: 12_000_000.0,
            amount_paid: 4_000_000.0,
            payment_status: PaymentStatus::DownPayment,
            team: vec![AssignedTeamMember {
                member_id: "TM-1".to_string(),
                fee: 750_000.0,
                reward: Some(50_000.0),
                ..Default::default()
            }],
            revisions: vec![Revision {
                id: "REV-1".to_string(),
                status: RevisionStatus::InProgress,
                ..Default::default()
            }],
            discount_amount: Some(0.0),
            client_sub_status_notes: notes,
            ..Default::default()
        });

        assert_round_trip(Transaction {
            id: "TRX-1".to_string(),
            amount: 250_000.0,
            kind: TransactionType::Expense,
            project_id: Some("PRJ-1".to_string()),
            ..Default::default()
        });

        assert_round_trip(Notification {
            id: "NOTIF-1".to_string(),
            icon: NotificationIcon::Completed,
            link_view: Some(ViewType::Projects),
            link_action: Some(NavigationAction::view_project_details("PRJ-1")),
            ..Default::default()
        });

        assert_round_trip(Profile {
            id: "P-1".to_string(),
            project_status_config: vec![ProjectStatusConfig {
                id: "S-1".to_string(),
                name: "Editing".to_string(),
                sub_statuses: vec![SubStatus {
                    name: "Color Grading".to_string(),
                    note: String::new(),
                }],
                ..Default::default()
            }],
            ..Default::default()
        });

        assert_round_trip(Contract {
            id: "CTR-1".to_string(),
            created_at: "2024-05-01T10:00:00Z".to_string(),
            vendor_signature: Some("data:image/png;base64,AAAA".to_string()),
            ..Default::default()
        });

        assert_round_trip(TeamMember::default());
    }

    #[test]
    fn every_entity_survives_storage_fully_populated() {
        assert_round_trip(Client {
            id: "CLI-1".to_string(),
            name: "Andi".to_string(),
            email: "andi@mail.id".to_string(),
            phone: "0812".to_string(),
            instagram: "@andi".to_string(),
            since: "2024-01-02".to_string(),
            status: ClientStatus::Lost,
            client_type: ClientType::Vendor,
            last_contact: "2024-06-01".to_string(),
            portal_access_id: "portal-andi".to_string(),
        });

        assert_round_trip(Package {
            id: "PKG-1".to_string(),
            name: "Gold".to_string(),
            price: 7_500_000.0,
            description: "Full day".to_string(),
            physical_items: vec![PhysicalItem {
                name: "Album".to_string(),
                price: 900_000.0,
            }],
            digital_items: vec!["300 edited photos".to_string()],
            processing_time: "14 hari kerja".to_string(),
            photographers: "2".to_string(),
            videographers: "1".to_string(),
        });

        assert_round_trip(AddOn {
            id: "ADD-1".to_string(),
            name: "Drone".to_string(),
            price: 1_200_000.0,
        });

        assert_round_trip(Card {
            id: "CARD-1".to_string(),
            card_holder_name: "Vena".to_string(),
            bank_name: "BCA".to_string(),
            card_type: CardType::Credit,
            last_four_digits: "4321".to_string(),
            expiry_date: Some("12/27".to_string()),
            balance: 3_250_000.5,
            color_gradient: "from-blue-500 to-sky-400".to_string(),
        });

        assert_round_trip(FinancialPocket {
            id: "PKT-1".to_string(),
            name: "New lens".to_string(),
            description: "Saving for 85mm".to_string(),
            icon: "piggy-bank".to_string(),
            kind: PocketType::RewardPool,
            amount: 2_000_000.0,
            goal_amount: Some(15_000_000.0),
            lock_end_date: Some("2025-01-01".to_string()),
            source_card_id: Some("CARD-1".to_string()),
        });

        assert_round_trip(Lead {
            id: "L-1".to_string(),
            name: "Sari".to_string(),
            contact_channel: ContactChannel::SuggestionForm,
            location: "Bandung".to_string(),
            status: LeadStatus::FollowUp,
            date: "2024-04-04".to_string(),
            notes: Some("Asked about prewedding".to_string()),
        });

        assert_round_trip(Asset {
            id: "AST-1".to_string(),
            name: "Sony A7 IV".to_string(),
            category: "Camera".to_string(),
            purchase_date: "2023-09-09".to_string(),
            purchase_price: 38_000_000.0,
            serial_number: Some("SN-991".to_string()),
            status: AssetStatus::Maintenance,
            notes: Some("Sensor cleaning".to_string()),
        });

        assert_round_trip(ClientFeedback {
            id: "FB-1".to_string(),
            client_name: "Andi".to_string(),
            satisfaction: SatisfactionLevel::Unsatisfied,
            rating: 2,
            feedback: "Late delivery".to_string(),
            date: "2024-07-07".to_string(),
        });

        assert_round_trip(SocialMediaPost {
            id: "POST-1".to_string(),
            project_id: "PRJ-1".to_string(),
            client_name: "Andi".to_string(),
            post_type: PostType::InstagramReels,
            platform: "Instagram".to_string(),
            scheduled_date: "2024-08-01".to_string(),
            caption: "Golden hour".to_string(),
            media_url: Some("https://cdn/x.mp4".to_string()),
            status: PostStatus::Scheduled,
            notes: Some("Tag the venue".to_string()),
        });

        assert_round_trip(PromoCode {
            id: "PROMO-1".to_string(),
            code: "HEMAT10".to_string(),
            discount_type: DiscountType::Fixed,
            discount_value: 500_000.0,
            is_active: true,
            usage_count: 3,
            max_usage: Some(10),
            expiry_date: Some("2025-12-31".to_string()),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        });

        assert_round_trip(Sop {
            id: "SOP-1".to_string(),
            title: "Backup files".to_string(),
            category: "Post-production".to_string(),
            content: "Copy to two drives".to_string(),
            last_updated: "2024-02-02T08:00:00Z".to_string(),
        });

        assert_round_trip(User {
            id: "U-1".to_string(),
            email: "admin@studio.id".to_string(),
            password: "rahasia".to_string(),
            full_name: "Admin".to_string(),
            role: UserRole::Admin,
            permissions: vec![ViewType::Finance, ViewType::ClientFeedback],
        });

        assert_round_trip(TeamMember {
            id: "TM-1".to_string(),
            name: "Rina".to_string(),
            role: "Photographer".to_string(),
            email: "rina@mail.id".to_string(),
            phone: "0813".to_string(),
            standard_fee: 1_500_000.0,
            no_rek: "123456".to_string(),
            reward_balance: 250_000.0,
            rating: 4.5,
            performance_notes: vec![PerformanceNote {
                id: "PN-1".to_string(),
                date: "2024-03-03".to_string(),
                note: "Missed the deadline".to_string(),
                kind: PerformanceNoteType::LateDeadline,
            }],
            portal_access_id: "portal-rina".to_string(),
        });
    }

    #[test]
    fn zero_rating_is_kept() {
        assert_round_trip(TeamMember {
            rating: 0.0,
            ..Default::default()
        });
        let row = crate::row::StorageRow::new().with("rating", serde_json::Value::Null);
        assert_eq!(TeamMember::from_row(&row).rating, 5.0);
    }

    #[test]
    fn empty_row_maps_to_defaults() {
        let row = crate::row::StorageRow::new();
        assert_eq!(Transaction::from_row(&row), Transaction::default());
        assert_eq!(Contract::from_row(&row), Contract::default());
        assert_eq!(TeamMember::from_row(&row).rating, 5.0);
    }

    #[test]
    fn read_only_columns_are_not_written() {
        let contract = Contract {
            id: "CTR-1".to_string(),
            created_at: "2024-05-01T10:00:00Z".to_string(),
            ..Default::default()
        };
        assert!(!contract.to_insert_row().contains("created_at"));

        let edited = Contract {
            jurisdiction: "Jakarta".to_string(),
            ..contract.clone()
        };
        let changes = edited.changes_since(&contract);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes.text("jurisdiction"), "Jakarta");
    }

    #[test]
    fn empty_id_is_left_for_the_store() {
        let transaction = Transaction::default();
        assert!(!transaction.to_insert_row().contains("id"));
    }
}
