use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::{entity::Entity, row::StorageRow};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DiscountType {
    #[default]
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct PromoCode {
    pub id: String,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub is_active: bool,
    pub usage_count: i64,
    pub max_usage: Option<i64>,
    pub expiry_date: Option<String>,
    pub created_at: String,
}

impl PromoCode {
    /// Whether the code can still be applied on `today` (an ISO `YYYY-MM-DD` date).
    pub fn is_redeemable(&self, today: &str) -> bool {
        let within_usage = self.max_usage.is_none_or(|max| self.usage_count < max);
        // ISO dates compare correctly as strings
        let not_expired = self
            .expiry_date
            .as_deref()
            .is_none_or(|expiry| expiry.get(..10).unwrap_or(expiry) >= today);
        self.is_active && within_usage && not_expired
    }

    /// Discount this code grants on `subtotal`, never more than the subtotal.
    pub fn discount_for(&self, subtotal: f64) -> f64 {
        let discount = match self.discount_type {
            DiscountType::Percentage => subtotal * self.discount_value / 100.0,
            DiscountType::Fixed => self.discount_value,
        };
        discount.clamp(0.0, subtotal.max(0.0))
    }
}

impl Entity for PromoCode {
    const TABLE: &'static str = "promo_codes";
    const READ_ONLY: &'static [&'static str] = &["created_at"];

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &StorageRow) -> Self {
        Self {
            id: row.text("id"),
            code: row.text("code"),
            discount_type: row.variant("discount_type"),
            discount_value: row.number("discount_value"),
            is_active: row.flag("is_active"),
            usage_count: row.integer("usage_count"),
            max_usage: row.opt_integer("max_usage"),
            expiry_date: row.opt_text("expiry_date"),
            created_at: row.text("created_at"),
        }
    }

    fn to_row(&self) -> StorageRow {
        StorageRow::new()
            .with("id", &self.id)
            .with("code", &self.code)
            .with("discount_type", self.discount_type.to_string())
            .with("discount_value", self.discount_value)
            .with("is_active", self.is_active)
            .with("usage_count", self.usage_count)
            .with("max_usage", self.max_usage)
            .with("expiry_date", &self.expiry_date)
            .with("created_at", &self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn promo() -> PromoCode {
        PromoCode {
            id: "PROMO-1".to_string(),
            code: "WEDDING10".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: 10.0,
            is_active: true,
            usage_count: 2,
            max_usage: Some(3),
            expiry_date: Some("2026-12-31".to_string()),
            created_at: String::new(),
        }
    }

    #[test]
    fn redeemable_respects_usage_and_expiry() {
        let code = promo();
        assert!(code.is_redeemable("2026-10-17"));
        assert!(!code.is_redeemable("2027-01-01"));

        let exhausted = PromoCode { usage_count: 3, ..promo() };
        assert!(!exhausted.is_redeemable("2026-10-17"));

        let inactive = PromoCode { is_active: false, ..promo() };
        assert!(!inactive.is_redeemable("2026-10-17"));
    }

    #[test]
    fn discount_is_capped_by_subtotal() {
        assert_eq!(promo().discount_for(1_000.0), 100.0);
        let fixed = PromoCode {
            discount_type: DiscountType::Fixed,
            discount_value: 5_000.0,
            ..promo()
        };
        assert_eq!(fixed.discount_for(1_000.0), 1_000.0);
    }
}
