// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Umos workspace.
//!
//! Normalized records are the provider-agnostic shapes every collector
//! adapter maps its raw payloads into; the row types mirror the persisted
//! schema in `umos-storage`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The built-in marketplace provider tags.
///
/// The collector registry is keyed by string tag rather than this enum, so
/// deployments can register additional providers without touching core;
/// these variants cover the adapters shipped in-tree.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Coupang,
    Smartstore,
    Mock,
}

/// Internal order lifecycle vocabulary.
///
/// Adapters map known provider status strings into this set; unknown
/// upstream statuses pass through verbatim, since status taxonomy mapping
/// evolves independently of each adapter's wire contract.
pub mod order_status {
    pub const PAYMENT_COMPLETE: &str = "PAYMENT_COMPLETE";
    pub const SHIPPING_PREPARE: &str = "SHIPPING_PREPARE";
    pub const SHIPPING: &str = "SHIPPING";
    pub const DELIVERED: &str = "DELIVERED";
    pub const CANCELLED: &str = "CANCELLED";
}

/// A stored marketplace channel: provider tag plus encrypted credentials.
///
/// `api_key` and `api_secret` hold ciphertext. Plaintext exists only
/// transiently inside the dispatcher while constructing an adapter, and is
/// never persisted, logged, or exposed through any read path.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    pub id: i64,
    pub name: String,
    pub provider_type: String,
    pub api_key: String,
    pub api_secret: String,
    pub is_active: bool,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted order row.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: i64,
    pub channel_id: i64,
    pub external_order_id: String,
    pub channel_type: String,
    pub order_date: DateTime<Utc>,
    pub total_amount: f64,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub shipping_address: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted order item row. Item lifetime is bound to the parent order;
/// deleting an order deletes its items.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub external_item_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub courier_code: Option<String>,
    pub tracking_number: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Provider-agnostic product shape every adapter maps its raw payload into.
/// Transient: returned to callers, not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedProduct {
    pub channel_id: i64,
    pub external_id: String,
    pub name: String,
    pub status: String,
    pub channel_type: String,
}

/// Provider-agnostic order shape consumed by the reconciliation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedOrder {
    pub channel_id: i64,
    pub channel_type: String,
    pub external_order_id: String,
    pub order_date: DateTime<Utc>,
    pub total_amount: f64,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub shipping_address: String,
    pub status: String,
    pub items: Vec<NormalizedOrderItem>,
}

/// One line of a [`NormalizedOrder`]. `external_item_id` is unique within
/// its order and is the natural key for item-level upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedOrderItem {
    pub external_item_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub courier_code: Option<String>,
    pub tracking_number: Option<String>,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn provider_type_round_trips_through_display_and_from_str() {
        for variant in [
            ProviderType::Coupang,
            ProviderType::Smartstore,
            ProviderType::Mock,
        ] {
            let tag = variant.to_string();
            assert_eq!(ProviderType::from_str(&tag).unwrap(), variant);
        }
    }

    #[test]
    fn provider_type_tags_are_lowercase() {
        assert_eq!(ProviderType::Coupang.to_string(), "coupang");
        assert_eq!(ProviderType::Smartstore.to_string(), "smartstore");
        assert_eq!(ProviderType::Mock.to_string(), "mock");
    }

    #[test]
    fn provider_type_serializes_as_lowercase_json() {
        let json = serde_json::to_string(&ProviderType::Smartstore).unwrap();
        assert_eq!(json, "\"smartstore\"");
        let parsed: ProviderType = serde_json::from_str("\"coupang\"").unwrap();
        assert_eq!(parsed, ProviderType::Coupang);
    }

    #[test]
    fn unknown_provider_tag_does_not_parse() {
        assert!(ProviderType::from_str("gmarket").is_err());
    }
}
