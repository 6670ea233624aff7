// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic mock collector.
//!
//! Registered as the `mock` provider so the dispatch and reconciliation
//! paths can be exercised end to end without real network calls. Requests
//! still run the HMAC-SHA256 signing computation, so signature logic stays
//! unit-testable without live credentials.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use umos_core::types::order_status;
use umos_core::{
    Collector, NormalizedOrder, NormalizedOrderItem, NormalizedProduct, ProviderType, UmosError,
};

type HmacSha256 = Hmac<Sha256>;

const MOCK_PRODUCTS_PATH: &str = "/v2/mock/products";

/// In-memory collector with fixed responses.
pub struct MockCollector {
    channel_id: i64,
    api_key: String,
    #[allow(dead_code)]
    api_secret: String,
}

impl MockCollector {
    pub fn new(channel_id: i64, api_key: String, api_secret: String) -> Self {
        Self {
            channel_id,
            api_key,
            api_secret,
        }
    }

    /// Signs the mock request path the same way a real gateway adapter
    /// would: base64 HMAC-SHA256 over `timestamp + method + path`.
    fn sign(&self, timestamp: &str) -> Result<String, UmosError> {
        let message = format!("{timestamp}GET{MOCK_PRODUCTS_PATH}");
        let mut mac = HmacSha256::new_from_slice(self.api_key.as_bytes())
            .map_err(|_| UmosError::Internal("HMAC key initialization failed".to_string()))?;
        mac.update(message.as_bytes());
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }
}

#[async_trait]
impl Collector for MockCollector {
    async fn fetch_products(
        &self,
        _page: u32,
        _page_size: u32,
    ) -> Result<Vec<NormalizedProduct>, UmosError> {
        let timestamp = Utc::now().format("%y%m%dT%H%M%SZ").to_string();
        let signature = self.sign(&timestamp)?;
        debug!(channel_id = self.channel_id, %timestamp, %signature, "mock fetch signed");

        Ok(vec![
            NormalizedProduct {
                channel_id: self.channel_id,
                external_id: "P_MOCK_1001_".to_string(),
                name: format!("{} - mock product A", self.channel_id),
                status: "SALE".to_string(),
                channel_type: ProviderType::Mock.to_string(),
            },
            NormalizedProduct {
                channel_id: self.channel_id,
                external_id: "P_MOCK_1002_".to_string(),
                name: format!("{} - mock product B", self.channel_id),
                status: "SOLD_OUT".to_string(),
                channel_type: ProviderType::Mock.to_string(),
            },
        ])
    }

    async fn fetch_orders(
        &self,
        start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Vec<NormalizedOrder>, UmosError> {
        Ok(vec![NormalizedOrder {
            channel_id: self.channel_id,
            channel_type: ProviderType::Mock.to_string(),
            external_order_id: "O_MOCK_9001".to_string(),
            order_date: start,
            total_amount: 32000.0,
            recipient_name: "Kim Jiwoo".to_string(),
            recipient_phone: "010-1234-5678".to_string(),
            shipping_address: "12 Teheran-ro, Gangnam-gu, Seoul".to_string(),
            status: order_status::PAYMENT_COMPLETE.to_string(),
            items: vec![
                NormalizedOrderItem {
                    external_item_id: "I_MOCK_0001".to_string(),
                    product_name: format!("{} - mock product A", self.channel_id),
                    quantity: 2,
                    unit_price: 12000.0,
                    courier_code: None,
                    tracking_number: None,
                    status: order_status::PAYMENT_COMPLETE.to_string(),
                },
                NormalizedOrderItem {
                    external_item_id: "I_MOCK_0002".to_string(),
                    product_name: format!("{} - mock product B", self.channel_id),
                    quantity: 1,
                    unit_price: 8000.0,
                    courier_code: None,
                    tracking_number: None,
                    status: order_status::PAYMENT_COMPLETE.to_string(),
                },
            ],
        }])
    }

    async fn confirm_preparation(&self, item_ids: &[String]) -> Result<bool, UmosError> {
        if item_ids.is_empty() {
            return Err(UmosError::InvalidInput(
                "confirm_preparation requires at least one item id".to_string(),
            ));
        }
        Ok(true)
    }

    async fn register_tracking(
        &self,
        _item_id: &str,
        _courier_code: &str,
        _tracking_number: &str,
    ) -> Result<bool, UmosError> {
        Ok(true)
    }
}
