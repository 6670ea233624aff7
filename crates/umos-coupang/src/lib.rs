// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Coupang-style collector adapter.
//!
//! Authenticates with a per-request HMAC-SHA256 signature over the
//! canonical request string (see [`sign`]) and maps the seller gateway's
//! payloads into the normalized product/order shapes.

mod sign;
mod types;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use tracing::debug;

use umos_core::types::order_status;
use umos_core::{
    Collector, NormalizedOrder, NormalizedOrderItem, NormalizedProduct, ProviderType, UmosError,
};

use crate::types::{OrderSheetResponse, ProductListResponse};

/// Production base URL for the Coupang seller gateway.
const API_BASE_URL: &str = "https://api-gateway.coupang.com";

const PRODUCTS_PATH: &str = "/v2/providers/seller_api/apis/api/v1/marketplace/seller-products";
const ORDERS_PATH: &str = "/v2/providers/openapi/apis/api/v4/ordersheets";
const ACKNOWLEDGE_PATH: &str = "/v2/providers/openapi/apis/api/v4/ordersheets/acknowledgement";
const INVOICES_PATH: &str = "/v2/providers/openapi/apis/api/v4/orders/invoices";

/// Request timeout for all gateway calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Collector for one Coupang-style channel.
pub struct CoupangCollector {
    channel_id: i64,
    api_key: String,
    api_secret: String,
    http: reqwest::Client,
    base_url: String,
}

impl CoupangCollector {
    /// Creates a collector from decrypted channel credentials.
    pub fn new(channel_id: i64, api_key: String, api_secret: String) -> Result<Self, UmosError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| UmosError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            channel_id,
            api_key,
            api_secret,
            http,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Signed GET returning a decoded JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &str) -> Result<T, UmosError> {
        // Timestamp and signature are generated fresh per request --
        // the gateway rejects stale signatures.
        let timestamp = sign::signed_timestamp();
        let authorization = sign::authorization_header(
            &self.api_key,
            &self.api_secret,
            &timestamp,
            "GET",
            path,
            query,
        )?;

        let url = if query.is_empty() {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}{path}?{query}", self.base_url)
        };

        let response = self
            .http
            .get(&url)
            .header("Authorization", authorization)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| UmosError::Transport {
                status: None,
                message: format!("coupang request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UmosError::Transport {
                status: Some(status.as_u16()),
                message: format!("coupang API returned {status}: {body}"),
            });
        }

        response.json::<T>().await.map_err(|e| UmosError::Transport {
            status: None,
            message: format!("undecodable coupang response: {e}"),
        })
    }

    /// Signed PUT with a JSON body, succeeding on any 2xx.
    async fn put_json(&self, path: &str, body: serde_json::Value) -> Result<(), UmosError> {
        let timestamp = sign::signed_timestamp();
        let authorization = sign::authorization_header(
            &self.api_key,
            &self.api_secret,
            &timestamp,
            "PUT",
            path,
            "",
        )?;

        let response = self
            .http
            .put(format!("{}{path}", self.base_url))
            .header("Authorization", authorization)
            .header("Content-Type", "application/json;charset=UTF-8")
            .json(&body)
            .send()
            .await
            .map_err(|e| UmosError::Transport {
                status: None,
                message: format!("coupang request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UmosError::Transport {
                status: Some(status.as_u16()),
                message: format!("coupang API returned {status}: {body}"),
            });
        }
        Ok(())
    }
}

/// Maps the gateway's order status vocabulary into the internal one.
/// Unknown statuses pass through verbatim.
fn map_order_status(status: &str) -> String {
    match status {
        "ACCEPT" => order_status::PAYMENT_COMPLETE.to_string(),
        "INSTRUCT" => order_status::SHIPPING_PREPARE.to_string(),
        "DEPARTURE" | "DELIVERING" => order_status::SHIPPING.to_string(),
        "FINAL_DELIVERY" => order_status::DELIVERED.to_string(),
        "CANCEL" => order_status::CANCELLED.to_string(),
        other => other.to_string(),
    }
}

/// The gateway reports order times either as RFC 3339 or as a naive
/// `yyyy-MM-ddTHH:mm:ss` local-less form; both are accepted.
fn parse_order_date(raw: &str) -> Result<DateTime<Utc>, UmosError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map(|n| n.and_utc())
        .map_err(|_| UmosError::Transport {
            status: None,
            message: format!("coupang order has unparseable orderedAt '{raw}'"),
        })
}

#[async_trait]
impl Collector for CoupangCollector {
    async fn fetch_products(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<NormalizedProduct>, UmosError> {
        let query = format!("page={page}&pageSize={page_size}");
        let payload: ProductListResponse = self.get_json(PRODUCTS_PATH, &query).await?;

        let entries = payload.data.map(|d| d.content).unwrap_or_default();
        debug!(channel_id = self.channel_id, count = entries.len(), "coupang products fetched");

        Ok(entries
            .into_iter()
            .map(|entry| NormalizedProduct {
                channel_id: self.channel_id,
                external_id: entry.seller_product_id.to_string(),
                name: entry.product_name,
                status: entry.sales_status.unwrap_or_default(),
                channel_type: ProviderType::Coupang.to_string(),
            })
            .collect())
    }

    async fn fetch_orders(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<NormalizedOrder>, UmosError> {
        let query = format!(
            "createdAtFrom={}&createdAtTo={}",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );
        let payload: OrderSheetResponse = self.get_json(ORDERS_PATH, &query).await?;
        debug!(channel_id = self.channel_id, count = payload.data.len(), "coupang orders fetched");

        let mut orders = Vec::with_capacity(payload.data.len());
        for sheet in payload.data {
            let status = map_order_status(&sheet.status);
            let shipping_address = match &sheet.receiver.addr2 {
                Some(addr2) if !addr2.is_empty() => {
                    format!("{} {addr2}", sheet.receiver.addr1)
                }
                _ => sheet.receiver.addr1.clone(),
            };
            let items = sheet
                .order_items
                .into_iter()
                .map(|item| NormalizedOrderItem {
                    external_item_id: item.vendor_item_id.to_string(),
                    product_name: item.vendor_item_name,
                    quantity: item.shipping_count,
                    unit_price: item.order_price,
                    courier_code: None,
                    tracking_number: None,
                    status: status.clone(),
                })
                .collect();

            orders.push(NormalizedOrder {
                channel_id: self.channel_id,
                channel_type: ProviderType::Coupang.to_string(),
                external_order_id: sheet.order_id.to_string(),
                order_date: parse_order_date(&sheet.ordered_at)?,
                total_amount: sheet.total_paid_amount,
                recipient_name: sheet.receiver.name,
                recipient_phone: sheet.receiver.safe_number.unwrap_or_default(),
                shipping_address,
                status,
                items,
            });
        }
        Ok(orders)
    }

    async fn confirm_preparation(&self, item_ids: &[String]) -> Result<bool, UmosError> {
        if item_ids.is_empty() {
            return Err(UmosError::InvalidInput(
                "confirm_preparation requires at least one item id".to_string(),
            ));
        }
        self.put_json(
            ACKNOWLEDGE_PATH,
            serde_json::json!({ "vendorItemIds": item_ids }),
        )
        .await?;
        Ok(true)
    }

    async fn register_tracking(
        &self,
        item_id: &str,
        courier_code: &str,
        tracking_number: &str,
    ) -> Result<bool, UmosError> {
        self.put_json(
            INVOICES_PATH,
            serde_json::json!({
                "vendorItemId": item_id,
                "deliveryCompanyCode": courier_code,
                "invoiceNumber": tracking_number,
            }),
        )
        .await?;
        Ok(true)
    }
}
