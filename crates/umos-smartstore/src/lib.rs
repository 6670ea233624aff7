// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Smartstore-style collector adapter.
//!
//! Authenticates via OAuth client-credentials: every fetch first exchanges
//! `(client_id, client_secret_sign, timestamp)` for a bearer token at the
//! token endpoint, then calls the commerce API with `Authorization: Bearer`
//! plus a `client_id` header. Tokens are not cached across calls; the
//! exchange is cheap relative to the fetch and a cache could serve a
//! revoked credential.

mod types;

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use umos_core::types::order_status;
use umos_core::{
    Collector, NormalizedOrder, NormalizedOrderItem, NormalizedProduct, ProviderType, UmosError,
};

use crate::types::{ProductOrderResponse, ProductSearchResponse, TokenResponse};

/// Production base URL for the Smartstore commerce API.
const API_BASE_URL: &str = "https://api.commerce.naver.com";

const TOKEN_PATH: &str = "/external/v1/oauth2/token";
const PRODUCT_SEARCH_PATH: &str = "/external/v1/products/search";
const PRODUCT_ORDERS_PATH: &str = "/external/v1/pay-order/seller/product-orders";
const CONFIRM_PATH: &str = "/external/v1/pay-order/seller/product-orders/confirm";
const DISPATCH_PATH: &str = "/external/v1/pay-order/seller/product-orders/dispatch";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Collector for one Smartstore-style channel.
pub struct SmartstoreCollector {
    channel_id: i64,
    api_key: String,
    api_secret: String,
    http: reqwest::Client,
    base_url: String,
}

impl SmartstoreCollector {
    /// Creates a collector from decrypted channel credentials.
    /// `api_key` is the OAuth client id, `api_secret` the client secret sign.
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

    /// Exchanges client credentials for a bearer access token.
    async fn get_access_token(&self) -> Result<String, UmosError> {
        let timestamp = Utc::now().timestamp_millis().to_string();
        let form = [
            ("client_id", self.api_key.as_str()),
            ("client_secret_sign", self.api_secret.as_str()),
            ("grant_type", "client_credentials"),
            ("timestamp", timestamp.as_str()),
            ("type", "SELF"),
        ];

        let response = self
            .http
            .post(format!("{}{TOKEN_PATH}", self.base_url))
            .form(&form)
            .send()
            .await
            .map_err(|e| UmosError::Transport {
                status: None,
                message: format!("smartstore token request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UmosError::Transport {
                status: Some(status.as_u16()),
                message: format!("smartstore token endpoint returned {status}: {body}"),
            });
        }

        let token: TokenResponse =
            response.json().await.map_err(|e| UmosError::Transport {
                status: None,
                message: format!("undecodable smartstore token response: {e}"),
            })?;
        debug!(
            channel_id = self.channel_id,
            expires_in = ?token.expires_in,
            "smartstore access token acquired"
        );

        token.access_token.ok_or_else(|| UmosError::Transport {
            status: None,
            message: "smartstore token response carried no access_token".to_string(),
        })
    }

    /// Sends an authenticated request, re-checking status and decoding JSON.
    async fn send_authed<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        token: &str,
    ) -> Result<T, UmosError> {
        let response = request
            .header("Authorization", format!("Bearer {token}"))
            .header("client_id", &self.api_key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| UmosError::Transport {
                status: None,
                message: format!("smartstore request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UmosError::Transport {
                status: Some(status.as_u16()),
                message: format!("smartstore API returned {status}: {body}"),
            });
        }

        response.json::<T>().await.map_err(|e| UmosError::Transport {
            status: None,
            message: format!("undecodable smartstore response: {e}"),
        })
    }
}

/// Maps product-order statuses into the internal vocabulary; unknown
/// statuses pass through verbatim.
fn map_order_status(status: &str) -> String {
    match status {
        "PAYED" => order_status::PAYMENT_COMPLETE.to_string(),
        "READY" => order_status::SHIPPING_PREPARE.to_string(),
        "DISPATCHED" | "DELIVERING" => order_status::SHIPPING.to_string(),
        "DELIVERED" | "PURCHASE_DECIDED" => order_status::DELIVERED.to_string(),
        "CANCELED" => order_status::CANCELLED.to_string(),
        other => other.to_string(),
    }
}

fn parse_order_date(raw: &str) -> Result<DateTime<Utc>, UmosError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| UmosError::Transport {
            status: None,
            message: format!("smartstore order has unparseable orderDate '{raw}'"),
        })
}

#[async_trait]
impl Collector for SmartstoreCollector {
    async fn fetch_products(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<NormalizedProduct>, UmosError> {
        let token = self.get_access_token().await?;

        // The commerce API pages from zero; the collector contract from one.
        let body = serde_json::json!({
            "page": page.saturating_sub(1),
            "size": page_size,
        });
        let request = self
            .http
            .post(format!("{}{PRODUCT_SEARCH_PATH}", self.base_url))
            .json(&body);
        let payload: ProductSearchResponse = self.send_authed(request, &token).await?;

        let entries = payload.data.map(|d| d.content).unwrap_or_default();
        debug!(channel_id = self.channel_id, count = entries.len(), "smartstore products fetched");

        Ok(entries
            .into_iter()
            .map(|entry| NormalizedProduct {
                channel_id: self.channel_id,
                external_id: entry.id.to_string(),
                name: entry.name,
                status: entry.status_type.unwrap_or_default(),
                channel_type: ProviderType::Smartstore.to_string(),
            })
            .collect())
    }

    async fn fetch_orders(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<NormalizedOrder>, UmosError> {
        let token = self.get_access_token().await?;

        let request = self
            .http
            .get(format!("{}{PRODUCT_ORDERS_PATH}", self.base_url))
            .query(&[
                ("from", start.to_rfc3339()),
                ("to", end.to_rfc3339()),
            ]);
        let payload: ProductOrderResponse = self.send_authed(request, &token).await?;
        debug!(channel_id = self.channel_id, count = payload.data.len(), "smartstore product-orders fetched");

        // One wire entry per item; regroup by order id. BTreeMap keeps the
        // output deterministic for a given response.
        let mut orders: BTreeMap<String, NormalizedOrder> = BTreeMap::new();
        for entry in payload.data {
            let item = NormalizedOrderItem {
                external_item_id: entry.product_order_id.clone(),
                product_name: entry.product_name.clone(),
                quantity: entry.quantity,
                unit_price: entry.unit_price,
                courier_code: None,
                tracking_number: None,
                status: map_order_status(&entry.product_order_status),
            };

            match orders.get_mut(&entry.order_id) {
                Some(order) => {
                    order.total_amount += entry.total_payment_amount;
                    order.items.push(item);
                }
                None => {
                    let order = NormalizedOrder {
                        channel_id: self.channel_id,
                        channel_type: ProviderType::Smartstore.to_string(),
                        external_order_id: entry.order_id.clone(),
                        order_date: parse_order_date(&entry.order_date)?,
                        total_amount: entry.total_payment_amount,
                        recipient_name: entry.receiver_name.clone(),
                        recipient_phone: entry.receiver_tel.clone(),
                        shipping_address: entry.receiver_address.clone(),
                        status: map_order_status(&entry.product_order_status),
                        items: vec![item],
                    };
                    orders.insert(entry.order_id.clone(), order);
                }
            }
        }
        Ok(orders.into_values().collect())
    }

    async fn confirm_preparation(&self, item_ids: &[String]) -> Result<bool, UmosError> {
        if item_ids.is_empty() {
            return Err(UmosError::InvalidInput(
                "confirm_preparation requires at least one item id".to_string(),
            ));
        }
        let token = self.get_access_token().await?;
        let request = self
            .http
            .post(format!("{}{CONFIRM_PATH}", self.base_url))
            .json(&serde_json::json!({ "productOrderIds": item_ids }));
        let _: serde_json::Value = self.send_authed(request, &token).await?;
        Ok(true)
    }

    async fn register_tracking(
        &self,
        item_id: &str,
        courier_code: &str,
        tracking_number: &str,
    ) -> Result<bool, UmosError> {
        let token = self.get_access_token().await?;
        let request = self
            .http
            .post(format!("{}{DISPATCH_PATH}", self.base_url))
            .json(&serde_json::json!({
                "dispatchProductOrders": [{
                    "productOrderId": item_id,
                    "deliveryCompanyCode": courier_code,
                    "trackingNumber": tracking_number,
                }]
            }));
        let _: serde_json::Value = self.send_authed(request, &token).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn collector(base_url: String) -> SmartstoreCollector {
        SmartstoreCollector::new(11, "client-id".to_string(), "secret-sign".to_string())
            .unwrap()
            .with_base_url(base_url)
    }

    async fn mount_token_endpoint(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_id=client-id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "token-abc",
                "expires_in": 10800,
                "token_type": "Bearer"
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn fetch_products_exchanges_token_then_searches() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server).await;
        Mock::given(method("POST"))
            .and(path(PRODUCT_SEARCH_PATH))
            .and(wiremock::matchers::header("Authorization", "Bearer token-abc"))
            .and(wiremock::matchers::header("client_id", "client-id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "content": [
                        { "id": 88001, "name": "wool blanket", "statusType": "SALE" },
                        { "id": 88002, "name": "floor cushion", "statusType": "SUSPENSION" }
                    ]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let products = collector(server.uri()).fetch_products(1, 50).await.unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].external_id, "88001");
        assert_eq!(products[0].status, "SALE");
        assert_eq!(products[0].channel_type, "smartstore");
        assert_eq!(products[0].channel_id, 11);
    }

    #[tokio::test]
    async fn missing_access_token_is_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": "invalid_client"
            })))
            .mount(&server)
            .await;

        let err = collector(server.uri()).fetch_products(1, 50).await.unwrap_err();
        match err {
            UmosError::Transport { status, message } => {
                assert_eq!(status, None);
                assert!(message.contains("no access_token"));
            }
            other => panic!("expected Transport, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn token_endpoint_failure_short_circuits_the_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad sign"))
            .mount(&server)
            .await;

        let err = collector(server.uri()).fetch_products(1, 50).await.unwrap_err();
        assert!(matches!(err, UmosError::Transport { status: Some(401), .. }));

        // Only the token exchange was attempted.
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn fetch_orders_groups_product_orders_by_order_id() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server).await;
        Mock::given(method("GET"))
            .and(path(PRODUCT_ORDERS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    {
                        "productOrderId": "PO-1",
                        "productOrderStatus": "PAYED",
                        "productName": "wool blanket",
                        "quantity": 1,
                        "unitPrice": 42000.0,
                        "totalPaymentAmount": 42000.0,
                        "orderId": "ORD-500",
                        "orderDate": "2026-08-02T09:00:00+09:00",
                        "receiverName": "Choi Minseo",
                        "receiverTel": "010-2222-3333",
                        "receiverAddress": "77 Haeundae-ro, Busan"
                    },
                    {
                        "productOrderId": "PO-2",
                        "productOrderStatus": "PAYED",
                        "productName": "floor cushion",
                        "quantity": 2,
                        "unitPrice": 9000.0,
                        "totalPaymentAmount": 18000.0,
                        "orderId": "ORD-500",
                        "orderDate": "2026-08-02T09:00:00+09:00",
                        "receiverName": "Choi Minseo",
                        "receiverTel": "010-2222-3333",
                        "receiverAddress": "77 Haeundae-ro, Busan"
                    },
                    {
                        "productOrderId": "PO-3",
                        "productOrderStatus": "MYSTERY_STATE",
                        "productName": "desk mat",
                        "quantity": 1,
                        "unitPrice": 15000.0,
                        "totalPaymentAmount": 15000.0,
                        "orderId": "ORD-501",
                        "orderDate": "2026-08-03T10:30:00+09:00",
                        "receiverName": "Jang Yuri",
                        "receiverTel": "010-4444-5555",
                        "receiverAddress": "5 Dongseong-ro, Daegu"
                    }
                ]
            })))
            .mount(&server)
            .await;

        let start = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 8, 7, 0, 0, 0).unwrap();
        let orders = collector(server.uri()).fetch_orders(start, end).await.unwrap();

        assert_eq!(orders.len(), 2);
        let ord500 = orders.iter().find(|o| o.external_order_id == "ORD-500").unwrap();
        assert_eq!(ord500.items.len(), 2);
        assert_eq!(ord500.total_amount, 60000.0);
        assert_eq!(ord500.status, "PAYMENT_COMPLETE");
        assert_eq!(ord500.recipient_name, "Choi Minseo");

        let ord501 = orders.iter().find(|o| o.external_order_id == "ORD-501").unwrap();
        // Unknown provider statuses pass through verbatim.
        assert_eq!(ord501.status, "MYSTERY_STATE");
    }

    #[tokio::test]
    async fn every_fetch_re_exchanges_the_token() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server).await;
        Mock::given(method("POST"))
            .and(path(PRODUCT_SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "content": [] }
            })))
            .mount(&server)
            .await;

        let collector = collector(server.uri());
        collector.fetch_products(1, 10).await.unwrap();
        collector.fetch_products(2, 10).await.unwrap();

        let token_calls = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.url.path() == TOKEN_PATH)
            .count();
        assert_eq!(token_calls, 2, "no token caching across calls");
    }
}
