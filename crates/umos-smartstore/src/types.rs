// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Smartstore commerce API.

use serde::Deserialize;

/// Token endpoint response. `access_token` is optional so a missing token
/// can be reported as a transport error instead of a decode error.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductSearchResponse {
    #[serde(default)]
    pub data: Option<ProductSearchData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductSearchData {
    #[serde(default)]
    pub content: Vec<ProductEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductEntry {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub status_type: Option<String>,
}

/// The commerce API returns one entry per product-order (item); entries
/// sharing `orderId` belong to the same order and are regrouped by the
/// adapter.
#[derive(Debug, Deserialize)]
pub(crate) struct ProductOrderResponse {
    #[serde(default)]
    pub data: Vec<ProductOrderEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductOrderEntry {
    pub product_order_id: String,
    pub product_order_status: String,
    pub product_name: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub total_payment_amount: f64,
    pub order_id: String,
    pub order_date: String,
    #[serde(default)]
    pub receiver_name: String,
    #[serde(default)]
    pub receiver_tel: String,
    #[serde(default)]
    pub receiver_address: String,
}

fn default_quantity() -> i64 {
    1
}
