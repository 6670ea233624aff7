// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Coupang seller gateway.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ProductListResponse {
    #[serde(default)]
    pub data: Option<ProductListData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductListData {
    #[serde(default)]
    pub content: Vec<ProductEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductEntry {
    pub seller_product_id: i64,
    pub product_name: String,
    #[serde(default)]
    pub sales_status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderSheetResponse {
    #[serde(default)]
    pub data: Vec<OrderSheet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderSheet {
    pub order_id: i64,
    pub ordered_at: String,
    pub status: String,
    #[serde(default)]
    pub total_paid_amount: f64,
    pub receiver: Receiver,
    #[serde(default)]
    pub order_items: Vec<OrderSheetItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Receiver {
    pub name: String,
    #[serde(default)]
    pub safe_number: Option<String>,
    #[serde(default)]
    pub addr1: String,
    #[serde(default)]
    pub addr2: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderSheetItem {
    pub vendor_item_id: i64,
    pub vendor_item_name: String,
    #[serde(default = "default_count")]
    pub shipping_count: i64,
    #[serde(default)]
    pub order_price: f64,
}

fn default_count() -> i64 {
    1
}
