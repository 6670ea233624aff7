// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the admin API.
//!
//! Thin request/response mapping; all behavior lives in the services.
//! Channel responses use [`ChannelRead`], which has no credential fields
//! at all -- ciphertext never leaves the storage/service boundary.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use umos_core::{ChannelConfig, NormalizedProduct, Order};

use crate::error::ApiError;
use crate::server::AppState;

// --- Channel DTOs ---

#[derive(Debug, Deserialize)]
pub struct ChannelCreateRequest {
    pub name: String,
    pub provider_type: String,
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelUpdateRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub provider_type: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Redacted channel schema: identity and state, never credentials.
#[derive(Debug, Serialize)]
pub struct ChannelRead {
    pub id: i64,
    pub name: String,
    pub provider_type: String,
    pub is_active: bool,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ChannelConfig> for ChannelRead {
    fn from(channel: ChannelConfig) -> Self {
        Self {
            id: channel.id,
            name: channel.name,
            provider_type: channel.provider_type,
            is_active: channel.is_active,
            last_sync_at: channel.last_sync_at,
            created_at: channel.created_at,
            updated_at: channel.updated_at,
        }
    }
}

// --- Query DTOs ---

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Deserialize)]
pub struct FetchQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    50
}

#[derive(Debug, Deserialize)]
pub struct OrderWindowQuery {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct FetchOrdersResponse {
    pub saved_count: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

// --- Channel handlers ---

pub async fn create_channel(
    State(state): State<AppState>,
    Json(payload): Json<ChannelCreateRequest>,
) -> Result<(StatusCode, Json<ChannelRead>), ApiError> {
    let channel = state
        .channels
        .create(umos_collector::CreateChannel {
            name: payload.name,
            provider_type: payload.provider_type,
            api_key: payload.api_key,
            api_secret: payload.api_secret,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(channel.into())))
}

pub async fn list_channels(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ChannelRead>>, ApiError> {
    let channels = state.channels.list(query.limit, query.skip).await?;
    Ok(Json(channels.into_iter().map(ChannelRead::from).collect()))
}

pub async fn get_channel(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ChannelRead>, ApiError> {
    let channel = state.channels.get(id).await?;
    Ok(Json(channel.into()))
}

pub async fn update_channel(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ChannelUpdateRequest>,
) -> Result<Json<ChannelRead>, ApiError> {
    let channel = state
        .channels
        .update(
            id,
            umos_collector::UpdateChannel {
                name: payload.name,
                provider_type: payload.provider_type,
                api_key: payload.api_key,
                api_secret: payload.api_secret,
                is_active: payload.is_active,
            },
        )
        .await?;
    Ok(Json(channel.into()))
}

pub async fn delete_channel(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.channels.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Collection handlers ---

pub async fn fetch_products(
    State(state): State<AppState>,
    Path(channel_id): Path<i64>,
    Query(query): Query<FetchQuery>,
) -> Result<Json<Vec<NormalizedProduct>>, ApiError> {
    let products = state
        .products
        .fetch_from_channel(channel_id, query.page, query.page_size)
        .await?;
    Ok(Json(products))
}

pub async fn fetch_all_products(
    State(state): State<AppState>,
    Query(query): Query<FetchQuery>,
) -> Result<Json<Vec<NormalizedProduct>>, ApiError> {
    let products = state.products.fetch_all(query.page, query.page_size).await?;
    Ok(Json(products))
}

pub async fn fetch_orders(
    State(state): State<AppState>,
    Path(channel_id): Path<i64>,
    Query(query): Query<OrderWindowQuery>,
) -> Result<Json<FetchOrdersResponse>, ApiError> {
    let saved_count = state
        .orders
        .fetch_and_save(channel_id, query.start_date, query.end_date)
        .await?;
    Ok(Json(FetchOrdersResponse { saved_count }))
}

pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let orders = state.orders.list(query.limit, query.skip).await?;
    Ok(Json(orders))
}

// --- Health ---

pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}
