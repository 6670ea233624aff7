// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order collection service: dispatch, fetch, reconcile.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use umos_core::UmosError;
use umos_storage::Database;
use umos_storage::queries::{channels, orders};

use crate::dispatcher::Dispatcher;

/// Collects orders through dispatched adapters and reconciles them into
/// the store.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<Database>,
    dispatcher: Dispatcher,
}

impl OrderService {
    pub fn new(db: Arc<Database>, dispatcher: Dispatcher) -> Self {
        Self { db, dispatcher }
    }

    /// Fetches orders for `[start, end]` from one channel and upserts them
    /// atomically. Returns the number of orders applied.
    pub async fn fetch_and_save(
        &self,
        channel_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<usize, UmosError> {
        if start > end {
            return Err(UmosError::InvalidInput(
                "start_date must not be after end_date".to_string(),
            ));
        }

        let resolved = self.dispatcher.resolve(channel_id).await?;
        let fetched = resolved.collector.fetch_orders(start, end).await?;
        if fetched.is_empty() {
            info!(channel_id, "no new orders fetched");
            return Ok(0);
        }

        let saved = orders::reconcile_orders(&self.db, fetched).await?;
        channels::touch_last_sync(&self.db, channel_id).await?;
        info!(channel_id, saved, "orders reconciled");
        Ok(saved)
    }

    /// Read path for the admin order list.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<umos_core::Order>, UmosError> {
        orders::list_orders(&self.db, limit, offset).await
    }
}
