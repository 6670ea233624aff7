// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Product collection service.

use std::sync::Arc;

use tracing::{info, warn};

use umos_core::{NormalizedProduct, UmosError};
use umos_storage::Database;
use umos_storage::queries::channels;

use crate::dispatcher::Dispatcher;

/// Collects product listings through dispatched adapters.
#[derive(Clone)]
pub struct ProductService {
    db: Arc<Database>,
    dispatcher: Dispatcher,
}

impl ProductService {
    pub fn new(db: Arc<Database>, dispatcher: Dispatcher) -> Self {
        Self { db, dispatcher }
    }

    /// Fetches one page of products from a single channel.
    pub async fn fetch_from_channel(
        &self,
        channel_id: i64,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<NormalizedProduct>, UmosError> {
        let resolved = self.dispatcher.resolve(channel_id).await?;
        let products = resolved.collector.fetch_products(page, page_size).await?;
        channels::touch_last_sync(&self.db, channel_id).await?;
        info!(channel_id, count = products.len(), "products collected");
        Ok(products)
    }

    /// Fetches products from every active channel, best-effort.
    ///
    /// A failure on one channel is logged and skipped so the remaining
    /// channels still collect; the merged partial result is returned.
    pub async fn fetch_all(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<NormalizedProduct>, UmosError> {
        let channel_ids = channels::list_active_channel_ids(&self.db).await?;
        let mut all_products = Vec::new();

        for channel_id in channel_ids {
            match self.fetch_from_channel(channel_id, page, page_size).await {
                Ok(products) => all_products.extend(products),
                Err(err) => {
                    warn!(channel_id, error = %err, "skipping channel during bulk product fetch");
                    continue;
                }
            }
        }
        Ok(all_products)
    }
}
