// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The polymorphic collector contract every provider adapter implements.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::UmosError;
use crate::types::{NormalizedOrder, NormalizedProduct};

/// Capability set for one marketplace provider's wire protocol.
///
/// Implementations are constructed from `(channel_id, decrypted api_key,
/// decrypted api_secret)` by the dispatcher; adapters never see ciphertext.
/// Every method suspends on network I/O. All network failures (connect
/// error, timeout, non-2xx status, undecodable body) must be caught at the
/// adapter boundary and re-signaled as [`UmosError::Transport`] — callers
/// never see an adapter's internal transport error type.
#[async_trait]
pub trait Collector: Send + Sync {
    /// Fetches one page of the channel's product listings, mapped into the
    /// normalized product shape.
    async fn fetch_products(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<NormalizedProduct>, UmosError>;

    /// Fetches orders placed in `[start, end]`, mapped into the normalized
    /// order shape with provider statuses translated where known.
    async fn fetch_orders(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<NormalizedOrder>, UmosError>;

    /// Confirms shipping preparation for the given external item ids.
    /// Returns whether the provider acknowledged the confirmation.
    async fn confirm_preparation(&self, item_ids: &[String]) -> Result<bool, UmosError>;

    /// Registers a courier and tracking number for one external item.
    async fn register_tracking(
        &self,
        item_id: &str,
        courier_code: &str,
        tracking_number: &str,
    ) -> Result<bool, UmosError>;
}
