// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The dispatch pipeline: channel id in, ready-to-use collector out.
//!
//! Four sequential checks, short-circuiting on the first failure:
//! 1. load the channel, require `is_active` -- else `ChannelNotFound`;
//! 2. look up the provider tag in the registry -- else `UnsupportedProvider`;
//! 3. decrypt both credentials -- a decryption failure escalates to
//!    `Configuration`;
//! 4. invoke the registered constructor with the decrypted credentials.
//!
//! Product and order collection share this pipeline, so they cannot
//! diverge in validation order or error classification. No state is held
//! between calls, and decrypted credentials are not cached: every dispatch
//! decrypts fresh, so a rotated or revoked credential is never reused.

use std::sync::Arc;

use tracing::error;

use umos_core::{ChannelConfig, Collector, UmosError};
use umos_storage::Database;
use umos_storage::queries::channels;
use umos_vault::Vault;

use crate::registry::CollectorRegistry;

/// The outcome of a successful dispatch.
pub struct ResolvedChannel {
    /// The registry row the collector was built from.
    pub channel: ChannelConfig,
    /// A collector instance holding the decrypted credentials.
    pub collector: Arc<dyn Collector>,
}

/// Resolves channel ids to collector instances.
#[derive(Clone)]
pub struct Dispatcher {
    db: Arc<Database>,
    vault: Arc<Vault>,
    registry: Arc<CollectorRegistry>,
}

impl Dispatcher {
    pub fn new(db: Arc<Database>, vault: Arc<Vault>, registry: Arc<CollectorRegistry>) -> Self {
        Self { db, vault, registry }
    }

    /// Runs the dispatch pipeline for one channel.
    pub async fn resolve(&self, channel_id: i64) -> Result<ResolvedChannel, UmosError> {
        let channel = channels::get_active_channel(&self.db, channel_id)
            .await?
            .ok_or(UmosError::ChannelNotFound { channel_id })?;

        let factory = self.registry.get(&channel.provider_type).ok_or_else(|| {
            UmosError::UnsupportedProvider {
                provider_type: channel.provider_type.clone(),
            }
        })?;

        let api_key = self.decrypt_credential(channel_id, &channel.api_key, "api_key")?;
        let api_secret = self.decrypt_credential(channel_id, &channel.api_secret, "api_secret")?;

        let collector = factory(channel_id, api_key, api_secret)?;
        Ok(ResolvedChannel { channel, collector })
    }

    /// Decrypts one credential, escalating a vault failure to the
    /// configuration error class. The log line names the channel and the
    /// field, never the ciphertext or any key material.
    fn decrypt_credential(
        &self,
        channel_id: i64,
        ciphertext: &str,
        field: &'static str,
    ) -> Result<String, UmosError> {
        self.vault.decrypt(ciphertext).map_err(|err| match err {
            UmosError::DecryptionFailed => {
                error!(
                    channel_id,
                    field, "credential decryption failed; key rotation mismatch or corrupted row"
                );
                UmosError::Configuration {
                    channel_id,
                    message: format!("failed to decrypt {field}"),
                }
            }
            other => other,
        })
    }
}
