// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel admin service: encrypt-on-write credential management.
//!
//! Credentials enter as plaintext from the admin API and are encrypted
//! before anything touches storage. The read path returns rows whose
//! credential fields are ciphertext; the HTTP layer additionally omits
//! them from response schemas.

use std::sync::Arc;

use tracing::info;

use umos_core::{ChannelConfig, UmosError};
use umos_storage::Database;
use umos_storage::queries::channels::{self, ChannelUpdate, NewChannel};
use umos_vault::Vault;

/// Admin create payload. Credential fields are plaintext here and nowhere
/// past this service.
#[derive(Debug, Clone)]
pub struct CreateChannel {
    pub name: String,
    pub provider_type: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Admin partial-update payload. `None` fields are left unchanged;
/// supplied credential fields are re-encrypted.
#[derive(Debug, Clone, Default)]
pub struct UpdateChannel {
    pub name: Option<String>,
    pub provider_type: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub is_active: Option<bool>,
}

/// Channel registry admin operations.
#[derive(Clone)]
pub struct ChannelService {
    db: Arc<Database>,
    vault: Arc<Vault>,
}

impl ChannelService {
    pub fn new(db: Arc<Database>, vault: Arc<Vault>) -> Self {
        Self { db, vault }
    }

    /// Creates a channel, encrypting both credentials.
    pub async fn create(&self, request: CreateChannel) -> Result<ChannelConfig, UmosError> {
        if request.name.trim().is_empty() {
            return Err(UmosError::InvalidInput("name must not be empty".to_string()));
        }
        if request.provider_type.trim().is_empty() {
            return Err(UmosError::InvalidInput(
                "provider_type must not be empty".to_string(),
            ));
        }

        let new = NewChannel {
            name: request.name,
            provider_type: request.provider_type,
            api_key: self.vault.encrypt(&request.api_key)?,
            api_secret: self.vault.encrypt(&request.api_secret)?,
        };
        let channel = channels::create_channel(&self.db, new).await?;
        info!(channel_id = channel.id, provider_type = %channel.provider_type, "channel created");
        Ok(channel)
    }

    /// Admin read: returns the row whether active or not.
    pub async fn get(&self, channel_id: i64) -> Result<ChannelConfig, UmosError> {
        channels::get_channel(&self.db, channel_id)
            .await?
            .ok_or(UmosError::ChannelNotFound { channel_id })
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<ChannelConfig>, UmosError> {
        channels::list_channels(&self.db, limit, offset).await
    }

    /// Partial update, re-encrypting any supplied credential field.
    pub async fn update(
        &self,
        channel_id: i64,
        request: UpdateChannel,
    ) -> Result<ChannelConfig, UmosError> {
        let api_key = request
            .api_key
            .as_deref()
            .map(|plain| self.vault.encrypt(plain))
            .transpose()?;
        let api_secret = request
            .api_secret
            .as_deref()
            .map(|plain| self.vault.encrypt(plain))
            .transpose()?;

        let update = ChannelUpdate {
            name: request.name,
            provider_type: request.provider_type,
            api_key,
            api_secret,
            is_active: request.is_active,
        };
        channels::update_channel(&self.db, channel_id, update)
            .await?
            .ok_or(UmosError::ChannelNotFound { channel_id })
    }

    /// Hard delete.
    pub async fn delete(&self, channel_id: i64) -> Result<(), UmosError> {
        if channels::delete_channel(&self.db, channel_id).await? {
            info!(channel_id, "channel deleted");
            Ok(())
        } else {
            Err(UmosError::ChannelNotFound { channel_id })
        }
    }
}
