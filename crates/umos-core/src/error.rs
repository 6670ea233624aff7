// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Umos order-management backend.

use thiserror::Error;

/// The primary error type used across all Umos crates.
///
/// Variants fall into four classes: caller errors (`InvalidInput`,
/// `ChannelNotFound`), deployment gaps (`UnsupportedProvider`,
/// `Configuration`), transient upstream failures (`Transport`), and
/// internal failures (`Storage`, `Internal`). The HTTP boundary maps each
/// class to exactly one status family.
#[derive(Debug, Error)]
pub enum UmosError {
    /// Startup configuration errors (invalid TOML, malformed vault key).
    /// Fatal at boot, never produced by a request path.
    #[error("configuration error: {0}")]
    Config(String),

    /// Caller-supplied input was rejected before any external call.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Channel is absent or inactive. The two cases are deliberately
    /// indistinguishable so callers cannot probe for channel existence.
    #[error("channel {channel_id} not found or inactive")]
    ChannelNotFound { channel_id: i64 },

    /// No collector is registered for the channel's provider type.
    #[error("no collector registered for provider type '{provider_type}'")]
    UnsupportedProvider { provider_type: String },

    /// Stored credentials failed to decrypt during dispatch. Indicates data
    /// corruption or a key-rotation mismatch, not a transient condition;
    /// must never be retried silently.
    #[error("credential configuration error for channel {channel_id}: {message}")]
    Configuration { channel_id: i64, message: String },

    /// Vault-level authenticity or format failure. The dispatcher
    /// translates this into [`UmosError::Configuration`] before it reaches
    /// any caller; the raw variant never crosses the HTTP boundary.
    #[error("decryption failed")]
    DecryptionFailed,

    /// Upstream marketplace API failure (connect error, timeout, non-2xx,
    /// undecodable body). Transient; a single dispatch never retries
    /// internally.
    #[error("collection transport error: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// Storage backend errors (connection, query, migration failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
