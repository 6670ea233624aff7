// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM credential vault for Umos channel secrets.
//!
//! Encrypts marketplace API keys and secrets at rest under one
//! process-wide key supplied by deployment configuration. Each encrypt
//! call uses a fresh random nonce; ciphertext travels as a single base64
//! string suitable for a TEXT column.

pub mod crypto;
pub mod vault;

pub use vault::{Vault, mask_secret};
