// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Umos backend.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides via the `UMOS_` prefix.

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::UmosConfig;
pub use validation::validate_config;

use umos_core::UmosError;

/// Load configuration from the standard hierarchy and validate it.
///
/// This is the high-level entry point used by the binary: it merges the
/// file/env layers and runs post-deserialization validation, returning
/// either a usable config or every collected error.
pub fn load_and_validate() -> Result<UmosConfig, Vec<UmosError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(err
            .into_iter()
            .map(|e| UmosError::Config(e.to_string()))
            .collect()),
    }
}
