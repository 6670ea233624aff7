// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes. Key *format* checking (base64, length) belongs to the vault,
//! which owns the cipher's constraints; presence is checked here so a
//! missing key fails before any component construction.

use umos_core::UmosError;

use crate::model::UmosConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects all violations instead of failing fast, so an operator sees
/// every problem in one run.
pub fn validate_config(config: &UmosConfig) -> Result<(), Vec<UmosError>> {
    let mut errors = Vec::new();

    if config.server.host.trim().is_empty() {
        errors.push(UmosError::Config(
            "server.host must not be empty".to_string(),
        ));
    }

    if config.server.port == 0 {
        errors.push(UmosError::Config(
            "server.port must be non-zero".to_string(),
        ));
    }

    if config.database.path.trim().is_empty() {
        errors.push(UmosError::Config(
            "database.path must not be empty".to_string(),
        ));
    }

    match &config.vault.master_key {
        None => errors.push(UmosError::Config(
            "vault.master_key is required (set UMOS_VAULT_MASTER_KEY)".to_string(),
        )),
        Some(key) if key.trim().is_empty() => errors.push(UmosError::Config(
            "vault.master_key must not be empty".to_string(),
        )),
        Some(_) => {}
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    #[test]
    fn default_config_fails_only_on_missing_master_key() {
        let config = load_config_from_str("").unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("vault.master_key"));
    }

    #[test]
    fn config_with_master_key_validates() {
        let config = load_config_from_str(
            r#"
            [vault]
            master_key = "c2VjcmV0LXNlY3JldC1zZWNyZXQtc2VjcmV0ISE="
            "#,
        )
        .unwrap();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn all_violations_are_collected() {
        let config = load_config_from_str(
            r#"
            [server]
            host = ""
            port = 0

            [database]
            path = ""
            "#,
        )
        .unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
