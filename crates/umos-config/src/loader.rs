// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the hierarchy `./umos.toml` > `~/.config/umos/umos.toml` >
//! `/etc/umos/umos.toml` with environment variable overrides via the
//! `UMOS_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::UmosConfig;

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/umos/umos.toml` (system-wide)
/// 3. `~/.config/umos/umos.toml` (user XDG config)
/// 4. `./umos.toml` (local directory)
/// 5. `UMOS_*` environment variables
pub fn load_config() -> Result<UmosConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(UmosConfig::default()))
        .merge(Toml::file("/etc/umos/umos.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("umos/umos.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("umos.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<UmosConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(UmosConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<UmosConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(UmosConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `UMOS_VAULT_MASTER_KEY` must map to
/// `vault.master_key`, not `vault.master.key`.
fn env_provider() -> Env {
    Env::prefixed("UMOS_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: UMOS_VAULT_MASTER_KEY -> "vault_master_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("database_", "database.", 1)
            .replacen("vault_", "vault.", 1)
            .replacen("log_", "log.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_any_config_file() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.path, "umos.db");
        assert_eq!(config.log.level, "info");
        assert!(config.vault.master_key.is_none());
    }

    #[test]
    fn toml_values_override_defaults() {
        let config = load_config_from_str(
            r#"
            [server]
            port = 9000

            [database]
            path = "/var/lib/umos/umos.db"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.path, "/var/lib/umos/umos.db");
        // Untouched sections keep their defaults.
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = load_config_from_str(
            r#"
            [server]
            prot = 9000
            "#,
        );
        assert!(result.is_err(), "typoed key should fail extraction");
    }

    #[test]
    fn env_vars_override_toml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("umos.toml", "[server]\nport = 9000\n")?;
            jail.set_env("UMOS_SERVER_PORT", "9100");
            jail.set_env("UMOS_VAULT_MASTER_KEY", "bm90LWEtcmVhbC1rZXk=");
            let config = load_config().expect("config should load");
            assert_eq!(config.server.port, 9100);
            assert_eq!(
                config.vault.master_key.as_deref(),
                Some("bm90LWEtcmVhbC1rZXk=")
            );
            Ok(())
        });
    }
}
