// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup wiring: vault first (fail fast on a malformed key), then the
//! database with migrations, then the gateway.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::info;

use umos_collector::CollectorRegistry;
use umos_config::UmosConfig;
use umos_core::UmosError;
use umos_gateway::{AppState, ServerConfig};
use umos_storage::Database;
use umos_vault::Vault;

/// Runs the API server until the process exits.
pub async fn serve(config: &UmosConfig) -> Result<(), UmosError> {
    let vault = Arc::new(build_vault(config)?);
    let db = Arc::new(Database::open(&config.database.path).await?);
    let state = AppState::new(db, vault, CollectorRegistry::with_defaults());

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    info!(
        host = %server_config.host,
        port = server_config.port,
        database = %config.database.path,
        "starting umos"
    );
    umos_gateway::start_server(&server_config, state).await
}

/// Applies pending migrations and exits.
pub async fn migrate(config: &UmosConfig) -> Result<(), UmosError> {
    let db = Database::open(&config.database.path).await?;
    db.close().await?;
    info!(database = %config.database.path, "migrations applied");
    Ok(())
}

/// Prints the effective merged configuration with secrets masked.
pub fn print_config(config: &UmosConfig) {
    let mut masked = config.clone();
    if let Some(key) = &masked.vault.master_key {
        masked.vault.master_key = Some(umos_vault::mask_secret(key));
    }
    match toml::to_string_pretty(&masked) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => eprintln!("umos: failed to render config: {err}"),
    }
}

/// Vault construction is deliberately the first startup step: a malformed
/// master key must abort boot, not surface on the first dispatch.
fn build_vault(config: &UmosConfig) -> Result<Vault, UmosError> {
    let master_key = config
        .vault
        .master_key
        .clone()
        .ok_or_else(|| UmosError::Config("vault.master_key is required".to_string()))?;
    Vault::new(&SecretString::from(master_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_master_key_fails_at_startup() {
        let config = umos_config::load_config_from_str(
            r#"
            [vault]
            master_key = "definitely not base64 !!"
            "#,
        )
        .unwrap();
        assert!(matches!(
            build_vault(&config),
            Err(UmosError::Config(_))
        ));
    }

    #[test]
    fn valid_master_key_builds_the_vault() {
        let key = Vault::generate_master_key().unwrap();
        let config = umos_config::load_config_from_str(&format!(
            "[vault]\nmaster_key = \"{key}\"\n"
        ))
        .unwrap();
        assert!(build_vault(&config).is_ok());
    }
}
