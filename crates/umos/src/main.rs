// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Umos - unified marketplace order-management backend.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use umos_config::UmosConfig;

/// Umos - unified marketplace order-management backend.
#[derive(Parser, Debug)]
#[command(name = "umos", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Umos API server.
    Serve,
    /// Run pending database migrations and exit.
    Migrate,
    /// Print the effective configuration with secrets masked.
    Config,
    /// Generate a fresh base64 vault master key.
    Keygen,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Keygen runs before config validation -- generating a master key is
    // how a fresh deployment satisfies it.
    if matches!(cli.command, Some(Commands::Keygen)) {
        match umos_vault::Vault::generate_master_key() {
            Ok(key) => println!("{key}"),
            Err(err) => {
                eprintln!("umos: {err}");
                std::process::exit(1);
            }
        }
        return;
    }

    let config = match umos_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            for err in &errors {
                eprintln!("umos: {err}");
            }
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    let result = match cli.command {
        None | Some(Commands::Serve) => serve::serve(&config).await,
        Some(Commands::Migrate) => serve::migrate(&config).await,
        Some(Commands::Config) => {
            serve::print_config(&config);
            Ok(())
        }
        Some(Commands::Keygen) => return,
    };

    if let Err(err) = result {
        eprintln!("umos: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(config: &UmosConfig) {
    let filter =
        EnvFilter::try_new(&config.log.level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn default_config_parses() {
        let config = umos_config::load_config_from_str("").expect("defaults should parse");
        assert_eq!(config.server.port, 8080);
    }
}
