// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for Umos.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, typed queries for
//! the channel registry, and the transactional order reconciliation
//! engine.

pub mod database;
pub mod migrations;
pub mod queries;

pub use database::Database;
