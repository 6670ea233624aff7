// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin HTTP gateway for Umos.
//!
//! Exposes channel CRUD and the collection trigger endpoints over axum,
//! translating the domain error taxonomy into HTTP status codes at one
//! choke point ([`error::ApiError`]).

pub mod error;
pub mod handlers;
pub mod server;

pub use server::{AppState, ServerConfig, router, start_server};
