// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Umos order-management backend.
//!
//! This crate provides the error taxonomy, the shared domain types, and the
//! [`Collector`] trait that every marketplace provider adapter implements.
//! Adapter crates and the dispatcher depend on this crate only; nothing
//! here touches the network or the database.

pub mod collector;
pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use collector::Collector;
pub use error::UmosError;
pub use types::{
    ChannelConfig, NormalizedOrder, NormalizedOrderItem, NormalizedProduct, Order, OrderItem,
    ProviderType,
};
