// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collector dispatch and collection services for Umos.
//!
//! This crate is the choke point between the channel registry and the
//! provider adapters: the [`Dispatcher`] enforces "only active channels,
//! only registered provider types, only successfully decrypted
//! credentials", and the services on top of it drive product collection,
//! order collection with reconciliation, and channel administration.

pub mod channels;
pub mod dispatcher;
pub mod orders;
pub mod products;
pub mod registry;

pub use channels::{ChannelService, CreateChannel, UpdateChannel};
pub use dispatcher::{Dispatcher, ResolvedChannel};
pub use orders::OrderService;
pub use products::ProductService;
pub use registry::{CollectorFactory, CollectorRegistry};
