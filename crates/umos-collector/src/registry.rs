// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider registry: a mapping from provider-type tag to a collector
//! constructor.
//!
//! The registry is open. The three in-tree providers are pre-registered by
//! [`CollectorRegistry::with_defaults`]; deployments (and tests) can
//! register additional tags without touching core.

use std::collections::HashMap;
use std::sync::Arc;

use umos_core::{Collector, ProviderType, UmosError};

/// Constructs a collector from `(channel_id, api_key, api_secret)`.
/// Credentials arrive already decrypted; a factory never sees ciphertext.
pub type CollectorFactory =
    fn(channel_id: i64, api_key: String, api_secret: String) -> Result<Arc<dyn Collector>, UmosError>;

/// Registry of collector constructors keyed by provider tag.
#[derive(Clone, Default)]
pub struct CollectorRegistry {
    factories: HashMap<String, CollectorFactory>,
}

impl CollectorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every in-tree provider registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ProviderType::Coupang.to_string(), coupang_factory);
        registry.register(ProviderType::Smartstore.to_string(), smartstore_factory);
        registry.register(ProviderType::Mock.to_string(), mock_factory);
        registry
    }

    /// Registers (or replaces) the factory for a provider tag.
    pub fn register(&mut self, tag: impl Into<String>, factory: CollectorFactory) {
        self.factories.insert(tag.into(), factory);
    }

    /// Looks up the factory for a provider tag.
    pub fn get(&self, tag: &str) -> Option<CollectorFactory> {
        self.factories.get(tag).copied()
    }

    /// Registered provider tags, for diagnostics.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

fn coupang_factory(
    channel_id: i64,
    api_key: String,
    api_secret: String,
) -> Result<Arc<dyn Collector>, UmosError> {
    Ok(Arc::new(umos_coupang::CoupangCollector::new(
        channel_id, api_key, api_secret,
    )?))
}

fn smartstore_factory(
    channel_id: i64,
    api_key: String,
    api_secret: String,
) -> Result<Arc<dyn Collector>, UmosError> {
    Ok(Arc::new(umos_smartstore::SmartstoreCollector::new(
        channel_id, api_key, api_secret,
    )?))
}

fn mock_factory(
    channel_id: i64,
    api_key: String,
    api_secret: String,
) -> Result<Arc<dyn Collector>, UmosError> {
    Ok(Arc::new(umos_mock::MockCollector::new(
        channel_id, api_key, api_secret,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_all_in_tree_providers() {
        let registry = CollectorRegistry::with_defaults();
        for tag in ["coupang", "smartstore", "mock"] {
            assert!(registry.get(tag).is_some(), "missing default for {tag}");
        }
        assert!(registry.get("gmarket").is_none());
    }

    #[test]
    fn custom_tags_can_be_registered() {
        let mut registry = CollectorRegistry::with_defaults();
        registry.register("inhouse", mock_factory);
        assert!(registry.get("inhouse").is_some());
        assert_eq!(registry.tags().count(), 4);
    }
}
