use std::collections::HashMap;

use serde::Deserialize;

use super::slot::{MemorySlot, PersistenceSlot, SlotError};

/// Backend-agnostic slot configuration.
///
/// `backend` must match the [`SlotFactory::backend_name`] of a registered
/// factory. `location` is passed through to that factory unchanged; its
/// meaning is entirely backend-specific.
///
/// | backend  | location examples              |
/// |----------|--------------------------------|
/// | `memory` | ignored                        |
/// | `file`   | `~/.forge`, `./state`          |
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SlotConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"file"`).
    pub backend: String,
    /// Opaque value forwarded to the factory's `create` method.
    pub location: String,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            location: String::new(),
        }
    }
}

/// One implementation per storage backend, registered with a
/// [`SlotRegistry`] at startup.
pub trait SlotFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Open (or create) the slot described by `config`.
    fn create(
        &self,
        config: &SlotConfig,
    ) -> Result<Box<dyn PersistenceSlot>, SlotError>;
}

/// Factory for [`MemorySlot`]. Ignores `location`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemorySlotFactory;

impl SlotFactory for MemorySlotFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn create(
        &self,
        _config: &SlotConfig,
    ) -> Result<Box<dyn PersistenceSlot>, SlotError> {
        Ok(Box::new(MemorySlot::new()))
    }
}

/// Registry of [`SlotFactory`] instances, keyed by backend name.
///
/// Typical lifetime:
/// 1. Create with `SlotRegistry::new()` (the `memory` backend is built in).
/// 2. Call `register` once per additional backend.
/// 3. Call `create` with the configured [`SlotConfig`].
pub struct SlotRegistry {
    factories: HashMap<&'static str, Box<dyn SlotFactory>>,
}

impl SlotRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register(Box::new(MemorySlotFactory));
        registry
    }

    /// Register a backend factory, replacing any with the same name.
    pub fn register(
        &mut self,
        factory: Box<dyn SlotFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory that matches `config.backend`.
    ///
    /// # Errors
    /// * [`SlotError::Configuration`] when no factory is registered for the
    ///   requested backend name.
    /// * Any error the chosen factory itself returns.
    pub fn create(
        &self,
        config: &SlotConfig,
    ) -> Result<Box<dyn PersistenceSlot>, SlotError> {
        let factory = self.factories.get(config.backend.as_str()).ok_or_else(|| {
            SlotError::Configuration(format!(
                "unknown backend '{}'; available: {:?}",
                config.backend,
                self.available_backends()
            ))
        })?;

        tracing::debug!(backend = factory.backend_name(), location = %config.location, "opening persistence slot");
        factory.create(config)
    }
}

impl Default for SlotRegistry {
    fn default() -> Self {
        Self::new()
    }
}
