use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Name of the single slot the session snapshot lives in.
pub const SLOT_KEY: &str = "forgeCalculatorData";

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// A single named place to keep one serialized blob.
///
/// Implementations are synchronous and hold at most one value.
pub trait PersistenceSlot: Send {
    /// Current blob, or `None` when nothing has been written.
    fn read(&self) -> Result<Option<String>, SlotError>;

    /// Replaces the blob.
    fn write(
        &mut self,
        blob: &str,
    ) -> Result<(), SlotError>;

    /// Removes the blob. Erasing an empty slot is not an error.
    fn erase(&mut self) -> Result<(), SlotError>;
}

/// In-process slot. Clones share the same storage, so a test can keep a
/// handle while the store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    blob: Arc<Mutex<Option<String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot that already holds `blob`.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Arc::new(Mutex::new(Some(blob.into()))),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, SlotError> {
        self.blob
            .lock()
            .map_err(|e| SlotError::Backend(format!("memory slot poisoned: {e}")))
    }
}

impl PersistenceSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, SlotError> {
        Ok(self.lock()?.clone())
    }

    fn write(
        &mut self,
        blob: &str,
    ) -> Result<(), SlotError> {
        *self.lock()? = Some(blob.to_string());
        Ok(())
    }

    fn erase(&mut self) -> Result<(), SlotError> {
        *self.lock()? = None;
        Ok(())
    }
}
