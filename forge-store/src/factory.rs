use std::path::PathBuf;

use forge_core::storage::{PersistenceSlot, SlotConfig, SlotError, SlotFactory};

use crate::FileSlot;

/// Resolve the directory the slot file lives in.
///
/// Resolution order:
/// 1. **`config.location`**, when non-empty.
/// 2. **`FORGE_STATE_DIR`**, when set.
/// 3. **`.`**, the current working directory.
fn state_dir(config: &SlotConfig) -> PathBuf {
    if !config.location.trim().is_empty() {
        return PathBuf::from(config.location.trim());
    }
    if let Ok(dir) = std::env::var("FORGE_STATE_DIR") {
        return PathBuf::from(dir);
    }
    PathBuf::from(".")
}

/// [`SlotFactory`] for [`FileSlot`].
///
/// Register this with a [`forge_core::storage::SlotRegistry`] to make the
/// `"file"` backend available:
///
/// ```rust
/// use forge_core::storage::SlotRegistry;
/// use forge_store::FileSlotFactory;
///
/// let mut registry = SlotRegistry::new();
/// registry.register(Box::new(FileSlotFactory));
/// assert_eq!(registry.available_backends(), vec!["file", "memory"]);
/// ```
pub struct FileSlotFactory;

impl SlotFactory for FileSlotFactory {
    fn backend_name(&self) -> &'static str {
        "file"
    }

    /// Open the slot in the directory resolved by [`state_dir`].
    ///
    /// Fails when the resolved path exists but is not a directory; a
    /// missing directory is created on first save.
    fn create(
        &self,
        config: &SlotConfig,
    ) -> Result<Box<dyn PersistenceSlot>, SlotError> {
        let dir = state_dir(config);
        if dir.exists() && !dir.is_dir() {
            return Err(SlotError::Configuration(format!(
                "state location '{}' is not a directory",
                dir.display()
            )));
        }
        let slot = FileSlot::in_dir(&dir);
        tracing::info!(path = %slot.path().display(), "using file slot");
        Ok(Box::new(slot))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn backend_name_is_file() {
        assert_eq!(FileSlotFactory.backend_name(), "file");
    }

    #[test]
    fn explicit_location_wins() {
        let config = SlotConfig {
            backend: "file".to_string(),
            location: "  /tmp/forge-state ".to_string(),
        };

        assert_eq!(state_dir(&config), PathBuf::from("/tmp/forge-state"));
    }

    #[test]
    fn rejects_file_as_location() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = SlotConfig {
            backend: "file".to_string(),
            location: file.path().display().to_string(),
        };

        match FileSlotFactory.create(&config) {
            Err(SlotError::Configuration(msg)) => assert!(msg.contains("not a directory")),
            Err(other) => panic!("expected Configuration error, got {other:?}"),
            Ok(_) => panic!("expected Configuration error, got a slot"),
        }
    }
}
