//! File-backed persistence slot.
//!
//! The session snapshot lives in `<dir>/forgeCalculatorData.json`. Writes go
//! to a temporary file in the same directory which is then renamed over the
//! slot, so a crash mid-write never leaves a half-written snapshot behind.

mod factory;

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use forge_core::storage::{PersistenceSlot, SLOT_KEY, SlotError};

pub use factory::FileSlotFactory;

pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    /// Slot stored in `dir`. The directory is created on first write.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{SLOT_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl PersistenceSlot for FileSlot {
    fn read(&self) -> Result<Option<String>, SlotError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(
        &mut self,
        blob: &str,
    ) -> Result<(), SlotError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.temp_path();
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(blob.as_bytes())?;
        tmp_file.sync_all()?;

        fs::rename(&tmp_path, &self.path)?;
        tracing::trace!(path = %self.path.display(), "slot written");
        Ok(())
    }

    fn erase(&mut self) -> Result<(), SlotError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
