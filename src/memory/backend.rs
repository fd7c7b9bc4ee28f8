//! Storage slots for the persisted memory array
//!
//! A slot holds one serialized value that is read in full at startup and
//! overwritten in full on every write.
//!
//! ## Implementations
//!
//! - `FileSlot`: `<data_dir>/<slot_name>.json` on the local filesystem.
//!   Writes land in a sibling temp file that is renamed over the slot, so
//!   readers see either the previous array or the new one.
//! - `MemorySlot`: process-local slot for tests and throwaway sessions.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A single named storage location for the serialized journal.
pub trait StorageSlot: Send + Sync {
    /// Read the stored value. `Ok(None)` when nothing has been written yet.
    fn read(&self) -> Result<Option<String>>;

    /// Replace the stored value.
    fn write(&self, value: &str) -> Result<()>;

    /// Remove the stored value entirely.
    fn clear(&self) -> Result<()>;

    /// Human-readable location, used in logs.
    fn describe(&self) -> String;
}

/// File-backed slot
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    /// Slot stored at an explicit file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Slot named `slot_name` inside `data_dir`
    pub fn named(data_dir: &Path, slot_name: &str) -> Self {
        Self::new(data_dir.join(format!("{}.json", slot_name)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StorageSlot for FileSlot {
    fn read(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, value: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.temp_path();
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            Error::Storage(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-process slot. Clones share the same value.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    value: Arc<Mutex<Option<String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-filled with a stored value
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Arc::new(Mutex::new(Some(value.into()))),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.value
            .lock()
            .map_err(|_| Error::Internal("memory slot lock poisoned".to_string()))
    }
}

impl StorageSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.lock()?.clone())
    }

    fn write(&self, value: &str) -> Result<()> {
        *self.lock()? = Some(value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock()? = None;
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory slot".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_slot_missing_reads_none() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::named(dir.path(), "echovault-memories");
        assert!(slot.read().unwrap().is_none());
    }

    #[test]
    fn test_file_slot_write_and_read() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::named(dir.path(), "journal");
        slot.write("[1,2,3]").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("[1,2,3]"));
        assert_eq!(slot.path(), dir.path().join("journal.json"));

        slot.write("[]").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("[]"));
        assert!(!dir.path().join("journal.json.tmp").exists());
    }

    #[test]
    fn test_file_slot_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let slot = FileSlot::named(&nested, "journal");
        slot.write("[]").unwrap();
        assert!(nested.join("journal.json").exists());
    }

    #[test]
    fn test_file_slot_clear() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::named(dir.path(), "journal");
        slot.write("[]").unwrap();
        slot.clear().unwrap();
        assert!(slot.read().unwrap().is_none());
        // Clearing an empty slot is fine
        slot.clear().unwrap();
    }

    #[test]
    fn test_memory_slot_shared_between_clones() {
        let slot = MemorySlot::new();
        let other = slot.clone();
        slot.write("value").unwrap();
        assert_eq!(other.read().unwrap().as_deref(), Some("value"));
        other.clear().unwrap();
        assert!(slot.read().unwrap().is_none());
    }

    #[test]
    fn test_memory_slot_with_value() {
        let slot = MemorySlot::with_value("[]");
        assert_eq!(slot.read().unwrap().as_deref(), Some("[]"));
        assert_eq!(slot.describe(), "in-memory slot");
    }
}
