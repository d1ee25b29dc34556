//! JSON object store backed by a directory.
//!
//! Each object lives in `<dir>/<name>.json`. Writes go to a temporary file
//! first and are renamed into place, so a crash mid-save leaves the previous
//! version intact.

use host_event_system::{DataStore, StoreError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens the store, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| StoreError::DirectoryCreate(dir.clone(), e))?;
            info!("Created data directory: {}", dir.display());
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn object_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", name)))
    }
}

impl DataStore for JsonFileStore {
    fn exists(&self, name: &str) -> bool {
        self.object_path(name).map(|p| p.exists()).unwrap_or(false)
    }

    fn read_object(&self, name: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let path = self.object_path(name)?;
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path).map_err(|e| StoreError::FileRead(path.clone(), e))?;
        let value = serde_json::from_str(&contents)
            .map_err(|e| StoreError::Deserialization(name.to_string(), e))?;
        Ok(Some(value))
    }

    fn write_object(&self, name: &str, value: &serde_json::Value) -> Result<(), StoreError> {
        let path = self.object_path(name)?;
        let temp_path = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(value)
            .map_err(|e| StoreError::Serialization(name.to_string(), e))?;

        fs::write(&temp_path, json).map_err(|e| StoreError::FileWrite(temp_path.clone(), e))?;

        // Atomic rename
        fs::rename(&temp_path, &path).map_err(|e| StoreError::FileRename(temp_path, path.clone(), e))?;

        debug!("Saved {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use host_event_system::DataStoreExt;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn open_creates_nested_directories() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("data").join("plugins");

        let store = JsonFileStore::open(&dir).unwrap();

        assert!(dir.is_dir());
        assert_eq!(store.dir(), dir.as_path());
    }

    #[test]
    fn missing_object_reads_as_none() {
        let root = TempDir::new().unwrap();
        let store = JsonFileStore::open(root.path()).unwrap();

        assert!(!store.exists("RaidAlarm"));
        assert_eq!(store.read_object("RaidAlarm").unwrap(), None);
    }

    #[test]
    fn written_objects_are_readable_and_leave_no_temp_file() {
        let root = TempDir::new().unwrap();
        let store = JsonFileStore::open(root.path()).unwrap();

        store.write_object("RaidAlarm", &json!([1, 2, 3])).unwrap();
        store.write_typed("RaidAlarm", &vec![4u64]).unwrap();

        assert!(store.exists("RaidAlarm"));
        assert_eq!(store.read_object("RaidAlarm").unwrap(), Some(json!([4])));
        assert!(root.path().join("RaidAlarm.json").exists());
        assert!(!root.path().join("RaidAlarm.json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_a_deserialization_error() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("RaidAlarm.json"), "[1, 2,").unwrap();
        let store = JsonFileStore::open(root.path()).unwrap();

        assert!(matches!(
            store.read_object("RaidAlarm"),
            Err(StoreError::Deserialization(name, _)) if name == "RaidAlarm"
        ));
    }

    #[test]
    fn names_cannot_escape_the_directory() {
        let root = TempDir::new().unwrap();
        let store = JsonFileStore::open(root.path()).unwrap();

        for name in ["", "../secrets", ".hidden", "a/b", "a\\b"] {
            assert!(matches!(
                store.write_object(name, &json!({})),
                Err(StoreError::InvalidName(_))
            ));
            assert!(!store.exists(name));
        }
    }
}
