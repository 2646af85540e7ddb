//! JSON snapshot persistence for [`MemoryStore`] datasets. Writes go through
//! a temporary file and an atomic rename so a crash never leaves a truncated
//! snapshot behind.

use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::memory::{Dataset, MemoryStore};
use super::StoreError;

const DEFAULT_DIR_NAME: &str = ".finance_core";
const DATA_FILE: &str = "data.json";
const TMP_SUFFIX: &str = "tmp";

/// Application data directory, defaulting to `~/.finance_core` and
/// overridable through `FINANCE_CORE_HOME`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("FINANCE_CORE_HOME") {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Canonical path of the managed dataset snapshot.
pub fn default_data_file() -> PathBuf {
    app_data_dir().join(DATA_FILE)
}

/// Persists the store's dataset to `path` as pretty-printed JSON.
pub fn save_to_path(store: &MemoryStore, path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&store.snapshot())?;
    write_atomic(path, &json)
}

/// Loads a dataset snapshot from `path`. A missing file yields an empty
/// store so first launch needs no setup step.
pub fn load_from_path(path: &Path) -> Result<MemoryStore, StoreError> {
    if !path.exists() {
        return Ok(MemoryStore::new());
    }
    let data = fs::read_to_string(path)?;
    let dataset: Dataset = serde_json::from_str(&data)?;
    Ok(MemoryStore::from_dataset(dataset))
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), StoreError> {
    let tmp_path = path.with_extension(TMP_SUFFIX);
    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Balances;
    use crate::store::Store;
    use uuid::Uuid;

    #[test]
    fn roundtrips_a_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        store
            .put_balances(&Balances::with_amounts(user, 120.0, 45.5))
            .unwrap();
        save_to_path(&store, &path).expect("save snapshot");

        let restored = load_from_path(&path).expect("load snapshot");
        let balances = restored.balances(user).unwrap().expect("user present");
        assert_eq!(balances.current, 120.0);
        assert_eq!(balances.savings, 45.5);
    }

    #[test]
    fn missing_file_loads_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = load_from_path(&dir.path().join("absent.json")).expect("empty store");
        assert!(store.balances(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        save_to_path(&MemoryStore::new(), &path).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension(TMP_SUFFIX).exists());
    }
}
