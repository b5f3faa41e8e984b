//! JSON persistence for the ledger.
//!
//! The on-disk shape is a bare JSON object, `{"<item>": <qty>, ...}`, with
//! 2-space indentation and no envelope. `load` never fails observably (every
//! problem degrades to an empty or partially salvaged ledger, with a log);
//! `save` is the one operation that propagates its failure.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::ledger::Ledger;

/// Conventional path for the persisted inventory file.
pub const DEFAULT_INVENTORY_PATH: &str = "inventory.json";

/// Persistence-layer error. Only `save` surfaces it.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The inventory file could not be written.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Load the inventory at `path`, replacing `ledger`'s contents.
///
/// Recovery policy (this function never errors):
/// - missing file: ledger becomes empty, warning logged;
/// - unreadable, invalid JSON, or not a JSON object: ledger becomes empty,
///   error logged;
/// - valid object: entries whose value is an integer >= 0 are kept, the rest
///   are dropped silently (per-entry salvage), count logged at info.
pub fn load(ledger: &mut Ledger, path: impl AsRef<Path>) {
    let path = path.as_ref();

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            *ledger = Ledger::new();
            tracing::warn!(
                "file {} not found, starting with empty inventory",
                path.display()
            );
            return;
        }
        Err(err) => {
            *ledger = Ledger::new();
            tracing::error!("failed to read {} ({err}), starting empty", path.display());
            return;
        }
    };

    let parsed: Value = match serde_json::from_str(&raw) {
        Ok(parsed) => parsed,
        Err(err) => {
            *ledger = Ledger::new();
            tracing::error!("failed to parse {} ({err}), starting empty", path.display());
            return;
        }
    };

    let Value::Object(entries) = parsed else {
        *ledger = Ledger::new();
        tracing::error!(
            "{} does not contain a JSON object, starting empty",
            path.display()
        );
        return;
    };

    // Per-entry salvage: keep non-negative integers, drop everything else
    // (floats, strings, negatives) without failing the load.
    let cleaned: BTreeMap<String, i64> = entries
        .into_iter()
        .filter_map(|(name, value)| match value.as_i64() {
            Some(qty) if qty >= 0 => Some((name, qty)),
            _ => None,
        })
        .collect();

    *ledger = Ledger::from_items(cleaned);
    tracing::info!("loaded {} items from {}", ledger.len(), path.display());
}

/// Serialize `ledger` to `path` as pretty-printed JSON, overwriting any
/// existing file. Write failures are propagated, not recovered.
pub fn save(ledger: &Ledger, path: impl AsRef<Path>) -> Result<(), StoreError> {
    let path = path.as_ref();

    let payload = serde_json::to_string_pretty(ledger.items()).map_err(|err| StoreError::Io {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, err),
    })?;

    fs::write(path, payload).map_err(|err| StoreError::Io {
        path: path.to_path_buf(),
        source: err,
    })?;

    tracing::info!("saved {} items to {}", ledger.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_path(dir: &TempDir, name: &str) -> PathBuf {
        dir.path().join(name)
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().expect("tempdir");
        let path = temp_path(&dir, "inventory.json");

        let mut original = Ledger::new();
        original.add("apple", 7, None).unwrap();
        original.add("pear", 12, None).unwrap();
        save(&original, &path).unwrap();

        let mut reloaded = Ledger::new();
        load(&mut reloaded, &path);
        assert_eq!(reloaded, original);
    }

    #[test]
    fn load_replaces_existing_contents() {
        let dir = TempDir::new().expect("tempdir");
        let path = temp_path(&dir, "inventory.json");
        fs::write(&path, r#"{"banana": 2}"#).unwrap();

        let mut ledger = Ledger::new();
        ledger.add("stale", 99, None).unwrap();
        load(&mut ledger, &path);

        assert_eq!(ledger.get_quantity("banana").unwrap(), 2);
        assert_eq!(ledger.get_quantity("stale").unwrap(), 0);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn load_missing_file_yields_empty_ledger() {
        let dir = TempDir::new().expect("tempdir");

        let mut ledger = Ledger::new();
        ledger.add("stale", 1, None).unwrap();
        load(&mut ledger, temp_path(&dir, "absent.json"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn load_invalid_json_yields_empty_ledger() {
        let dir = TempDir::new().expect("tempdir");
        let path = temp_path(&dir, "inventory.json");
        fs::write(&path, "not json at all {").unwrap();

        let mut ledger = Ledger::new();
        load(&mut ledger, &path);
        assert!(ledger.is_empty());
    }

    #[test]
    fn load_non_object_json_yields_empty_ledger() {
        let dir = TempDir::new().expect("tempdir");
        let path = temp_path(&dir, "inventory.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let mut ledger = Ledger::new();
        load(&mut ledger, &path);
        assert!(ledger.is_empty());
    }

    #[test]
    fn load_salvages_valid_entries_and_drops_the_rest() {
        let dir = TempDir::new().expect("tempdir");
        let path = temp_path(&dir, "inventory.json");
        fs::write(&path, r#"{"a": 1, "b": -1, "c": "x", "d": 2, "e": 1.5}"#).unwrap();

        let mut ledger = Ledger::new();
        load(&mut ledger, &path);

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get_quantity("a").unwrap(), 1);
        assert_eq!(ledger.get_quantity("d").unwrap(), 2);
    }

    #[test]
    fn save_writes_pretty_sorted_json() {
        let dir = TempDir::new().expect("tempdir");
        let path = temp_path(&dir, "inventory.json");

        let mut ledger = Ledger::new();
        ledger.add("pear", 2, None).unwrap();
        ledger.add("apple", 1, None).unwrap();
        save(&ledger, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "{\n  \"apple\": 1,\n  \"pear\": 2\n}");
    }

    #[test]
    fn save_preserves_non_ascii_names_literally() {
        let dir = TempDir::new().expect("tempdir");
        let path = temp_path(&dir, "inventory.json");

        let mut ledger = Ledger::new();
        ledger.add("æble", 3, None).unwrap();
        save(&ledger, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("æble"));
        assert!(!written.contains("\\u"));
    }

    #[test]
    fn save_to_unwritable_path_is_an_io_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("no-such-dir").join("inventory.json");

        let ledger = Ledger::new();
        let err = save(&ledger, &path).unwrap_err();
        let StoreError::Io { path: failed, .. } = err;
        assert_eq!(failed, path);
    }
}
