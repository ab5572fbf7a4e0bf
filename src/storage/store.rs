//! SQLite-backed profile store.
//!
//! Owns every backing file opened during a session and the single handle that
//! is currently active. Switching the active file never closes the previous
//! connections; they stay open and addressable until the store is dropped.

use rusqlite::{Connection, params};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, TesterError};
use crate::storage::types::PinReading;

/// Schema for the profile table. A backing file is portable: any SQLite file
/// carrying this table can be opened and its profiles used as-is.
const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS components (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        pin INTEGER,
        voltage REAL
    )
";

/// Store of named pin-voltage profiles across one or more backing files.
///
/// All operations address the active file. Reads and deletes are lenient when
/// no file is active (empty result / no-op); only [`upsert_profile`] demands
/// an active connection.
///
/// [`upsert_profile`]: ProfileStore::upsert_profile
#[derive(Debug, Default)]
pub struct ProfileStore {
    connections: HashMap<PathBuf, Connection>,
    active: Option<PathBuf>,
}

impl ProfileStore {
    /// Create a store with no backing file connected.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Connection Management
    // =========================================================================

    /// Open a backing file (creating it if absent), ensure the profile table
    /// exists, and make it the active file.
    ///
    /// Previously opened files remain open but dormant. Reconnecting to an
    /// already-known path just switches back to it.
    pub fn connect(&mut self, path: &Path) -> Result<&Path> {
        let path = path.to_path_buf();

        if !self.connections.contains_key(&path) {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let conn = Connection::open(&path)?;
            conn.execute(CREATE_TABLE, [])?;
            self.connections.insert(path.clone(), conn);
        }

        self.active = Some(path);
        Ok(self.active.as_deref().unwrap())
    }

    /// Path of the currently active backing file, if any.
    pub fn active_path(&self) -> Option<&Path> {
        self.active.as_deref()
    }

    /// Every backing file opened during this session, active or dormant.
    pub fn known_paths(&self) -> Vec<&Path> {
        self.connections.keys().map(PathBuf::as_path).collect()
    }

    fn active_conn(&self) -> Option<&Connection> {
        self.active.as_ref().and_then(|p| self.connections.get(p))
    }

    // =========================================================================
    // Profile CRUD
    // =========================================================================

    /// Replace the stored profile for `name` with `voltages`.
    ///
    /// Pins are assigned 1-based positions in entry order. The delete of the
    /// old rows and the insert of the new ones run in a single transaction,
    /// so a mid-failure rolls back to the previous pin set.
    pub fn upsert_profile(&mut self, name: &str, voltages: &[f64]) -> Result<()> {
        let active = self.active.as_ref().ok_or(TesterError::NoActiveStore)?;
        let conn = self
            .connections
            .get_mut(active)
            .ok_or(TesterError::NoActiveStore)?;

        let tx = conn.transaction()?;
        tx.execute("DELETE FROM components WHERE name = ?1", params![name])?;
        for (i, voltage) in voltages.iter().enumerate() {
            tx.execute(
                "INSERT INTO components (name, pin, voltage) VALUES (?1, ?2, ?3)",
                params![name, (i + 1) as u32, voltage],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Fetch the profile stored under `name`, ordered by pin ascending.
    ///
    /// Returns an empty list when the name is unknown or no file is active.
    pub fn get_profile(&self, name: &str) -> Result<Vec<PinReading>> {
        let Some(conn) = self.active_conn() else {
            return Ok(Vec::new());
        };

        let mut stmt = conn
            .prepare("SELECT pin, voltage FROM components WHERE name = ?1 ORDER BY pin")?;
        let rows = stmt.query_map(params![name], |row| {
            Ok(PinReading {
                pin: row.get(0)?,
                voltage: row.get(1)?,
            })
        })?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(TesterError::from)
    }

    /// Distinct stored names starting with `prefix`, sorted.
    ///
    /// The match is case-sensitive. `substr` sidesteps LIKE's ASCII case
    /// folding and its `%`/`_` wildcard escaping.
    pub fn search_names(&self, prefix: &str) -> Result<Vec<String>> {
        let Some(conn) = self.active_conn() else {
            return Ok(Vec::new());
        };

        let mut stmt = conn.prepare(
            "SELECT DISTINCT name FROM components WHERE substr(name, 1, ?1) = ?2 ORDER BY name",
        )?;
        let rows = stmt.query_map(
            params![prefix.chars().count() as i64, prefix],
            |row| row.get::<_, String>(0),
        )?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(TesterError::from)
    }

    /// Remove every row stored under `name`. No-op when the name is absent
    /// or no file is active.
    pub fn delete_profile(&mut self, name: &str) -> Result<()> {
        let Some(active) = self.active.as_ref() else {
            return Ok(());
        };
        if let Some(conn) = self.connections.get(active) {
            conn.execute("DELETE FROM components WHERE name = ?1", params![name])?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_store(dir: &tempfile::TempDir, file: &str) -> ProfileStore {
        let mut store = ProfileStore::new();
        store.connect(&dir.path().join(file)).unwrap();
        store
    }

    #[test]
    fn test_connect_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bench.db");
        let mut store = ProfileStore::new();
        store.connect(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.active_path(), Some(path.as_path()));
    }

    #[test]
    fn test_upsert_and_get_ordered() {
        let dir = tempdir().unwrap();
        let mut store = open_store(&dir, "bench.db");

        store.upsert_profile("LM358", &[5.0, 0.7, 3.3, 0.0]).unwrap();
        let pins = store.get_profile("LM358").unwrap();

        assert_eq!(pins.len(), 4);
        for (i, reading) in pins.iter().enumerate() {
            assert_eq!(reading.pin, (i + 1) as u32);
        }
        assert_eq!(pins[0].voltage, 5.0);
        assert_eq!(pins[3].voltage, 0.0);
    }

    #[test]
    fn test_upsert_replaces_full_pin_set() {
        let dir = tempdir().unwrap();
        let mut store = open_store(&dir, "bench.db");

        store
            .upsert_profile("NE555", &[5.0, 1.6, 1.6, 0.0, 3.3, 5.0, 0.0, 5.0])
            .unwrap();
        store.upsert_profile("NE555", &[5.0, 0.0]).unwrap();

        let pins = store.get_profile("NE555").unwrap();
        assert_eq!(pins.len(), 2);
        assert!(pins.iter().all(|r| r.pin <= 2)); // no stale rows from the 8-pin save
    }

    #[test]
    fn test_get_missing_profile_is_empty() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir, "bench.db");
        assert!(store.get_profile("BC547").unwrap().is_empty());
    }

    #[test]
    fn test_no_active_store_is_lenient_for_reads_and_delete() {
        let mut store = ProfileStore::new();
        assert!(store.get_profile("LM358").unwrap().is_empty());
        assert!(store.search_names("LM").unwrap().is_empty());
        store.delete_profile("LM358").unwrap(); // no-op, not an error
    }

    #[test]
    fn test_upsert_without_store_errors() {
        let mut store = ProfileStore::new();
        let err = store.upsert_profile("LM358", &[5.0, 0.0]).unwrap_err();
        assert!(matches!(err, TesterError::NoActiveStore));
    }

    #[test]
    fn test_search_is_prefix_only_and_case_sensitive() {
        let dir = tempdir().unwrap();
        let mut store = open_store(&dir, "bench.db");

        store.upsert_profile("REL-12V", &[12.0, 0.0]).unwrap();
        store.upsert_profile("REG-7805", &[9.0, 0.0, 5.0]).unwrap();
        store.upsert_profile("relay-5v", &[5.0, 0.0]).unwrap();
        store.upsert_profile("LM7805", &[9.0, 0.0, 5.0]).unwrap();

        let names = store.search_names("RE").unwrap();
        assert_eq!(names, vec!["REG-7805".to_string(), "REL-12V".to_string()]);
    }

    #[test]
    fn test_search_deduplicates_names() {
        let dir = tempdir().unwrap();
        let mut store = open_store(&dir, "bench.db");

        store.upsert_profile("REL-12V", &[12.0, 0.0]).unwrap();
        store.upsert_profile("REL-12V", &[12.0, 0.1]).unwrap();

        assert_eq!(store.search_names("R").unwrap().len(), 1);
    }

    #[test]
    fn test_delete_removes_profile() {
        let dir = tempdir().unwrap();
        let mut store = open_store(&dir, "bench.db");

        store.upsert_profile("BC547", &[0.0, 0.7, 5.0]).unwrap();
        store.delete_profile("BC547").unwrap();
        assert!(store.get_profile("BC547").unwrap().is_empty());

        // Deleting again is a no-op.
        store.delete_profile("BC547").unwrap();
    }

    #[test]
    fn test_switching_files_isolates_profiles() {
        let dir = tempdir().unwrap();
        let mut store = ProfileStore::new();

        let bench_a = dir.path().join("a.db");
        let bench_b = dir.path().join("b.db");

        store.connect(&bench_a).unwrap();
        store.upsert_profile("LM358", &[5.0, 0.7]).unwrap();

        store.connect(&bench_b).unwrap();
        assert!(store.get_profile("LM358").unwrap().is_empty());
        assert_eq!(store.known_paths().len(), 2);

        // Switching back reads the original data; the first file stayed open.
        store.connect(&bench_a).unwrap();
        assert_eq!(store.get_profile("LM358").unwrap().len(), 2);
    }
}
