//! Tester workflow: orchestration of operator actions against the store.
//!
//! Owns the configuration, the profile store, and the result log, and exposes
//! one method per operator action (save, test, delete, suggest, load, export,
//! switch database). The store is never touched from anywhere else.

use std::path::{Path, PathBuf};

use crate::config::TesterConfig;
use crate::error::{Result, TesterError};
use crate::storage::{PinReading, Profile, ProfileStore};
use crate::tester::compare::{TestReport, compare_pins};
use crate::tester::results::{ResultLog, ResultRow};
use crate::utils::parsing::{round_voltage, validate_pin_count};

/// Stateful front end for a test bench session.
///
/// All tunables come from the [`TesterConfig`] handed in at construction;
/// nothing is read from ambient globals.
#[derive(Debug)]
pub struct TesterWorkflow {
    config: TesterConfig,
    store: ProfileStore,
    results: ResultLog,
}

impl TesterWorkflow {
    /// Create a workflow connected to the configured default backing file,
    /// creating it on first run.
    pub fn new(config: TesterConfig) -> Result<Self> {
        let default_db = config.default_database_path();
        Self::open(config, &default_db)
    }

    /// Create a workflow connected to an explicit backing file.
    pub fn open(config: TesterConfig, database: &Path) -> Result<Self> {
        let mut store = ProfileStore::new();
        store.connect(database)?;
        Ok(Self {
            config,
            store,
            results: ResultLog::new(),
        })
    }

    pub fn config(&self) -> &TesterConfig {
        &self.config
    }

    /// Path of the backing file all operations currently address.
    pub fn active_database(&self) -> Option<&Path> {
        self.store.active_path()
    }

    /// Every backing file opened this session, active or dormant.
    pub fn known_databases(&self) -> Vec<&Path> {
        self.store.known_paths()
    }

    /// Recorded result rows awaiting export.
    pub fn results(&self) -> &[ResultRow] {
        self.results.rows()
    }

    // =========================================================================
    // Database Switching
    // =========================================================================

    /// Open (or create) another backing file and make it active.
    ///
    /// The previous file stays open; profiles read from now on come from the
    /// new file only.
    pub fn switch_database(&mut self, path: &Path) -> Result<PathBuf> {
        Ok(self.store.connect(path)?.to_path_buf())
    }

    // =========================================================================
    // Profile Actions
    // =========================================================================

    /// Whether a reference profile is stored under `name`.
    pub fn profile_exists(&self, name: &str) -> Result<bool> {
        Ok(!self.store.get_profile(name.trim())?.is_empty())
    }

    /// Save `voltages` as the healthy reference for `name`.
    ///
    /// A brand-new name saves without any password. Overwriting an existing
    /// profile requires the configured password; on mismatch nothing is
    /// written and the error reveals nothing about stored state.
    ///
    /// Returns `true` when an existing profile was replaced.
    pub fn save_profile(
        &mut self,
        name: &str,
        voltages: &[f64],
        password: Option<&str>,
    ) -> Result<bool> {
        let name = trimmed_name(name)?;
        validate_pin_count(voltages.len())?;

        let replacing = !self.store.get_profile(name)?.is_empty();
        if replacing && password != Some(self.config.password.as_str()) {
            return Err(TesterError::IncorrectPassword);
        }

        // Entries are rounded to 2 decimals before anything is stored.
        let voltages: Vec<f64> = voltages.iter().copied().map(round_voltage).collect();
        self.store.upsert_profile(name, &voltages)?;
        Ok(replacing)
    }

    /// Compare entered voltages against the stored reference for `name`.
    ///
    /// Every compared pin is appended to the result log. The report carries
    /// the per-pin outcomes, match percentage, and verdict.
    pub fn test_profile(&mut self, name: &str, entered: &[f64]) -> Result<TestReport> {
        let name = trimmed_name(name)?;
        validate_pin_count(entered.len())?;

        let reference = self.store.get_profile(name)?;
        if reference.is_empty() {
            return Err(TesterError::ProfileNotFound(name.to_string()));
        }

        // The tolerance comparison runs on 2-decimal rounded values.
        let entered: Vec<f64> = entered.iter().copied().map(round_voltage).collect();
        let report = compare_pins(name, &reference, &entered, self.config.tolerance_volts)?;
        for comparison in &report.comparisons {
            self.results.append(ResultRow {
                name: name.to_string(),
                pin: comparison.pin,
                input: comparison.entered,
                expected: comparison.expected,
                status: comparison.status(),
            });
        }

        Ok(report)
    }

    /// Delete the stored profile for `name`, guarded by the password.
    pub fn delete_profile(&mut self, name: &str, password: Option<&str>) -> Result<()> {
        let name = trimmed_name(name)?;

        if self.store.get_profile(name)?.is_empty() {
            return Err(TesterError::ProfileNotFound(name.to_string()));
        }
        if password != Some(self.config.password.as_str()) {
            return Err(TesterError::IncorrectPassword);
        }

        self.store.delete_profile(name)
    }

    // =========================================================================
    // Autocomplete
    // =========================================================================

    /// Name suggestions for the current entry text.
    ///
    /// Blank input produces no suggestions; otherwise every stored name
    /// starting with the (case-sensitive) prefix, sorted and deduplicated.
    pub fn suggest(&self, prefix: &str) -> Result<Vec<String>> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Ok(Vec::new());
        }
        self.store.search_names(prefix)
    }

    /// Load the full stored pin set for a selected suggestion.
    ///
    /// The caller adjusts its pin count to [`Profile::pin_count`].
    pub fn load_profile(&self, name: &str) -> Result<Profile> {
        let name = trimmed_name(name)?;

        let pins: Vec<PinReading> = self.store.get_profile(name)?;
        if pins.is_empty() {
            return Err(TesterError::ProfileNotFound(name.to_string()));
        }

        Ok(Profile {
            name: name.to_string(),
            pins,
        })
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Export recorded results to a text file and clear the log.
    pub fn export_results(&mut self, path: &Path) -> Result<usize> {
        self.results.export(path)
    }
}

fn trimmed_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TesterError::EmptyName);
    }
    Ok(name)
}

// =============================================================================
// Tests
// =============================================================================
