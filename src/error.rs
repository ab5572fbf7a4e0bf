//! Custom error types for the component tester.
//!
//! This module provides fine-grained error handling for voltage entry
//! validation, profile lookups, guarded mutations, and backing-store access.

use thiserror::Error;

/// Main error type for tester operations.
#[derive(Error, Debug)]
pub enum TesterError {
    /// Voltage entry could not be parsed as a number.
    #[error("Invalid voltage value: '{0}'")]
    InvalidVoltage(String),

    /// Pin count outside the supported set.
    #[error("Invalid pin count {0}. Supported counts: 2, 3, 4, 6, 8")]
    InvalidPinCount(usize),

    /// Blank component name submitted for an operation that needs one.
    #[error("Component name must not be empty")]
    EmptyName,

    /// Test or delete requested for a name with no stored profile.
    #[error("Component '{0}' not found in database")]
    ProfileNotFound(String),

    /// Password mismatch on a guarded overwrite or delete.
    ///
    /// The message is deliberately generic and reveals nothing about
    /// stored state.
    #[error("Incorrect password. Operation cancelled.")]
    IncorrectPassword,

    /// Mutation attempted before any backing file was connected.
    #[error("No active database connected")]
    NoActiveStore,

    /// Reference profile exists but holds no pins; comparison is undefined.
    #[error("Reference profile for '{0}' is empty; nothing to compare against")]
    EmptyReference(String),

    /// Export requested with no recorded results.
    #[error("No results to export")]
    NothingToExport,

    /// Backing database error.
    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Filesystem error (export file, database directory).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file unreadable or unparsable.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for tester operations.
pub type Result<T> = std::result::Result<T, TesterError>;
