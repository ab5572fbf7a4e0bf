//! Append-only result log and text export.
//!
//! Every compared pin produces one row. Export writes the rows out and clears
//! the log; stored profiles are untouched.

use std::io::Write;
use std::path::Path;

use crate::error::{Result, TesterError};

/// One recorded test-result row.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub name: String,
    pub pin: u32,
    /// Measured voltage as entered.
    pub input: f64,
    /// Reference voltage it was compared against.
    pub expected: f64,
    /// "OK" or "Fail".
    pub status: &'static str,
}

impl ResultRow {
    /// Render the row as one export line, fields comma-space joined.
    fn to_line(&self) -> String {
        format!(
            "{}, {}, {}, {}, {}",
            self.name, self.pin, self.input, self.expected, self.status
        )
    }
}

/// In-memory sequence of result rows in insertion order.
#[derive(Debug, Default)]
pub struct ResultLog {
    rows: Vec<ResultRow>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one row.
    pub fn append(&mut self, row: ResultRow) {
        self.rows.push(row);
    }

    /// All recorded rows, oldest first.
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Write every row to `path` as plain text, one line per row, then clear
    /// the log.
    ///
    /// # Errors
    /// [`TesterError::NothingToExport`] when the log is empty; no file is
    /// written in that case.
    ///
    /// # Returns
    /// The number of rows written.
    pub fn export(&mut self, path: &Path) -> Result<usize> {
        if self.rows.is_empty() {
            return Err(TesterError::NothingToExport);
        }

        let mut file = std::fs::File::create(path)?;
        for row in &self.rows {
            writeln!(file, "{}", row.to_line())?;
        }

        let written = self.rows.len();
        self.rows.clear();
        Ok(written)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn row(name: &str, pin: u32, input: f64, expected: f64, status: &'static str) -> ResultRow {
        ResultRow {
            name: name.to_string(),
            pin,
            input,
            expected,
            status,
        }
    }

    #[test]
    fn test_export_writes_rows_in_insertion_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.txt");

        let mut log = ResultLog::new();
        log.append(row("LM358", 1, 5.0, 5.0, "OK"));
        log.append(row("LM358", 2, 0.9, 0.7, "Fail"));

        let written = log.export(&path).unwrap();
        assert_eq!(written, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "LM358, 1, 5, 5, OK\nLM358, 2, 0.9, 0.7, Fail\n");
    }

    #[test]
    fn test_export_clears_the_log() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.txt");

        let mut log = ResultLog::new();
        log.append(row("BC547", 1, 0.7, 0.7, "OK"));
        log.export(&path).unwrap();

        assert!(log.is_empty());
        // Second export finds nothing.
        assert!(matches!(
            log.export(&path).unwrap_err(),
            TesterError::NothingToExport
        ));
    }

    #[test]
    fn test_empty_export_writes_no_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.txt");

        let mut log = ResultLog::new();
        assert!(matches!(
            log.export(&path).unwrap_err(),
            TesterError::NothingToExport
        ));
        assert!(!path.exists());
    }
}
