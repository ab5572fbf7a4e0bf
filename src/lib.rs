//! Voltsig Library
//!
//! Records "known-healthy" pin voltage signatures for electronic components
//! and compares freshly measured voltages against the stored reference to
//! flag likely faulty parts.
//!
//! # Features
//!
//! - Named voltage profiles in swappable SQLite backing files
//! - Fixed-tolerance comparison with a health verdict and mismatch report
//! - Password-gated overwrite and delete
//! - Prefix search over stored names (autocomplete backing query)
//! - Append-only result log with plain-text export
//!
//! # Example
//!
//! ```no_run
//! use voltsig::config::TesterConfig;
//! use voltsig::tester::TesterWorkflow;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TesterConfig::default();
//!     let mut bench = TesterWorkflow::open(config, "bench.db".as_ref())?;
//!
//!     // Record the reference signature once, from a known-good part
//!     bench.save_profile("LM358", &[5.0, 0.7, 3.3, 0.0], None)?;
//!
//!     // Later: test a suspect part
//!     let report = bench.test_profile("LM358", &[5.0, 0.9, 3.3, 0.0])?;
//!     println!("Match: {:.0}% ({})", report.match_percentage(), report.verdict());
//!     for pin in report.mismatches() {
//!         println!("Pin {}: expected {}V, got {}V", pin.pin, pin.expected, pin.entered);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod storage;
pub mod tester;
pub mod utils;

// Re-exports for convenience
pub use config::TesterConfig;
pub use error::{Result, TesterError};
pub use storage::{PinReading, Profile, ProfileStore};
pub use tester::{TestReport, TesterWorkflow, Verdict};
