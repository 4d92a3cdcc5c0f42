//! Core data types for findings extracted from a scan report.
//!
//! - [`Severity`] - Qualitative risk level with a fixed rank
//! - [`Threshold`] - A severity usable as a `--fail-on` gate
//! - [`Vulnerability`] - A flattened vulnerability entry
//! - [`Misconfiguration`] - A flattened misconfiguration entry
//! - [`Findings`] - Both sequences, in source order
//!
//! # Example
//!
//! ```
//! use trivysum::{Severity, Vulnerability};
//!
//! let vuln = Vulnerability::new("app/package-lock.json", "CVE-2021-23337", Severity::High);
//! assert_eq!(vuln.fixed_version, "-");
//! ```

mod finding;
mod severity;

pub use finding::*;
pub use severity::*;
