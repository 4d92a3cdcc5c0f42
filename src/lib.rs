pub mod config;
pub mod error;
pub mod extract;
pub mod gate;
pub mod loader;
pub mod logging;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod summary;

pub use config::Config;
pub use error::ReportError;
pub use gate::GateOutcome;
pub use model::{Findings, Misconfiguration, Severity, Threshold, Vulnerability};
pub use pipeline::{run, run_reporting, RunOptions};
