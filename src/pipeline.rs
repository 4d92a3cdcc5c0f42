//! One run of the tool: load, extract, summarize, render, gate.

use chrono::Local;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::config::IgnoreConfig;
use crate::error::{ReportError, Result};
use crate::extract::extract_findings;
use crate::gate::{self, exit_codes, GateOutcome};
use crate::loader::load_report;
use crate::model::Threshold;
use crate::output::{render, OutputFormat};
use crate::summary::{Limits, Summary};

/// Resolved settings for a run, after merging flags and config.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub fail_on: Option<Threshold>,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub color: bool,
    pub limits: Limits,
    pub ignore: IgnoreConfig,
}

impl RunOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            fail_on: None,
            output: None,
            format: OutputFormat::default(),
            color: false,
            limits: Limits::default(),
            ignore: IgnoreConfig::default(),
        }
    }
}

/// Runs the pipeline and turns any error into an `[ERROR]` line on `out`.
///
/// Returns the process exit code.
pub fn run_reporting(options: &RunOptions, out: &mut impl Write) -> u8 {
    match run(options, out) {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            tracing::debug!(error = ?e, "run failed");
            let _ = writeln!(out, "[ERROR] {}", e);
            exit_codes::FAILURE
        }
    }
}

/// Runs the whole pipeline, writing the summary and the gate line to `out`.
///
/// Nothing is written to `out` when the report cannot be loaded.
pub fn run(options: &RunOptions, out: &mut impl Write) -> Result<GateOutcome> {
    let report = load_report(&options.input)?;
    let findings = options.ignore.apply(extract_findings(&report));
    if findings.is_empty() {
        tracing::info!(path = %options.input.display(), "report has no findings");
    }

    let summary = Summary::new(&findings, &options.limits, Local::now());
    let rendered = render(&summary, options.format, options.color)?;
    writeln!(out, "{}", rendered)?;

    if let Some(path) = &options.output {
        let plain = render(&summary, options.format, false)?;
        fs::write(path, plain).map_err(|source| ReportError::WriteOutput {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "summary written");
    }

    let outcome = gate::evaluate(&findings.vulnerabilities, options.fail_on);
    tracing::debug!(passed = outcome.passed(), "gate evaluated");
    writeln!(out, "{}", outcome.status_line())?;
    Ok(outcome)
}
