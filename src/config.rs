//! Configuration file handling.
//!
//! Settings are read from an optional TOML file. Command-line flags
//! always take precedence over values found here.
//!
//! # Configuration Location
//!
//! Unless `--config` is given, the file is looked up at:
//! - Linux: `~/.config/trivysum/config.toml`
//! - macOS: `~/Library/Application Support/trivysum/config.toml`
//! - Windows: `%APPDATA%\trivysum\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! fail_on = "HIGH"
//! format = "text"
//! color = "auto"
//!
//! [display]
//! top_vulnerabilities = 20
//! max_misconfigurations = 15
//!
//! [ignore]
//! vulnerabilities = ["CVE-2021-12345"]
//! targets = ["node_modules/*"]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReportError, Result};
use crate::model::{Findings, Threshold};
use crate::output::{ColorChoice, OutputFormat};
use crate::summary::{
    Limits, BAR_WIDTH, MAX_MISCONFIGURATIONS, TITLE_WIDTH, TOP_VULNERABILITIES,
};

/// Application configuration.
///
/// Every field is optional in the file; missing ones take their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Threshold used when no `--fail-on` flag is provided.
    ///
    /// Default: none (the gate is off)
    pub fail_on: Option<Threshold>,

    /// Default output format when no `--format` flag is provided.
    pub format: OutputFormat,

    /// Default color mode when no `--color` flag is provided.
    pub color: ColorChoice,

    pub display: DisplayConfig,

    /// Ignore list for suppressing accepted findings.
    pub ignore: IgnoreConfig,
}

/// How much of the report is shown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub top_vulnerabilities: usize,
    pub max_misconfigurations: usize,
    pub bar_width: usize,
    pub title_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            top_vulnerabilities: TOP_VULNERABILITIES,
            max_misconfigurations: MAX_MISCONFIGURATIONS,
            bar_width: BAR_WIDTH,
            title_width: TITLE_WIDTH,
        }
    }
}

impl DisplayConfig {
    pub fn limits(&self) -> Limits {
        Limits {
            top_vulnerabilities: self.top_vulnerabilities,
            max_misconfigurations: self.max_misconfigurations,
            bar_width: self.bar_width,
            title_width: self.title_width,
        }
    }
}

/// Findings to drop before counting, rendering and gating.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Vulnerability or misconfiguration IDs (e.g., "CVE-2021-12345", "DS002").
    pub vulnerabilities: Vec<String>,

    /// Targets whose findings are dropped.
    ///
    /// Supports glob patterns (e.g., "node_modules/*", "*.tf").
    pub targets: Vec<String>,
}

impl IgnoreConfig {
    /// Check if a finding ID should be ignored.
    pub fn should_ignore_id(&self, id: &str) -> bool {
        self.vulnerabilities.iter().any(|ignored| ignored == id)
    }

    /// Check if a target should be ignored.
    pub fn should_ignore_target(&self, target: &str) -> bool {
        self.targets.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, target)
            } else {
                pattern == target
            }
        })
    }

    fn should_ignore(&self, target: &str, id: &str) -> bool {
        self.should_ignore_id(id) || self.should_ignore_target(target)
    }

    /// Removes ignored findings, keeping the order of the rest.
    pub fn apply(&self, findings: Findings) -> Findings {
        let before = findings.vulnerabilities.len() + findings.misconfigurations.len();

        let kept = Findings {
            vulnerabilities: findings
                .vulnerabilities
                .into_iter()
                .filter(|v| !self.should_ignore(&v.target, &v.id))
                .collect(),
            misconfigurations: findings
                .misconfigurations
                .into_iter()
                .filter(|m| !self.should_ignore(&m.target, &m.id))
                .collect(),
        };

        let dropped = before - kept.vulnerabilities.len() - kept.misconfigurations.len();
        if dropped > 0 {
            tracing::debug!(dropped, "ignored findings from config");
        }
        kept
    }
}

/// Simple glob matching (supports * as wildcard).
fn glob_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();

    if parts.len() == 1 {
        return pattern == text;
    }

    let mut remaining = text;

    let first = parts[0];
    if !first.is_empty() {
        match remaining.strip_prefix(first) {
            Some(rest) => remaining = rest,
            None => return false,
        }
    }

    let last = parts[parts.len() - 1];
    if !last.is_empty() {
        match remaining.strip_suffix(last) {
            Some(rest) => remaining = rest,
            None => return false,
        }
    }

    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        match remaining.find(part) {
            Some(pos) => remaining = &remaining[pos + part.len()..],
            None => return false,
        }
    }

    true
}

impl Config {
    /// Loads configuration from `path`, or from [`Config::config_path`] when `None`.
    ///
    /// A missing default file yields the default configuration; a missing
    /// explicit file is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Config`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::config_path(), false),
        };

        if !path.exists() {
            if explicit {
                return Err(ReportError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return Ok(Self::default());
        }

        Self::from_file(&path)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ReportError::Config(format!("{}: {}", path.display(), e)))?;
        let config = toml::from_str(&content)
            .map_err(|e| ReportError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Returns the default path of the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("trivysum")
            .join("config.toml")
    }
}
