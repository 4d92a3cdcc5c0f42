use serde::Serialize;

use super::Severity;

/// Placeholder shown for any field missing from the report.
pub const PLACEHOLDER: &str = "-";

/// Target name used when a result carries none.
pub const UNKNOWN_TARGET: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vulnerability {
    pub target: String,
    pub id: String,
    pub pkg_name: String,
    pub installed_version: String,
    pub fixed_version: String,
    pub severity: Severity,
    pub title: String,
}

impl Vulnerability {
    pub fn new(target: impl Into<String>, id: impl Into<String>, severity: Severity) -> Self {
        Self {
            target: target.into(),
            id: id.into(),
            pkg_name: PLACEHOLDER.to_string(),
            installed_version: PLACEHOLDER.to_string(),
            fixed_version: PLACEHOLDER.to_string(),
            severity,
            title: PLACEHOLDER.to_string(),
        }
    }

    pub fn with_package(mut self, name: impl Into<String>, installed: impl Into<String>) -> Self {
        self.pkg_name = name.into();
        self.installed_version = installed.into();
        self
    }

    pub fn with_fixed_version(mut self, fixed: impl Into<String>) -> Self {
        self.fixed_version = fixed.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Misconfiguration {
    pub target: String,
    pub id: String,
    pub severity: Severity,
    pub title: String,
    pub status: String,
}

impl Misconfiguration {
    pub fn new(target: impl Into<String>, id: impl Into<String>, severity: Severity) -> Self {
        Self {
            target: target.into(),
            id: id.into(),
            severity,
            title: PLACEHOLDER.to_string(),
            status: PLACEHOLDER.to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}

/// Everything extracted from one report, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Findings {
    pub vulnerabilities: Vec<Vulnerability>,
    pub misconfigurations: Vec<Misconfiguration>,
}

impl Findings {
    pub fn is_empty(&self) -> bool {
        self.vulnerabilities.is_empty() && self.misconfigurations.is_empty()
    }
}
