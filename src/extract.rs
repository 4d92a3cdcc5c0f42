//! Flattening a parsed Trivy report into finding records.
//!
//! The walk is best-effort: nothing is validated, missing or `null`
//! fields fall back to [`PLACEHOLDER`] (or `UNKNOWN` for severity), and
//! non-string scalars are kept using their JSON text.

use serde_json::{Map, Value};

use crate::model::{
    Findings, Misconfiguration, Severity, Vulnerability, PLACEHOLDER, UNKNOWN_TARGET,
};

/// Extracts both vulnerabilities and misconfigurations from `report`.
pub fn extract_findings(report: &Value) -> Findings {
    let findings = Findings {
        vulnerabilities: extract_vulnerabilities(report),
        misconfigurations: extract_misconfigurations(report),
    };
    tracing::debug!(
        vulnerabilities = findings.vulnerabilities.len(),
        misconfigurations = findings.misconfigurations.len(),
        "extracted findings"
    );
    findings
}

pub fn extract_vulnerabilities(report: &Value) -> Vec<Vulnerability> {
    let mut vulns = Vec::new();

    for result in results(report) {
        let target = target_of(result);
        for entry in entries(result, "Vulnerabilities") {
            let vuln = Vulnerability::new(
                target.as_str(),
                text_field(entry, "VulnerabilityID"),
                severity_field(entry),
            )
            .with_package(
                text_field(entry, "PkgName"),
                text_field(entry, "InstalledVersion"),
            )
            .with_fixed_version(text_field(entry, "FixedVersion"))
            .with_title(text_field(entry, "Title"));
            vulns.push(vuln);
        }
    }

    vulns
}

pub fn extract_misconfigurations(report: &Value) -> Vec<Misconfiguration> {
    let mut misconfigs = Vec::new();

    for result in results(report) {
        let target = target_of(result);
        for entry in entries(result, "Misconfigurations") {
            let misconfig = Misconfiguration::new(
                target.as_str(),
                text_field(entry, "ID"),
                severity_field(entry),
            )
            .with_title(text_field(entry, "Title"))
            .with_status(text_field(entry, "Status"));
            misconfigs.push(misconfig);
        }
    }

    misconfigs
}

/// The `Results` sequence; anything else counts as no results.
fn results(report: &Value) -> impl Iterator<Item = &Map<String, Value>> {
    report
        .get("Results")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn entries<'a>(
    result: &'a Map<String, Value>,
    key: &str,
) -> impl Iterator<Item = &'a Map<String, Value>> {
    result
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn target_of(result: &Map<String, Value>) -> String {
    scalar_text(result.get("Target")).unwrap_or_else(|| UNKNOWN_TARGET.to_string())
}

fn text_field(entry: &Map<String, Value>, key: &str) -> String {
    scalar_text(entry.get(key)).unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn severity_field(entry: &Map<String, Value>) -> Severity {
    match entry.get("Severity").and_then(Value::as_str) {
        Some(label) => {
            let severity = Severity::from_label(label);
            if severity == Severity::Unknown && !label.eq_ignore_ascii_case("UNKNOWN") {
                tracing::debug!(label, "unrecognized severity, counting as UNKNOWN");
            }
            severity
        }
        None => Severity::Unknown,
    }
}

fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_report() -> Value {
        json!({
            "SchemaVersion": 2,
            "Results": [
                {
                    "Target": "app/package-lock.json",
                    "Vulnerabilities": [
                        {
                            "VulnerabilityID": "CVE-2021-23337",
                            "PkgName": "lodash",
                            "InstalledVersion": "4.17.20",
                            "FixedVersion": "4.17.21",
                            "Severity": "HIGH",
                            "Title": "Command injection via template"
                        },
                        {
                            "VulnerabilityID": "CVE-2020-28500",
                            "PkgName": "lodash",
                            "InstalledVersion": "4.17.20",
                            "Severity": "MEDIUM"
                        }
                    ]
                },
                {
                    "Target": "Dockerfile",
                    "Misconfigurations": [
                        {
                            "ID": "DS002",
                            "Severity": "HIGH",
                            "Title": "Image user should not be 'root'",
                            "Status": "FAIL"
                        }
                    ]
                },
                {
                    "Target": "alpine:3.18 (alpine 3.18.4)",
                    "Vulnerabilities": [
                        { "VulnerabilityID": "CVE-2023-5363", "PkgName": "libcrypto3", "Severity": "CRITICAL" }
                    ]
                }
            ]
        })
    }

    #[test]
    fn test_extract_vulnerabilities_in_source_order() {
        let vulns = extract_vulnerabilities(&sample_report());

        let ids: Vec<&str> = vulns.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["CVE-2021-23337", "CVE-2020-28500", "CVE-2023-5363"]);
        assert_eq!(vulns[0].target, "app/package-lock.json");
        assert_eq!(vulns[0].pkg_name, "lodash");
        assert_eq!(vulns[0].installed_version, "4.17.20");
        assert_eq!(vulns[0].fixed_version, "4.17.21");
        assert_eq!(vulns[0].severity, Severity::High);
        assert_eq!(vulns[2].target, "alpine:3.18 (alpine 3.18.4)");
        assert_eq!(vulns[2].severity, Severity::Critical);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let vulns = extract_vulnerabilities(&sample_report());

        assert_eq!(vulns[1].fixed_version, PLACEHOLDER);
        assert_eq!(vulns[1].title, PLACEHOLDER);
        assert_eq!(vulns[2].installed_version, PLACEHOLDER);
    }

    #[test]
    fn test_missing_severity_is_unknown() {
        let report = json!({
            "Results": [{ "Target": "go.sum", "Vulnerabilities": [{ "VulnerabilityID": "GHSA-1" }] }]
        });
        let vulns = extract_vulnerabilities(&report);
        assert_eq!(vulns.len(), 1);
        assert_eq!(vulns[0].severity, Severity::Unknown);
        assert_eq!(vulns[0].pkg_name, PLACEHOLDER);
    }

    #[test]
    fn test_extract_misconfigurations() {
        let misconfigs = extract_misconfigurations(&sample_report());

        assert_eq!(misconfigs.len(), 1);
        assert_eq!(misconfigs[0].target, "Dockerfile");
        assert_eq!(misconfigs[0].id, "DS002");
        assert_eq!(misconfigs[0].severity, Severity::High);
        assert_eq!(misconfigs[0].status, "FAIL");
    }

    #[test]
    fn test_zero_results() {
        for report in [json!({}), json!({ "Results": [] }), json!({ "Results": null }), json!([])] {
            let findings = extract_findings(&report);
            assert!(findings.is_empty());
        }
    }

    #[test]
    fn test_null_lists_are_empty() {
        let report = json!({
            "Results": [{ "Target": "requirements.txt", "Vulnerabilities": null, "Misconfigurations": null }]
        });
        assert!(extract_findings(&report).is_empty());
    }

    #[test]
    fn test_missing_target_is_unknown() {
        let report = json!({
            "Results": [{ "Misconfigurations": [{ "ID": "KSV001" }] }]
        });
        let misconfigs = extract_misconfigurations(&report);
        assert_eq!(misconfigs[0].target, UNKNOWN_TARGET);
        assert_eq!(misconfigs[0].title, PLACEHOLDER);
        assert_eq!(misconfigs[0].status, PLACEHOLDER);
        assert_eq!(misconfigs[0].severity, Severity::Unknown);
    }

    #[test]
    fn test_non_string_fields_pass_through() {
        let report = json!({
            "Results": [{
                "Target": "pom.xml",
                "Vulnerabilities": [{ "VulnerabilityID": 42, "FixedVersion": null, "Severity": "negligible" }]
            }]
        });
        let vulns = extract_vulnerabilities(&report);
        assert_eq!(vulns[0].id, "42");
        assert_eq!(vulns[0].fixed_version, PLACEHOLDER);
        assert_eq!(vulns[0].severity, Severity::Unknown);
    }
}
