//! Aggregation of findings into what the reports display.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::model::{Findings, Misconfiguration, Severity, Vulnerability};

/// Number of vulnerabilities listed in the top table.
pub const TOP_VULNERABILITIES: usize = 20;
/// Number of misconfigurations listed.
pub const MAX_MISCONFIGURATIONS: usize = 15;
/// Longest severity bar, in glyphs.
pub const BAR_WIDTH: usize = 40;
/// Titles are cut to this many characters.
pub const TITLE_WIDTH: usize = 60;

/// Vulnerability counts per severity bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub unknown: usize,
}

impl SeverityCounts {
    pub fn tally(vulns: &[Vulnerability]) -> Self {
        let mut counts = Self::default();
        for vuln in vulns {
            *counts.bucket_mut(vuln.severity) += 1;
        }
        counts
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
            Severity::Unknown => self.unknown,
        }
    }

    fn bucket_mut(&mut self, severity: Severity) -> &mut usize {
        match severity {
            Severity::Critical => &mut self.critical,
            Severity::High => &mut self.high,
            Severity::Medium => &mut self.medium,
            Severity::Low => &mut self.low,
            Severity::Unknown => &mut self.unknown,
        }
    }

    /// `(severity, count)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Severity, usize)> + '_ {
        Severity::ALL.into_iter().map(move |s| (s, self.get(s)))
    }
}

/// Limits applied when building a [`Summary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub top_vulnerabilities: usize,
    pub max_misconfigurations: usize,
    pub bar_width: usize,
    pub title_width: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            top_vulnerabilities: TOP_VULNERABILITIES,
            max_misconfigurations: MAX_MISCONFIGURATIONS,
            bar_width: BAR_WIDTH,
            title_width: TITLE_WIDTH,
        }
    }
}

/// Everything a renderer needs, computed once per run.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub generated_at: DateTime<Local>,
    pub counts: SeverityCounts,
    pub total_vulnerabilities: usize,
    pub total_misconfigurations: usize,
    pub top_vulnerabilities: Vec<Vulnerability>,
    pub misconfigurations: Vec<Misconfiguration>,
    #[serde(skip)]
    pub limits: Limits,
}

impl Summary {
    pub fn new(findings: &Findings, limits: &Limits, generated_at: DateTime<Local>) -> Self {
        let truncate_vuln = |v: Vulnerability| Vulnerability {
            title: truncate_title(&v.title, limits.title_width),
            ..v
        };
        let truncate_misconfig = |m: Misconfiguration| Misconfiguration {
            title: truncate_title(&m.title, limits.title_width),
            ..m
        };

        Self {
            generated_at,
            counts: SeverityCounts::tally(&findings.vulnerabilities),
            total_vulnerabilities: findings.vulnerabilities.len(),
            total_misconfigurations: findings.misconfigurations.len(),
            top_vulnerabilities: top_vulnerabilities(
                &findings.vulnerabilities,
                limits.top_vulnerabilities,
            )
            .into_iter()
            .map(truncate_vuln)
            .collect(),
            misconfigurations: first_misconfigurations(
                &findings.misconfigurations,
                limits.max_misconfigurations,
            )
            .into_iter()
            .map(truncate_misconfig)
            .collect(),
            limits: *limits,
        }
    }
}

/// Most severe vulnerabilities first, keeping source order within a severity.
pub fn top_vulnerabilities(vulns: &[Vulnerability], limit: usize) -> Vec<Vulnerability> {
    let mut sorted = vulns.to_vec();
    // sort_by_key is stable
    sorted.sort_by_key(|v| v.severity.rank());
    sorted.truncate(limit);
    sorted
}

pub fn first_misconfigurations(
    misconfigs: &[Misconfiguration],
    limit: usize,
) -> Vec<Misconfiguration> {
    misconfigs.iter().take(limit).cloned().collect()
}

/// A bar of `min(count, max)` block glyphs.
pub fn bar(count: usize, max: usize) -> String {
    "█".repeat(count.min(max))
}

/// Cuts `title` to at most `max_chars` characters.
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    title.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vuln(id: &str, severity: Severity) -> Vulnerability {
        Vulnerability::new("target", id, severity)
    }

    #[test]
    fn test_tally_counts_every_bucket() {
        let vulns = vec![
            vuln("a", Severity::High),
            vuln("b", Severity::High),
            vuln("c", Severity::Unknown),
            vuln("d", Severity::Critical),
        ];
        let counts = SeverityCounts::tally(&vulns);

        assert_eq!(counts.critical, 1);
        assert_eq!(counts.high, 2);
        assert_eq!(counts.medium, 0);
        assert_eq!(counts.low, 0);
        assert_eq!(counts.unknown, 1);

        let order: Vec<Severity> = counts.iter().map(|(s, _)| s).collect();
        assert_eq!(order, Severity::ALL.to_vec());
    }

    #[test]
    fn test_top_vulnerabilities_stable_sort() {
        let vulns = vec![
            vuln("low-1", Severity::Low),
            vuln("high-1", Severity::High),
            vuln("unknown-1", Severity::Unknown),
            vuln("critical-1", Severity::Critical),
            vuln("high-2", Severity::High),
            vuln("medium-1", Severity::Medium),
            vuln("critical-2", Severity::Critical),
        ];
        let ids: Vec<String> = top_vulnerabilities(&vulns, 20)
            .into_iter()
            .map(|v| v.id)
            .collect();

        assert_eq!(
            ids,
            vec!["critical-1", "critical-2", "high-1", "high-2", "medium-1", "low-1", "unknown-1"]
        );
    }

    #[test]
    fn test_top_vulnerabilities_truncates() {
        let vulns: Vec<Vulnerability> = (0..30)
            .map(|i| vuln(&format!("CVE-{i}"), Severity::Medium))
            .collect();
        let top = top_vulnerabilities(&vulns, TOP_VULNERABILITIES);

        assert_eq!(top.len(), 20);
        assert_eq!(top[0].id, "CVE-0");
        assert_eq!(top[19].id, "CVE-19");
    }

    #[test]
    fn test_first_misconfigurations() {
        let misconfigs: Vec<Misconfiguration> = (0..20)
            .map(|i| Misconfiguration::new("Dockerfile", format!("DS{i:03}"), Severity::Low))
            .collect();
        let first = first_misconfigurations(&misconfigs, MAX_MISCONFIGURATIONS);

        assert_eq!(first.len(), 15);
        assert_eq!(first[0].id, "DS000");
        assert_eq!(first[14].id, "DS014");
    }

    #[test]
    fn test_bar_is_capped() {
        assert_eq!(bar(0, BAR_WIDTH), "");
        assert_eq!(bar(3, BAR_WIDTH).chars().count(), 3);
        assert_eq!(bar(40, BAR_WIDTH).chars().count(), 40);
        assert_eq!(bar(125, BAR_WIDTH).chars().count(), 40);
    }

    #[test]
    fn test_truncate_title() {
        let long = "x".repeat(75);
        assert_eq!(truncate_title(&long, TITLE_WIDTH).chars().count(), 60);

        let exact = "y".repeat(60);
        assert_eq!(truncate_title(&exact, TITLE_WIDTH), exact);

        assert_eq!(truncate_title("short title", TITLE_WIDTH), "short title");

        // multi-byte characters are counted, not bytes
        let accented = "é".repeat(70);
        assert_eq!(truncate_title(&accented, TITLE_WIDTH), "é".repeat(60));
    }

    #[test]
    fn test_summary_totals_use_all_findings() {
        let findings = Findings {
            vulnerabilities: (0..25)
                .map(|i| vuln(&format!("CVE-{i}"), Severity::Low).with_title("t".repeat(80)))
                .collect(),
            misconfigurations: vec![Misconfiguration::new("main.tf", "AVD-AWS-0086", Severity::High)],
        };
        let summary = Summary::new(&findings, &Limits::default(), Local::now());

        assert_eq!(summary.total_vulnerabilities, 25);
        assert_eq!(summary.counts.low, 25);
        assert_eq!(summary.top_vulnerabilities.len(), 20);
        assert_eq!(summary.top_vulnerabilities[0].title.len(), 60);
        assert_eq!(summary.total_misconfigurations, 1);
    }
}
