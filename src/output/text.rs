use crate::model::Severity;
use crate::summary::{bar, Summary};
use tabled::{settings::Style, Table, Tabled};

const RESET: &str = "\x1b[0m";
const RULE_WIDTH: usize = 70;

#[derive(Tabled)]
struct VulnRow {
    #[tabled(rename = "SEVERITY")]
    severity: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "PACKAGE")]
    package: String,
    #[tabled(rename = "FIXED")]
    fixed: String,
    #[tabled(rename = "TITLE")]
    title: String,
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "\x1b[91m",
        Severity::High => "\x1b[93m",
        Severity::Medium => "\x1b[94m",
        Severity::Low => "\x1b[92m",
        Severity::Unknown => "\x1b[90m",
    }
}

fn paint(text: &str, severity: Severity, color: bool) -> String {
    if color && !text.is_empty() {
        format!("{}{}{}", severity_color(severity), text, RESET)
    } else {
        text.to_string()
    }
}

/// Collapses line breaks so a cell or list entry stays on one row.
fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

fn label(severity: Severity, color: bool) -> String {
    paint(&format!("{:<10}", severity.as_str()), severity, color)
}

/// Renders the terminal report. With `color` off the result is plain text.
pub fn render_text(summary: &Summary, color: bool) -> String {
    let double_rule = "═".repeat(RULE_WIDTH);
    let single_rule = "─".repeat(RULE_WIDTH);
    let mut lines = Vec::new();

    lines.push(String::new());
    lines.push(double_rule.clone());
    lines.push("  TRIVY SCAN SUMMARY".to_string());
    lines.push(format!(
        "  Generated: {}",
        summary.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    lines.push(double_rule.clone());

    lines.push(String::new());
    lines.push("  VULNERABILITIES BY SEVERITY:".to_string());
    for (severity, count) in summary.counts.iter() {
        let glyphs = bar(count, summary.limits.bar_width);
        lines.push(format!(
            "  {} {} {}",
            label(severity, color),
            paint(&glyphs, severity, color),
            count
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "  Total vulnerabilities : {}",
        summary.total_vulnerabilities
    ));
    lines.push(format!(
        "  Total misconfigurations: {}",
        summary.total_misconfigurations
    ));

    if !summary.top_vulnerabilities.is_empty() {
        lines.push(String::new());
        lines.push(single_rule.clone());
        lines.push(format!(
            "  TOP {} VULNERABILITIES",
            summary.limits.top_vulnerabilities
        ));
        lines.push(single_rule.clone());

        let rows: Vec<VulnRow> = summary
            .top_vulnerabilities
            .iter()
            .map(|v| VulnRow {
                severity: paint(v.severity.as_str(), v.severity, color),
                id: single_line(&v.id),
                package: single_line(&v.pkg_name),
                fixed: single_line(&v.fixed_version),
                title: single_line(&v.title),
            })
            .collect();

        let table = Table::new(rows).with(Style::blank()).to_string();
        lines.extend(table.lines().map(|line| format!(" {}", line.trim_end())));
    }

    if !summary.misconfigurations.is_empty() {
        lines.push(String::new());
        lines.push(single_rule.clone());
        lines.push("  MISCONFIGURATIONS".to_string());
        lines.push(single_rule);

        for m in &summary.misconfigurations {
            lines.push(format!(
                "  {} {:<15} {}",
                label(m.severity, color),
                single_line(&m.id),
                single_line(&m.title)
            ));
        }
    }

    lines.push(String::new());
    lines.push(double_rule);
    lines.push(String::new());

    lines.join("\n")
}
