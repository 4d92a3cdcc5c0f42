use crate::error::Result;
use crate::summary::Summary;

pub fn render_json(summary: &Summary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Findings, Severity, Vulnerability};
    use crate::summary::Limits;
    use chrono::Local;
    use serde_json::Value;

    #[test]
    fn test_render_json_shape() {
        let findings = Findings {
            vulnerabilities: vec![
                Vulnerability::new("go.sum", "CVE-2023-39325", Severity::High)
                    .with_package("golang.org/x/net", "0.15.0")
                    .with_fixed_version("0.17.0"),
            ],
            misconfigurations: vec![],
        };
        let summary = Summary::new(&findings, &Limits::default(), Local::now());

        let json: Value = serde_json::from_str(&render_json(&summary).unwrap()).unwrap();
        assert_eq!(json["counts"]["high"], 1);
        assert_eq!(json["total_vulnerabilities"], 1);
        assert_eq!(json["total_misconfigurations"], 0);
        assert_eq!(json["top_vulnerabilities"][0]["severity"], "HIGH");
        assert_eq!(json["top_vulnerabilities"][0]["fixed_version"], "0.17.0");
        assert!(json.get("limits").is_none());
    }
}
