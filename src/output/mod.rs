mod json;
mod text;

pub use json::render_json;
pub use text::render_text;

use crate::error::Result;
use crate::summary::Summary;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::io::IsTerminal;

/// Output format for the summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable terminal report
    #[default]
    Text,
    /// JSON summary for programmatic use
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "table" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use 'text' or 'json'", s)),
        }
    }
}

/// When to colorize terminal output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Color only when stdout is a terminal and `NO_COLOR` is unset
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn use_color(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => auto_color(
                std::env::var_os("NO_COLOR"),
                std::io::stdout().is_terminal(),
            ),
        }
    }
}

/// Only a non-empty `NO_COLOR` disables color.
fn auto_color(no_color: Option<OsString>, is_terminal: bool) -> bool {
    let disabled = no_color.is_some_and(|v| !v.is_empty());
    is_terminal && !disabled
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "Unknown color mode: {}. Use 'auto', 'always' or 'never'",
                s
            )),
        }
    }
}

/// Renders the summary in `format`. `color` only affects text output.
pub fn render(summary: &Summary, format: OutputFormat, color: bool) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(summary, color)),
        OutputFormat::Json => render_json(summary),
    }
}
