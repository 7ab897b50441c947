//! Rendering of extraction results for standard output.

use std::str::FromStr;

use serde_json::Value;

use crate::datasource::Extraction;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `{datasource={jndi-name=..., security={...}}}`
    #[default]
    Human,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => Err(Error::Config(format!(
                "unknown output format '{}' (expected human, json or yaml)",
                other
            ))),
        }
    }
}

/// Renders `extraction` as text in the requested format.
///
/// The result is converted to a plain map first, so YAML shows
/// `error: ...` rather than a tagged enum.
pub fn render(extraction: &Extraction, format: OutputFormat) -> Result<String> {
    let value = serde_json::to_value(extraction).map_err(|e| Error::Render(e.to_string()))?;
    match format {
        OutputFormat::Human => {
            let mut out = String::new();
            write_human(&mut out, &value);
            Ok(out)
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(&value).map_err(|e| Error::Render(e.to_string()))
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(&value).map_err(|e| Error::Render(e.to_string()))
        }
    }
}

fn write_human(out: &mut String, v: &Value) {
    match v {
        Value::Object(map) => {
            out.push('{');
            for (i, (k, val)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(k);
                out.push('=');
                write_human(out, val);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_human(out, item);
            }
            out.push(']');
        }
        Value::String(s) => out.push_str(s),
        Value::Null => out.push_str("null"),
        other => out.push_str(&other.to_string()),
    }
}
