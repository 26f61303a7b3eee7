//! Output formatting utilities

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::OutputFormat;

/// Resolve `auto`: lists render as tables, single items as pretty text
pub fn effective_format(format: OutputFormat, is_list: bool) -> OutputFormat {
    match (format, is_list) {
        (OutputFormat::Auto, true) => OutputFormat::Table,
        (other, _) => other,
    }
}

/// Serialize `value` as JSON or YAML when `format` asks for it
///
/// Returns `None` for the human-readable formats so the caller can fall
/// back to its own rendering.
pub fn serialized<T: Serialize + ?Sized>(
    value: &T,
    format: OutputFormat,
) -> Result<Option<String>> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(value).into_diagnostic()?;
            json.push('\n');
            Ok(Some(json))
        }
        OutputFormat::Yaml => serde_yml::to_string(value).into_diagnostic().map(Some),
        _ => Ok(None),
    }
}
