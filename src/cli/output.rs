use serde::Serialize;

use super::OutputFormat;
use crate::model::{ClassInfo, FuncInfo};

/// Format any serializable value as JSON.
pub fn format_json<T: Serialize>(value: &T, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Json | OutputFormat::Text => {
            serde_json::to_string_pretty(value).unwrap_or_default()
        }
        OutputFormat::Compact => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Format a list of classes with their method signatures.
pub fn format_classes(classes: &[ClassInfo], format: &OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(classes).unwrap_or_default(),
        OutputFormat::Compact => serde_json::to_string(classes).unwrap_or_default(),
        OutputFormat::Text => {
            let mut out = String::new();
            for class in classes {
                out.push_str(&format!("{}  [node {}]\n", class, class.module_id));
                for method in &class.functions {
                    out.push_str(&format!("  def {}\n", method));
                }
            }
            out
        }
    }
}

/// Format a list of function signatures.
pub fn format_functions(functions: &[FuncInfo], format: &OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(functions).unwrap_or_default(),
        OutputFormat::Compact => serde_json::to_string(functions).unwrap_or_default(),
        OutputFormat::Text => {
            let mut out = String::new();
            for function in functions {
                out.push_str(&format!("def {}\n", function));
            }
            out
        }
    }
}
