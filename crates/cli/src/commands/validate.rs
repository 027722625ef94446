use std::path::Path;
use std::process;

use geofacet_interchange::from_catalog;

use crate::{report_error, OutputFormat};

static CATALOG_SCHEMA_STR: &str = include_str!("../../../../schema/catalog-schema.json");

pub(crate) fn cmd_validate(file: &Path, output: OutputFormat, quiet: bool) {
    let schema: serde_json::Value = match serde_json::from_str(CATALOG_SCHEMA_STR) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("internal error: failed to parse embedded catalog schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let doc_str = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", file.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let doc: serde_json::Value = match serde_json::from_str(&doc_str) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error parsing JSON in '{}': {}", file.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let validator = match jsonschema::validator_for(&schema) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("internal error: failed to compile schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let mut errors: Vec<String> = validator
        .iter_errors(&doc)
        .map(|e| format!("{}", e))
        .collect();
    // A schema-valid document must also read as a catalog.
    if errors.is_empty() {
        if let Err(e) = from_catalog(&doc) {
            errors.push(e.to_string());
        }
    }

    if errors.is_empty() {
        let entries = doc.as_array().map(|a| a.len()).unwrap_or(0);
        if !quiet {
            match output {
                OutputFormat::Text => println!("valid ({} entries)", entries),
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({ "valid": true, "entries": entries }));
                }
            }
        }
    } else {
        match output {
            OutputFormat::Text => {
                if !quiet {
                    eprintln!("invalid catalog");
                    for err in &errors {
                        eprintln!("  - {}", err);
                    }
                }
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "valid": false,
                    "errors": errors
                });
                eprintln!(
                    "{}",
                    serde_json::to_string_pretty(&json).unwrap_or_default()
                );
            }
        }
        process::exit(1);
    }
}
