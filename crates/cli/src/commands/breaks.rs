use std::path::Path;
use std::process;

use geofacet_engine::{compute_breaks, BreakMethod, RecordStore};

use super::read_features;
use crate::{print_json, report_error, OutputFormat};

pub(crate) fn cmd_breaks(
    file: &Path,
    attribute: &str,
    classes: usize,
    method: BreakMethod,
    output: OutputFormat,
    quiet: bool,
) {
    if classes == 0 {
        report_error("--classes must be at least 1", output, quiet);
        process::exit(1);
    }
    let features = match read_features(file) {
        Ok(f) => f,
        Err(e) => {
            report_error(&e, output, quiet);
            process::exit(1);
        }
    };

    let store = RecordStore::new(features.features);
    let values = store.numbers(attribute);
    let valid = values.iter().flatten().filter(|v| v.is_finite()).count();
    let breaks = compute_breaks(values.iter().copied(), classes, method);

    match output {
        OutputFormat::Json => {
            print_json(&serde_json::json!({
                "attribute": attribute,
                "method": method,
                "classes": classes,
                "features": values.len(),
                "valid": valid,
                "breaks": breaks,
            }));
        }
        OutputFormat::Text => {
            if !quiet {
                println!(
                    "{} of {} features have a numeric '{}'",
                    valid,
                    values.len(),
                    attribute
                );
                println!("method: {}, classes: {}", method, classes);
            }
            let rendered: Vec<String> = breaks.iter().map(|b| b.to_string()).collect();
            println!("breaks: {}", rendered.join(", "));
        }
    }
}
