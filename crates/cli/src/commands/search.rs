use std::path::Path;
use std::process;

use geofacet_engine::highlight_matches;

use super::read_features;
use crate::{print_json, report_error, OutputFormat};

pub(crate) fn cmd_search(file: &Path, keyword: &str, output: OutputFormat, quiet: bool) {
    let features = match read_features(file) {
        Ok(f) => f,
        Err(e) => {
            report_error(&e, output, quiet);
            process::exit(1);
        }
    };

    let hits = highlight_matches(&features.features, keyword);
    let matches: Vec<(usize, &str)> = hits
        .iter()
        .enumerate()
        .filter(|(_, style)| style.is_some())
        .filter_map(|(index, _)| {
            features.features[index]
                .property_str("name")
                .map(|name| (index, name))
        })
        .collect();

    match output {
        OutputFormat::Json => {
            let listed: Vec<serde_json::Value> = matches
                .iter()
                .map(|(index, name)| serde_json::json!({ "index": index, "name": name }))
                .collect();
            print_json(&serde_json::json!({
                "keyword": keyword,
                "features": features.len(),
                "matches": listed,
                "style": geofacet_engine::style::highlight_style(),
            }));
        }
        OutputFormat::Text => {
            if !quiet {
                println!(
                    "{} of {} features match '{}'",
                    matches.len(),
                    features.len(),
                    keyword
                );
            }
            for (index, name) in &matches {
                println!("  #{} {}", index, name);
            }
        }
    }
}
