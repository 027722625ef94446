use std::process;

use geofacet_engine::MapCatalog;
use geofacet_loader::{adapter_for, load_map_catalog};

use crate::config::Config;
use crate::{block_on, print_json, report_error, OutputFormat};

pub(crate) fn cmd_datasets(
    config: &Config,
    data_type: Option<&str>,
    output: OutputFormat,
    quiet: bool,
) {
    let adapter = adapter_for(config.source_root());
    let groups = match block_on(
        load_map_catalog(adapter.as_ref(), &config.data.map_catalog),
        output,
        quiet,
    ) {
        Ok(g) => g,
        Err(e) => {
            report_error(&format!("failed to load map catalog: {}", e), output, quiet);
            process::exit(1);
        }
    };
    let catalog = MapCatalog::new(groups);

    let types: Vec<&str> = match data_type {
        Some(t) => {
            if !catalog.type_options().contains(&t) {
                report_error(&format!("unknown data type '{}'", t), output, quiet);
                process::exit(1);
            }
            vec![t]
        }
        None => catalog.type_options(),
    };

    match output {
        OutputFormat::Json => {
            let listed: Vec<serde_json::Value> = types
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "type": t,
                        "titles": catalog.titles_for(t),
                        "description": catalog.description_for(t),
                    })
                })
                .collect();
            print_json(&serde_json::Value::Array(listed));
        }
        OutputFormat::Text => {
            for t in types {
                println!("{}: {}", t, catalog.description_for(t));
                for title in catalog.titles_for(t) {
                    println!("  - {}", title);
                }
            }
        }
    }
}
