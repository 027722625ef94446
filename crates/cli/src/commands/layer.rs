use std::process;

use geofacet_engine::layer::{fill_missing_provinces, FLOW_VALUE_KEY};
use geofacet_engine::{flow_layer, province_choropleth, resolve_layer, DataKind, LayerRequest};
use geofacet_interchange::FeatureCollection;
use geofacet_loader::{adapter_for, load_features, load_province_counts, SourceAdapter};

use crate::config::Config;
use crate::{block_on, print_json, report_error, OutputFormat};

fn fail(msg: &str, output: OutputFormat, quiet: bool) -> ! {
    report_error(msg, output, quiet);
    process::exit(1);
}

fn features(
    adapter: &dyn SourceAdapter,
    location: &str,
    output: OutputFormat,
    quiet: bool,
) -> FeatureCollection {
    match block_on(load_features(adapter, location), output, quiet) {
        Ok(f) => f,
        Err(e) => fail(&format!("failed to load layer: {}", e), output, quiet),
    }
}

pub(crate) fn cmd_layer(
    config: &Config,
    data_type: &str,
    title: &str,
    output: OutputFormat,
    quiet: bool,
) {
    let request = match resolve_layer(data_type, title, &config.data.geodata) {
        Ok(r) => r,
        Err(e) => fail(&e.to_string(), output, quiet),
    };
    let adapter = adapter_for(config.source_root());

    match request {
        LayerRequest::ProvinceChoropleth {
            ref year,
            ref counts_path,
        } => {
            let boundary = features(adapter.as_ref(), &config.data.boundary, output, quiet);
            let mut counts =
                match block_on(load_province_counts(adapter.as_ref(), counts_path), output, quiet) {
                    Ok(c) => c,
                    Err(e) => fail(&format!("failed to load province counts: {}", e), output, quiet),
                };
            fill_missing_provinces(&mut counts, &boundary);
            let layer =
                match province_choropleth(&boundary, &counts, &config.classes.choropleth_colors) {
                    Ok(l) => l,
                    Err(e) => fail(&e.to_string(), output, quiet),
                };

            match output {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "request": request,
                    "breaks": layer.scheme.breaks(),
                    "provinces": layer.provinces,
                })),
                OutputFormat::Text => {
                    println!("{} provincial counts ({})", data_type, year);
                    let rendered: Vec<String> =
                        layer.scheme.breaks().iter().map(|b| b.to_string()).collect();
                    println!("breaks: {}", rendered.join(", "));
                    for province in &layer.provinces {
                        println!(
                            "  {}: {} -> {}",
                            province.name.as_deref().unwrap_or("(unnamed)"),
                            province.count,
                            class_text(province.class.class, &province.class.color)
                        );
                    }
                }
            }
        }
        LayerRequest::Dataset {
            ref data_kind,
            ref path,
        } => {
            let collection = features(adapter.as_ref(), path, output, quiet);
            if data_kind.is_graduated() {
                print_flows(config, &request, &collection, output, quiet);
            } else {
                print_flat(data_kind, &request, &collection, output);
            }
        }
    }
}

fn class_text(class: Option<usize>, color: &str) -> String {
    match class {
        Some(index) => format!("class {} {}", index, color),
        None => format!("no class {}", color),
    }
}

fn print_flows(
    config: &Config,
    request: &LayerRequest,
    collection: &FeatureCollection,
    output: OutputFormat,
    quiet: bool,
) {
    let layer = match flow_layer(
        collection,
        FLOW_VALUE_KEY,
        &config.classes.od_colors,
        &config.classes.od_widths,
    ) {
        Ok(l) => l,
        Err(e) => fail(&e.to_string(), output, quiet),
    };

    match output {
        OutputFormat::Json => print_json(&serde_json::json!({
            "request": request,
            "breaks": layer.scheme.breaks(),
            "flows": layer.flows,
        })),
        OutputFormat::Text => {
            let rendered: Vec<String> = layer.scheme.breaks().iter().map(|b| b.to_string()).collect();
            println!("{} flows, breaks: {}", layer.flows.len(), rendered.join(", "));
            for (index, flow) in layer.flows.iter().enumerate() {
                let value = flow
                    .value
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "  #{} {}={} -> {} width {}",
                    index,
                    FLOW_VALUE_KEY,
                    value,
                    class_text(flow.class.class, &flow.class.color),
                    flow.class.width.unwrap_or_default()
                );
            }
        }
    }
}

fn print_flat(
    data_kind: &DataKind,
    request: &LayerRequest,
    collection: &FeatureCollection,
    output: OutputFormat,
) {
    let style = data_kind.style();
    match output {
        OutputFormat::Json => print_json(&serde_json::json!({
            "request": request,
            "features": collection.len(),
            "style": style,
        })),
        OutputFormat::Text => {
            println!("{} features", collection.len());
            let rendered = serde_json::to_string(&style)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("style: {}", rendered);
        }
    }
}
