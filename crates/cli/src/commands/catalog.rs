use std::process;

use geofacet_engine::item::NO_MATCHES;
use geofacet_engine::{Badge, CatalogItem, DownloadAction, RecordStore, Session};
use geofacet_interchange::CatalogEntry;
use geofacet_loader::{adapter_for, load_catalog};

use crate::config::Config;
use crate::{block_on, print_json, report_error, OutputFormat};

/// Load every catalog source into a session and apply `selections`.
///
/// Selections are made in facet chain order, whatever order they were
/// given in, so an earlier facet never resets a later one.
pub(crate) fn build_session(
    config: &Config,
    selections: &[(String, String)],
    output: OutputFormat,
    quiet: bool,
) -> Result<Session<CatalogEntry>, String> {
    let adapter = adapter_for(config.source_root());
    let entries = block_on(load_catalog(adapter, &config.data.catalog), output, quiet)
        .map_err(|e| format!("failed to load catalog: {}", e))?;

    let mut session = Session::new(
        RecordStore::new(entries),
        config.facet_chain(),
        config.catalog.page_size,
    )
    .map_err(|e| e.to_string())?;

    let mut ordered = Vec::with_capacity(selections.len());
    for (facet, value) in selections {
        let index = session.facet_index(facet).map_err(|e| e.to_string())?;
        ordered.push((index, value.as_str()));
    }
    ordered.sort_by_key(|(index, _)| *index);
    for (index, value) in ordered {
        session.select_index(index, value).map_err(|e| e.to_string())?;
    }
    session.apply_with_latency(config.apply_latency());
    tracing::info!(
        entries = session.store().len(),
        matched = session.filtered_len(),
        "catalog filtered"
    );
    Ok(session)
}

pub(crate) fn cmd_catalog(
    config: &Config,
    selections: &[(String, String)],
    page: usize,
    output: OutputFormat,
    quiet: bool,
) {
    let mut session = match build_session(config, selections, output, quiet) {
        Ok(s) => s,
        Err(e) => {
            report_error(&e, output, quiet);
            process::exit(1);
        }
    };
    let page = session.goto_page(page);
    let items: Vec<CatalogItem> = session
        .page_items()
        .into_iter()
        .map(CatalogItem::from_entry)
        .collect();

    match output {
        OutputFormat::Json => {
            print_json(&serde_json::json!({
                "selections": session.selections().to_values(),
                "matched": session.filtered_len(),
                "page": page,
                "window": page.window(),
                "items": items,
            }));
        }
        OutputFormat::Text => {
            if items.is_empty() {
                println!("{}", NO_MATCHES);
                return;
            }
            println!(
                "{} matching entries, page {} of {}",
                session.filtered_len(),
                page.number(),
                page.total_pages()
            );
            for item in &items {
                println!();
                print_item(item);
            }
            let window = page.window();
            if !window.is_empty() {
                let pages: Vec<String> = window
                    .iter()
                    .map(|&n| {
                        if n == page.number() {
                            format!("[{}]", n)
                        } else {
                            n.to_string()
                        }
                    })
                    .collect();
                println!();
                println!("pages: {}", pages.join(" "));
            }
        }
    }
}

fn print_item(item: &CatalogItem) {
    let badge = match item.badge {
        Badge::Verified => "verified",
        Badge::Unverified => "unverified",
    };
    println!("{} [{}: {}]", item.title, badge, item.status);
    if !item.description.is_empty() {
        println!("  {}", item.description);
    }
    println!(
        "  {} | 最新记录{}年 | {}",
        item.size, item.update_time, item.provider
    );
    if !item.tags.is_empty() {
        println!("  tags: {}", item.tags.join(", "));
    }
    println!("  支持格式: {}", item.formats.join(", "));
    let download = match &item.download {
        DownloadAction::Open { url } => format!("{} {}", item.download.label(), url),
        DownloadAction::Unavailable => item
            .download
            .activate()
            .unwrap_or_else(|msg| msg)
            .to_string(),
        DownloadAction::Disabled => item.download.label().to_string(),
    };
    println!("  download: {}", download);
}

pub(crate) fn cmd_options(
    config: &Config,
    selections: &[(String, String)],
    output: OutputFormat,
    quiet: bool,
) {
    let session = match build_session(config, selections, output, quiet) {
        Ok(s) => s,
        Err(e) => {
            report_error(&e, output, quiet);
            process::exit(1);
        }
    };

    match output {
        OutputFormat::Json => {
            print_json(&serde_json::json!({
                "selections": session.selections().to_values(),
                "matched": session.filtered_len(),
                "options": session.options(),
            }));
        }
        OutputFormat::Text => {
            for (index, options) in session.options().iter().enumerate() {
                let selected = session.selections().get(index).unwrap_or("");
                let labels: Vec<String> = options
                    .options
                    .iter()
                    .map(|o| {
                        if o.value == selected {
                            format!("*{}", o.label)
                        } else {
                            o.label.clone()
                        }
                    })
                    .collect();
                println!("{}: {}", options.facet, labels.join(", "));
            }
        }
    }
}
