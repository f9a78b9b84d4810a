//! `resolve` and `check` commands.

use std::fs;
use std::io::Write;

use anyhow::{Context, Result};
use serde_json::{Map, Value as JsonValue};

use crate::cli::args::ResolveArgs;
use crate::collect::resolve_metadata;
use crate::config::RouteManifest;
use crate::metadata::ResolvedMetadata;
use crate::{debug, log};

/// Resolve the manifest's route and write the result as JSON.
pub fn run_resolve(mut manifest: RouteManifest, args: &ResolveArgs) -> Result<()> {
    apply_overrides(&mut manifest, args);
    let resolved = resolve_manifest(&manifest)?;
    output_resolved(&resolved, args)
}

/// Validate the manifest and report what a resolution would run.
pub fn run_check(manifest: &RouteManifest) -> Result<()> {
    let generators = manifest
        .segments
        .iter()
        .filter(|s| s.generate.is_some() && !s.client)
        .count();
    let assets: usize = manifest
        .segments
        .iter()
        .map(|s| s.icon.len() + s.apple.len() + s.open_graph.len() + s.twitter.len())
        .sum();
    log!(
        "check";
        "{} segment(s), {} generator(s), {} static asset(s)",
        manifest.segments.len(),
        generators,
        assets
    );
    Ok(())
}

fn apply_overrides(manifest: &mut RouteManifest, args: &ResolveArgs) {
    for (name, value) in &args.params {
        manifest.props.params.insert(name.clone(), value.clone());
    }
    for (name, value) in &args.search_params {
        manifest
            .props
            .search_params
            .insert(name.clone(), value.clone());
    }
    if let Some(snapshot) = args.snapshot {
        manifest.resolve.snapshot = snapshot.into();
    }
}

/// Resolve on a single-threaded runtime: generators interleave, never run
/// in parallel.
pub fn resolve_manifest(manifest: &RouteManifest) -> Result<ResolvedMetadata> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let (segments, loader) = manifest.route();
    debug!("resolve"; "{} segment(s), snapshot {:?}", segments.len(), manifest.resolve.snapshot);

    let resolved = runtime.block_on(resolve_metadata(&segments, &loader, &manifest.options()))?;
    Ok(resolved)
}

fn output_resolved(resolved: &ResolvedMetadata, args: &ResolveArgs) -> Result<()> {
    let output = format_resolved(resolved, args.fields.as_deref(), args.filter_empty)?;
    let formatted = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };

    // Output to file or stdout
    if let Some(ref output_path) = args.output {
        let mut file = fs::File::create(output_path)
            .with_context(|| format!("Failed to create {}", output_path.display()))?;
        writeln!(file, "{formatted}")?;
        log!("resolve"; "wrote output to {}", output_path.display());
    } else {
        println!("{formatted}");
    }
    Ok(())
}

/// Serialize, optionally keeping only `fields` and dropping empty values.
fn format_resolved(
    resolved: &ResolvedMetadata,
    fields: Option<&[String]>,
    filter_empty: bool,
) -> Result<JsonValue> {
    let JsonValue::Object(all) = serde_json::to_value(resolved)? else {
        return Ok(JsonValue::Null);
    };

    let mut obj = Map::new();
    match fields {
        Some(fields) => {
            for field in fields {
                match all.get(field) {
                    Some(value) if !filter_empty || !is_empty_value(value) => {
                        obj.insert(field.clone(), value.clone());
                    }
                    Some(_) => {}
                    // Requested but unknown: show null when not filtering
                    None if !filter_empty => {
                        obj.insert(field.clone(), JsonValue::Null);
                    }
                    None => {}
                }
            }
        }
        None => {
            for (key, value) in all {
                if !filter_empty || !is_empty_value(&value) {
                    obj.insert(key, value);
                }
            }
        }
    }
    Ok(JsonValue::Object(obj))
}

/// Check if a JSON value is considered "empty" (null, "", [] or {})
fn is_empty_value(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::String(s) => s.is_empty(),
        JsonValue::Array(arr) => arr.is_empty(),
        JsonValue::Object(map) => map.is_empty(),
        _ => false,
    }
}
