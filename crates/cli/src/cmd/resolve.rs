//! Resolve command implementation.

use std::path::Path;

use serde::Serialize;

use super::output::print_json;
use crate::{OutputFormat, ResolveArgs};

#[derive(Debug, Serialize)]
struct Resolution {
    label: String,
    path: String,
    /// Whether a note already exists at `path`.
    exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<String>,
}

pub fn run(config: Option<&Path>, profile: Option<&str>, args: ResolveArgs) {
    let ws = super::open_workspace(config, profile);
    let snap = ws.indexer.snapshot();

    let Some(path) = snap.resolve_or_synthesize(&args.label) else {
        eprintln!("Label '{}' does not name a note", args.label);
        std::process::exit(1);
    };

    let resolution = Resolution {
        exists: snap.note(&path).is_some(),
        preview: args.preview.then(|| snap.preview_label(&args.label)),
        label: args.label,
        path,
    };

    match args.output.format() {
        OutputFormat::Json => print_json(&resolution),
        OutputFormat::Quiet => println!("{}", resolution.path),
        OutputFormat::Table => {
            let status = if resolution.exists { "existing" } else { "new" };
            println!("{} ({})", resolution.path, status);
            if let Some(preview) = &resolution.preview {
                println!("preview: {}", preview);
            }
        }
    }
}
