//! Index command implementation.

use std::io::Write;
use std::path::Path;

use notegraph_core::index::ProgressCallback;
use serde::Serialize;

use super::output::print_json;
use crate::{IndexArgs, OutputFormat};

#[derive(Debug, Serialize)]
struct IndexReport<'a> {
    vault_root: String,
    notes: usize,
    unparseable: usize,
    skipped: usize,
    links: usize,
    dangling: usize,
    tags: usize,
    targets: usize,
    duration_ms: u64,
    profile: &'a str,
}

pub fn run(config: Option<&Path>, profile: Option<&str>, args: IndexArgs) {
    let format = args.output.format();

    let verbose = |current: usize, total: usize, path: &str| {
        println!("[{}/{}] {}", current, total, path);
    };
    let counter = |current: usize, total: usize, _path: &str| {
        if current % 50 == 0 || current == total {
            print!("\rIndexing... {}/{}", current, total);
            std::io::stdout().flush().ok();
        }
    };
    let progress: Option<ProgressCallback<'_>> = match format {
        OutputFormat::Table if args.verbose => Some(&verbose),
        OutputFormat::Table => Some(&counter),
        _ => None,
    };

    let ws = super::open_workspace_with_progress(config, profile, progress);
    let snap = ws.indexer.snapshot();
    let report = IndexReport {
        vault_root: ws.config.vault_root.display().to_string(),
        notes: ws.stats.notes,
        unparseable: ws.stats.unparseable,
        skipped: ws.skipped,
        links: ws.stats.links,
        dangling: ws.stats.dangling,
        tags: ws.stats.tags,
        targets: snap.backlink_targets().len(),
        duration_ms: ws.duration_ms,
        profile: &ws.config.active_profile,
    };

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Quiet => println!("{}", report.notes),
        OutputFormat::Table => {
            if !args.verbose && report.notes > 0 {
                println!(); // Newline after progress
            }
            println!("Indexed vault: {}", report.vault_root);
            println!("  Notes indexed:  {}", report.notes);
            if report.unparseable > 0 {
                println!("  Unparseable:    {}", report.unparseable);
            }
            if report.skipped > 0 {
                println!("  Unreadable:     {}", report.skipped);
            }
            println!("  Links:          {}", report.links);
            println!("  Linked notes:   {}", report.targets);
            println!("  Dangling links: {}", report.dangling);
            println!("  Tags:           {}", report.tags);
            println!("  Duration:       {}ms", report.duration_ms);
        }
    }
}
