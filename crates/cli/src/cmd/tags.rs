//! Tags command implementation.

use std::path::Path;

use super::output::print;
use crate::TagsArgs;

pub fn run(config: Option<&Path>, profile: Option<&str>, args: TagsArgs) {
    let ws = super::open_workspace(config, profile);
    let snap = ws.indexer.snapshot();
    let format = args.output.format();

    match args.tag {
        Some(tag) => print(&snap.tagged(&tag), "occurrences", format),
        None => print(&snap.tags(), "tags", format),
    }
}
