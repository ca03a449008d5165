//! Complete command implementation.

use std::path::Path;

use super::output::print;
use crate::CompleteArgs;

pub fn run(config: Option<&Path>, profile: Option<&str>, args: CompleteArgs) {
    let ws = super::open_workspace(config, profile);
    let mut candidates = ws.indexer.snapshot().completion_candidates_for(&args.partial);
    if let Some(limit) = args.limit {
        candidates.truncate(limit);
    }
    print(&candidates, "completions", args.output.format());
}
