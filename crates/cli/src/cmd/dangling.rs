//! Dangling command implementation.

use std::path::Path;

use super::output::print;
use crate::OutputArgs;

pub fn run(config: Option<&Path>, profile: Option<&str>, args: OutputArgs) {
    let ws = super::open_workspace(config, profile);
    let snap = ws.indexer.snapshot();
    print(&snap.dangling_references(), "dangling links", args.format());
}
