//! References command implementation.

use std::path::Path;

use super::output::print;
use crate::ReferencesArgs;

pub fn run(config: Option<&Path>, profile: Option<&str>, args: ReferencesArgs) {
    let ws = super::open_workspace(config, profile);
    let snap = ws.indexer.snapshot();

    if snap.note(&args.note).is_none() {
        tracing::warn!("{} is not a note in this vault", args.note);
    }

    let refs = snap.references_for(&args.note);
    print(&refs, "references", args.output.format());
}
