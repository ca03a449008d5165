//! Definition command implementation.

use std::path::Path;

use super::output::print;
use crate::DefinitionArgs;

pub fn run(config: Option<&Path>, profile: Option<&str>, args: DefinitionArgs) {
    let ws = super::open_workspace(config, profile);
    let snap = ws.indexer.snapshot();
    let format = args.output.format();

    if let (Some(file), Some(offset)) = (args.file.as_deref(), args.offset) {
        if snap.note(file).is_none() {
            eprintln!("Note not found in vault: {}", file);
            std::process::exit(1);
        }
        let Some(reference) = snap.reference_at(file, offset) else {
            eprintln!("No link at {}:{}", file, offset);
            std::process::exit(1);
        };
        tracing::debug!("Cursor is on {:?} [[{}]]", reference.kind, reference.raw_label);

        let found: Vec<_> = snap.definition_at(file, offset).into_iter().collect();
        print(&found, "definitions", format);
        if found.is_empty() {
            std::process::exit(1);
        }
        return;
    }

    let label = args.label.unwrap_or_default();
    let mut found = snap.definitions_for(&label);
    if !args.all {
        found.truncate(1);
    }
    print(&found, "definitions", format);

    // A dangling label is an answer, not an error; signal it through the exit code
    if found.is_empty() {
        std::process::exit(1);
    }
}
