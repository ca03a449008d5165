//! Subcommand implementations.
//!
//! Every query command loads the configuration, indexes the vault once and
//! answers a single question from the published snapshot.

pub mod complete;
pub mod dangling;
pub mod definition;
pub mod doctor;
pub mod index;
pub mod output;
pub mod references;
pub mod resolve;
pub mod tags;

use std::path::Path;

use notegraph_core::config::{ConfigLoader, ResolvedConfig};
use notegraph_core::index::{HydrateOutcome, IndexStats, Indexer, ProgressCallback};
use notegraph_core::vault::VaultWalker;

/// An indexed vault ready for queries.
pub struct Workspace {
    pub config: ResolvedConfig,
    pub indexer: Indexer,
    pub stats: IndexStats,
    /// Files found but not readable.
    pub skipped: usize,
    pub duration_ms: u64,
}

/// Load configuration and install logging. Exits on failure.
pub fn load_config(config: Option<&Path>, profile: Option<&str>) -> ResolvedConfig {
    let rc = match ConfigLoader::load(config, profile) {
        Ok(rc) => rc,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = crate::logging::init(&rc.logging) {
        eprintln!("Error creating log file: {}", e);
        std::process::exit(1);
    }
    rc
}

pub fn open_workspace(config: Option<&Path>, profile: Option<&str>) -> Workspace {
    open_workspace_with_progress(config, profile, None)
}

/// Load configuration, read every note in the vault and hydrate an index.
pub fn open_workspace_with_progress(
    config: Option<&Path>,
    profile: Option<&str>,
    progress: Option<ProgressCallback<'_>>,
) -> Workspace {
    let rc = load_config(config, profile);

    let walker = match VaultWalker::with_exclusions(&rc.vault_root, rc.excluded_folders.clone()) {
        Ok(w) => w.with_extension(&rc.links.default_file_extension),
        Err(e) => {
            eprintln!("Error opening vault: {}", e);
            std::process::exit(1);
        }
    };

    let sources = match walker.read_sources() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading vault: {}", e);
            std::process::exit(1);
        }
    };

    let indexer = Indexer::new(rc.links.clone());
    match indexer.hydrate(sources.files, progress) {
        HydrateOutcome::Published { stats, duration_ms } => Workspace {
            config: rc,
            indexer,
            stats,
            skipped: sources.skipped,
            duration_ms,
        },
        HydrateOutcome::Superseded => {
            eprintln!("Indexing was cancelled");
            std::process::exit(1);
        }
    }
}
