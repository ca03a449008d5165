//! In-memory link index with snapshot reads.
//!
//! The [`Indexer`] is the only writer. It publishes [`IndexSnapshot`]s that
//! readers query without blocking further changes.
//!
//! # Example
//!
//! ```
//! use notegraph_core::config::LinkConfig;
//! use notegraph_core::index::Indexer;
//!
//! let indexer = Indexer::new(LinkConfig::default());
//! indexer.hydrate(
//!     vec![
//!         ("apple.md".to_string(), String::new()),
//!         ("banana.md".to_string(), "See [[Apple]].".to_string()),
//!     ],
//!     None,
//! );
//!
//! let snap = indexer.snapshot();
//! assert_eq!(snap.definition_for("apple").map(|l| l.path), Some("apple.md".to_string()));
//! assert_eq!(snap.references_for("apple.md").len(), 1);
//! ```

pub mod indexer;
pub mod snapshot;
pub mod types;

pub use indexer::Indexer;
pub use snapshot::IndexSnapshot;
pub use types::{
    Completion, Definition, HydrateOutcome, IndexStats, Location, ProgressCallback, TagSummary,
};
