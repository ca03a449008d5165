//! Live wikilink, tag and backlink index for a workspace of markdown notes.
//!
//! The host feeds note text in through [`index::Indexer`] (hydration plus
//! change notifications) and queries immutable [`index::IndexSnapshot`]s for
//! definitions, backlinks and completion candidates.

pub mod backlinks;
pub mod config;
pub mod index;
pub mod links;
pub mod resolve;
pub mod store;
pub mod vault;
