//! Vault file discovery.

pub mod walker;

pub use walker::{SourceFiles, VaultWalker, VaultWalkerError, WalkedFile};
