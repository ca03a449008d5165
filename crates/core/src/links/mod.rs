//! Wikilink and tag extraction, label normalization and preview labels.
//!
//! Everything in this module is pure: the same text and configuration always
//! produce the same references and keys.

pub mod normalize;
pub mod parser;
pub mod preview;
pub mod types;

pub use normalize::{NormalizedLabel, Normalizer};
pub use parser::{MAX_NOTE_BYTES, ParseError, ReferenceParser};
pub use preview::{page_name, preview_label};
pub use types::{RawReference, Reference, ReferenceKind, TextRange};
