//! Reference data types shared by the parser, the store and the indices.

use serde::Serialize;

/// Byte range of a token in a note's text. `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Default)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Whether a cursor at `offset` touches this range (both ends inclusive).
    pub fn touches(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

/// Kind of reference found in a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// `[[label]]`
    WikiLink,
    /// `[[label|description]]`, in either configured direction.
    PipedWikiLink,
    /// `#tag`
    Tag,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WikiLink => "wikilink",
            Self::PipedWikiLink => "pipedwikilink",
            Self::Tag => "tag",
        }
    }

    /// Whether references of this kind point at notes.
    pub fn is_link(&self) -> bool {
        matches!(self, Self::WikiLink | Self::PipedWikiLink)
    }
}

/// A reference as found by the parser, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawReference {
    pub kind: ReferenceKind,
    /// The file-identifying label (tag text for tags).
    pub raw_label: String,
    /// Description half of a piped wikilink.
    pub display_label: Option<String>,
    /// Heading part of `[[label#heading]]`.
    pub anchor: Option<String>,
    /// Range of the whole token, brackets or `#` included.
    pub range: TextRange,
    /// Line number of the token (1-based).
    pub line: u32,
}

/// A reference owned by a note, carrying its normalized key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Reference {
    pub source_path: String,
    pub kind: ReferenceKind,
    pub raw_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    pub normalized_key: String,
    pub range: TextRange,
    pub line: u32,
}

impl Reference {
    pub fn from_raw(raw: RawReference, source_path: &str, normalized_key: String) -> Self {
        Self {
            source_path: source_path.to_string(),
            kind: raw.kind,
            raw_label: raw.raw_label,
            display_label: raw.display_label,
            anchor: raw.anchor,
            normalized_key,
            range: raw.range,
            line: raw.line,
        }
    }
}
