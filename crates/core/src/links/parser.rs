//! Lexical extraction of wikilinks and tags from note text.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::types::{RawReference, ReferenceKind, TextRange};
use crate::config::{LinkConfig, PipedWikiLinksSyntax};

/// Notes larger than this are indexed without references.
pub const MAX_NOTE_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("content looks binary (NUL byte at offset {0})")]
    BinaryContent(usize),

    #[error("content is {size} bytes, above the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },
}

static WIKILINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Matches [[anything without brackets]]; piping and anchors are split afterwards
    Regex::new(r"\[\[([^\[\]\n]*)\]\]").unwrap()
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    // #tag at line start or after whitespace / opening paren
    Regex::new(r"(?:^|[\s(])(#[\p{L}\p{N}_/-]+)").unwrap()
});

static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`]*`").unwrap());

/// Extracts references from note text.
///
/// The parser holds only configuration, so one instance can be shared and
/// called any number of times.
#[derive(Debug, Clone)]
pub struct ReferenceParser {
    separator: String,
    syntax: PipedWikiLinksSyntax,
}

impl ReferenceParser {
    pub fn new(cfg: &LinkConfig) -> Self {
        Self {
            separator: cfg.piped_wikilinks_separator.clone(),
            syntax: cfg.piped_wikilinks_syntax,
        }
    }

    /// Parse all references in `text`, ordered by position.
    pub fn parse(&self, text: &str) -> Result<Vec<RawReference>, ParseError> {
        if text.len() > MAX_NOTE_BYTES {
            return Err(ParseError::TooLarge { size: text.len(), limit: MAX_NOTE_BYTES });
        }
        if let Some(pos) = text.find('\0') {
            return Err(ParseError::BinaryContent(pos));
        }

        let mut refs = Vec::new();
        let mut fence: Option<char> = None;
        let mut offset = 0;

        for (idx, raw_line) in text.split_inclusive('\n').enumerate() {
            let line_start = offset;
            offset += raw_line.len();
            let line = raw_line.trim_end_matches(['\n', '\r']);
            let line_number = (idx + 1) as u32;

            if let Some(marker) = fence_marker(line) {
                match fence {
                    None => fence = Some(marker),
                    Some(open) if open == marker => fence = None,
                    Some(_) => {}
                }
                continue;
            }
            if fence.is_some() {
                continue;
            }

            self.parse_line(line, line_start, line_number, &mut refs);
        }

        Ok(refs)
    }

    fn parse_line(
        &self,
        line: &str,
        base: usize,
        line_number: u32,
        out: &mut Vec<RawReference>,
    ) {
        let code: Vec<Range<usize>> =
            INLINE_CODE_RE.find_iter(line).map(|m| m.range()).collect();
        let in_code = |r: &Range<usize>| overlaps_any(r, &code);

        let mut link_spans = Vec::new();
        let mut found = Vec::new();

        for cap in WIKILINK_RE.captures_iter(line) {
            let Some(whole) = cap.get(0) else { continue };
            if in_code(&whole.range()) {
                continue;
            }
            link_spans.push(whole.range());

            let inner = cap.get(1).map(|m| m.as_str()).unwrap_or("");
            let range = TextRange::new(base + whole.start(), base + whole.end());
            if let Some(reference) = self.wikilink(inner, range, line_number) {
                found.push(reference);
            }
        }

        for cap in TAG_RE.captures_iter(line) {
            let Some(tag) = cap.get(1) else { continue };
            if in_code(&tag.range()) || overlaps_any(&tag.range(), &link_spans) {
                continue;
            }

            let label = &tag.as_str()[1..];
            // #123 is an issue number, not a tag
            if label.chars().all(char::is_numeric) {
                continue;
            }

            found.push(RawReference {
                kind: ReferenceKind::Tag,
                raw_label: label.to_string(),
                display_label: None,
                anchor: None,
                range: TextRange::new(base + tag.start(), base + tag.end()),
                line: line_number,
            });
        }

        found.sort_by_key(|r| r.range.start);
        out.extend(found);
    }

    fn wikilink(&self, inner: &str, range: TextRange, line: u32) -> Option<RawReference> {
        let (kind, target, description) = match inner.split_once(self.separator.as_str()) {
            Some((left, right)) => {
                let (file, desc) = match self.syntax {
                    PipedWikiLinksSyntax::FileThenDescription => (left, right),
                    PipedWikiLinksSyntax::DescriptionThenFile => (right, left),
                };
                (ReferenceKind::PipedWikiLink, file, non_empty(desc))
            }
            None => (ReferenceKind::WikiLink, inner, None),
        };

        let (label, anchor) = match target.split_once('#') {
            Some((label, anchor)) => (label, non_empty(anchor)),
            None => (target, None),
        };

        let label = label.trim();
        if label.is_empty() {
            return None;
        }

        Some(RawReference {
            kind,
            raw_label: label.to_string(),
            display_label: description,
            anchor,
            range,
            line,
        })
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn overlaps_any(r: &Range<usize>, spans: &[Range<usize>]) -> bool {
    spans.iter().any(|s| s.start < r.end && r.start < s.end)
}

/// Returns the fence character if the line opens or closes a fenced code block.
fn fence_marker(line: &str) -> Option<char> {
    let trimmed = line.trim_start();
    if trimmed.starts_with("```") {
        Some('`')
    } else if trimmed.starts_with("~~~") {
        Some('~')
    } else {
        None
    }
}
