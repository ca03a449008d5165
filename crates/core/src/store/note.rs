//! A single indexed note.

use std::sync::Arc;

use crate::links::{Normalizer, Reference, ReferenceParser};

/// Whether a note's text could be tokenized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseStatus {
    #[default]
    Parsed,
    /// Indexed with no references.
    Unparseable,
}

/// A note file and the references parsed from its current text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Workspace-relative path with `/` separators.
    pub path: String,
    /// Display title derived from the file name.
    pub title: String,
    /// Comparison key of the file name.
    pub title_key: String,
    /// Comparison key of the whole relative path.
    pub path_key: String,
    pub raw_text: Arc<str>,
    pub references: Vec<Reference>,
    pub status: ParseStatus,
}

impl Note {
    /// Build a note from its (already normalized) path and text.
    pub fn analyze(
        path: &str,
        text: &str,
        parser: &ReferenceParser,
        normalizer: &Normalizer,
    ) -> Self {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let title = normalizer.normalize(file_name);

        let (references, status) = match parser.parse(text) {
            Ok(raw) => {
                let refs = raw
                    .into_iter()
                    .map(|r| {
                        let key = normalizer.key(&r.raw_label);
                        Reference::from_raw(r, path, key)
                    })
                    .collect();
                (refs, ParseStatus::Parsed)
            }
            Err(e) => {
                tracing::warn!("Indexing {} without references: {}", path, e);
                (Vec::new(), ParseStatus::Unparseable)
            }
        };

        Self {
            path: path.to_string(),
            title: title.display,
            title_key: title.key,
            path_key: normalizer.key(path),
            raw_text: Arc::from(text),
            references,
            status,
        }
    }

    /// References that point at notes (tags excluded).
    pub fn links(&self) -> impl Iterator<Item = &Reference> {
        self.references.iter().filter(|r| r.kind.is_link())
    }
}

/// Canonical form of a workspace-relative path: `/` separators, no leading `./` or `/`.
pub fn normalize_path(path: &str) -> String {
    let mut p = path.trim().replace('\\', "/");
    loop {
        if let Some(rest) = p.strip_prefix("./") {
            p = rest.to_string();
        } else if let Some(rest) = p.strip_prefix('/') {
            p = rest.to_string();
        } else {
            return p;
        }
    }
}
