//! Label normalization: the canonical comparison key for links, titles and paths.

use crate::config::LinkConfig;

/// A label folded for comparison, with a display form that keeps the original case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedLabel {
    /// Case-folded comparison key.
    pub key: String,
    /// Same folding as `key`, original case retained.
    pub display: String,
}

/// Folds labels into comparison keys.
///
/// A key has no file extension, no leading `./`, uses `/` as path separator,
/// treats the configured slug character as a space, collapses whitespace and
/// is lowercase. Normalizing a key yields the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    slug: Option<char>,
}

impl Normalizer {
    pub fn new(cfg: &LinkConfig) -> Self {
        Self { slug: cfg.slugify_character.as_char() }
    }

    pub fn slug(&self) -> Option<char> {
        self.slug
    }

    pub fn normalize(&self, label: &str) -> NormalizedLabel {
        let unified: String = label
            .chars()
            .map(|c| match c {
                '\\' => '/',
                c if Some(c) == self.slug => ' ',
                c => c,
            })
            .collect();
        let mut display = unified.split_whitespace().collect::<Vec<_>>().join(" ");

        loop {
            let before = display.len();
            if let Some(rest) = display.strip_prefix("./") {
                display = rest.trim_start().to_string();
            }
            display = strip_extension(&display).trim_end().to_string();
            if display.len() == before {
                break;
            }
        }

        let key = display.to_lowercase();
        NormalizedLabel { key, display }
    }

    /// Shorthand for `normalize(label).key`.
    pub fn key(&self, label: &str) -> String {
        self.normalize(label).key
    }
}

/// Strip one trailing extension-like suffix: the last dot-segment that holds
/// no path separator, no whitespace and at least one non-digit, and that does
/// not start the name. `2024.01.15` and `v1.2` are kept whole.
pub(crate) fn strip_extension(s: &str) -> &str {
    let Some(idx) = s.rfind('.') else {
        return s;
    };
    let suffix = &s[idx + 1..];
    if suffix.is_empty()
        || suffix.contains(['/', '\\'])
        || suffix.contains(char::is_whitespace)
        || suffix.chars().all(|c| c.is_ascii_digit())
    {
        return s;
    }
    match s[..idx].chars().next_back() {
        None | Some('/') | Some('\\') => s,
        Some(_) => &s[..idx],
    }
}
