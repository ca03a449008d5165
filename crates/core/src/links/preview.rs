//! Display helpers for rendering wikilink labels in previews.

use super::normalize::strip_extension;
use crate::config::{LinkConfig, PreviewLabelStyling};

/// Page name for a raw label: trimmed, one extension removed.
pub fn page_name(label: &str) -> String {
    strip_extension(label.trim()).to_string()
}

/// Label text as shown in a rendered preview.
pub fn preview_label(label: &str, cfg: &LinkConfig) -> String {
    let mut text = strip_extension(label.trim()).to_string();

    if let Some(slug) = cfg.slugify_character.as_char() {
        text = text.replace(slug, " ");
    }
    if cfg.show_file_extension_in_preview {
        text.push('.');
        text.push_str(cfg.default_file_extension.trim_start_matches('.'));
    }

    match cfg.preview_label_styling {
        PreviewLabelStyling::DoubleBrackets => format!("[[{text}]]"),
        PreviewLabelStyling::SingleBrackets => format!("[{text}]"),
        PreviewLabelStyling::Plain => text,
    }
}
