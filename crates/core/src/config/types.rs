use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    pub profile: Option<String>,
    pub profiles: HashMap<String, Profile>,
    #[serde(default)]
    pub links: LinkConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct Profile {
    pub vault_root: String,
    /// Folders to exclude from indexing (relative to vault_root).
    #[serde(default)]
    pub excluded_folders: Vec<String>,
}

/// Character treated as interchangeable with a space in labels and file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum SlugifyCharacter {
    #[default]
    #[serde(rename = "-")]
    Dash,
    #[serde(rename = "_")]
    Underscore,
    #[serde(rename = "NONE", alias = "none")]
    None,
}

impl SlugifyCharacter {
    pub fn as_char(self) -> Option<char> {
        match self {
            Self::Dash => Some('-'),
            Self::Underscore => Some('_'),
            Self::None => None,
        }
    }
}

/// Wrapper applied to wikilink labels when rendered in previews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum PreviewLabelStyling {
    #[default]
    #[serde(rename = "[[label]]")]
    DoubleBrackets,
    #[serde(rename = "[label]")]
    SingleBrackets,
    #[serde(rename = "label")]
    Plain,
}

/// Which half of a piped wikilink names the target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum PipedWikiLinksSyntax {
    /// `[[file|description]]`
    #[default]
    #[serde(rename = "file|desc")]
    FileThenDescription,
    /// `[[description|file]]`
    #[serde(rename = "desc|file")]
    DescriptionThenFile,
}

/// Options controlling how links are parsed, matched and displayed.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    #[serde(default)]
    pub slugify_character: SlugifyCharacter,
    #[serde(default = "default_file_extension")]
    pub default_file_extension: String,
    #[serde(default)]
    pub show_file_extension_in_preview: bool,
    #[serde(default)]
    pub preview_label_styling: PreviewLabelStyling,
    #[serde(default)]
    pub piped_wikilinks_syntax: PipedWikiLinksSyntax,
    #[serde(default = "default_piped_separator")]
    pub piped_wikilinks_separator: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            slugify_character: SlugifyCharacter::default(),
            default_file_extension: default_file_extension(),
            show_file_extension_in_preview: false,
            preview_label_styling: PreviewLabelStyling::default(),
            piped_wikilinks_syntax: PipedWikiLinksSyntax::default(),
            piped_wikilinks_separator: default_piped_separator(),
        }
    }
}

fn default_file_extension() -> String {
    "md".to_string()
}

fn default_piped_separator() -> String {
    "|".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub active_profile: String,
    pub vault_root: PathBuf,
    /// Folders to exclude from indexing (relative to vault_root).
    pub excluded_folders: Vec<PathBuf>,
    pub links: LinkConfig,
    pub logging: LoggingConfig,
}
