use serde::{Deserialize, Serialize};

use crate::builder::DEFAULT_PHRASE_LABEL;

/// Which algorithm turns a sentence into a template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Left-to-right scan over the tagged tokens, using the parse for grouping.
    #[default]
    Flat,
    /// Collapse verb phrases in the parse, then read the template off the tree.
    Tree,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalizerConfig {
    /// Ignore supplied parses and group contiguous runs only.
    pub use_parse: bool,
    /// Label climbed when deciding whether two verbs share a phrase.
    pub phrase_label: String,
    pub mode: Mode,
}

impl Default for LexicalizerConfig {
    fn default() -> Self {
        Self {
            use_parse: true,
            phrase_label: DEFAULT_PHRASE_LABEL.to_string(),
            mode: Mode::Flat,
        }
    }
}
