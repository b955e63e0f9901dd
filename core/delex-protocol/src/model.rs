use rkyv::{Archive, Deserialize, Serialize};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// One token as delivered by the annotation service.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct AnnotatedToken {
    pub text: String,
    pub lemma: String,
    pub tag: String,
}

impl AnnotatedToken {
    pub fn new(text: impl Into<String>, lemma: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lemma: lemma.into(),
            tag: tag.into(),
        }
    }
}

/// A tagged sentence, with its bracketed constituency parse when one was produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Sentence {
    pub tokens: Vec<AnnotatedToken>,
    pub parse: Option<String>,
}

impl Sentence {
    pub fn new(tokens: Vec<AnnotatedToken>, parse: Option<String>) -> Self {
        Self { tokens, parse }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[archive(check_bytes)]
pub enum TemplateEntry {
    Literal(String),
    Tag(String),
}

impl TemplateEntry {
    pub fn as_str(&self) -> &str {
        match self {
            TemplateEntry::Literal(s) | TemplateEntry::Tag(s) => s,
        }
    }

    pub fn is_tag(&self) -> bool {
        matches!(self, TemplateEntry::Tag(_))
    }
}

/// Literal tokens interleaved with rendered feature tags, in surface order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[archive(check_bytes)]
pub struct Template {
    pub entries: Vec<TemplateEntry>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_literal(&mut self, token: impl Into<String>) {
        self.entries.push(TemplateEntry::Literal(token.into()));
    }

    pub fn push_tag(&mut self, tag: impl Into<String>) {
        self.entries.push(TemplateEntry::Tag(tag.into()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, TemplateEntry> {
        self.entries.iter()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter(|e| e.is_tag()).map(TemplateEntry::as_str)
    }

    pub fn extend(&mut self, other: Template) {
        self.entries.extend(other.entries);
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(entry.as_str())?;
        }
        Ok(())
    }
}

/// Pairs a rendered tag with the lowercased surface it replaced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct DictionaryEntry {
    pub tag: String,
    pub surface: String,
}

impl DictionaryEntry {
    pub fn new(tag: impl Into<String>, surface: &str) -> Self {
        Self {
            tag: tag.into(),
            surface: surface.to_lowercase(),
        }
    }
}

/// Something the lexicalizer could not model faithfully. The sentence still
/// gets a template; these are reported so callers can count them.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub enum Diagnostic {
    /// Verb group longer than any modeled auxiliary chain.
    UnmodeledVerbGroup { start: usize, len: usize },
    /// Modeled length, but no rule matched the tag/lemma window.
    FallbackPattern { start: usize, tags: String },
    /// The parse was unusable; grouping fell back to contiguous runs.
    ParseDiscarded { reason: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnmodeledVerbGroup { start, len } => {
                write!(f, "verb group of {} tokens at {} is not modeled", len, start)
            }
            Diagnostic::FallbackPattern { start, tags } => {
                write!(f, "no rule for verb group [{}] at {}", tags, start)
            }
            Diagnostic::ParseDiscarded { reason } => write!(f, "parse discarded: {}", reason),
        }
    }
}

/// Template, realization dictionary and diagnostics for one sentence or document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Lexicalization {
    pub template: Template,
    pub dictionary: Vec<DictionaryEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Lexicalization {
    pub fn emit_literal(&mut self, token: &str) {
        self.template.push_literal(token);
    }

    pub fn emit_tag(&mut self, tag: impl ToString, surface: &str) {
        let tag = tag.to_string();
        self.dictionary.push(DictionaryEntry::new(tag.clone(), surface));
        self.template.push_tag(tag);
    }

    pub fn append(&mut self, other: Lexicalization) {
        self.template.extend(other.template);
        self.dictionary.extend(other.dictionary);
        self.diagnostics.extend(other.diagnostics);
    }

    /// Substitutes every tag with its paired surface and lowercases the
    /// literals. `None` when the dictionary does not pair up with the tags.
    pub fn realize(&self) -> Option<Vec<String>> {
        let mut surfaces = self.dictionary.iter();
        let mut words = Vec::new();

        for entry in self.template.iter() {
            match entry {
                TemplateEntry::Literal(token) => words.push(token.to_lowercase()),
                TemplateEntry::Tag(tag) => {
                    let paired = surfaces.next()?;
                    if &paired.tag != tag {
                        return None;
                    }
                    words.extend(paired.surface.split_whitespace().map(String::from));
                }
            }
        }

        match surfaces.next() {
            Some(_) => None,
            None => Some(words),
        }
    }
}
