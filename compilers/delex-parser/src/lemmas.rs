use std::collections::HashMap;

use delex_protocol::Sentence;

/// Token text -> lemma lookup used to decorate terminal nodes.
///
/// Lookups are best effort: a token the table does not know gets an empty
/// lemma. When a token occurs twice with different lemmas the later one wins.
#[derive(Debug, Clone, Default)]
pub struct LemmaTable {
    map: HashMap<String, String>,
}

impl LemmaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zips aligned token and lemma columns. Extra entries on either side are ignored.
    pub fn from_pairs<T, L>(tokens: &[T], lemmas: &[L]) -> Self
    where
        T: AsRef<str>,
        L: AsRef<str>,
    {
        let map = tokens
            .iter()
            .zip(lemmas)
            .map(|(t, l)| (t.as_ref().to_string(), l.as_ref().to_string()))
            .collect();
        Self { map }
    }

    pub fn from_sentence(sentence: &Sentence) -> Self {
        let map = sentence
            .tokens
            .iter()
            .map(|t| (t.text.clone(), t.lemma.clone()))
            .collect();
        Self { map }
    }

    pub fn insert(&mut self, token: impl Into<String>, lemma: impl Into<String>) {
        self.map.insert(token.into(), lemma.into());
    }

    pub fn lookup(&self, token: &str) -> &str {
        self.map.get(token).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
