use std::collections::BTreeMap;

use delex_protocol::DictionaryEntry;
use serde::{Deserialize, Serialize};

/// Tag -> surface -> number of times the surface was observed for the tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceVocabulary {
    entries: BTreeMap<String, BTreeMap<String, usize>>,
}

impl SurfaceVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: &DictionaryEntry) {
        *self
            .entries
            .entry(entry.tag.clone())
            .or_default()
            .entry(entry.surface.clone())
            .or_insert(0) += 1;
    }

    pub fn merge(&mut self, other: SurfaceVocabulary) {
        for (tag, surfaces) in other.entries {
            let counts = self.entries.entry(tag).or_default();
            for (surface, count) in surfaces {
                *counts.entry(surface).or_insert(0) += count;
            }
        }
    }

    pub fn count(&self, tag: &str, surface: &str) -> usize {
        self.entries
            .get(tag)
            .and_then(|s| s.get(surface))
            .copied()
            .unwrap_or(0)
    }

    pub fn surfaces(&self, tag: &str) -> Option<&BTreeMap<String, usize>> {
        self.entries.get(tag)
    }

    /// Most frequent surface for `tag`; ties go to the lexicographically smallest.
    pub fn most_frequent(&self, tag: &str) -> Option<&str> {
        self.entries
            .get(tag)?
            .iter()
            .max_by(|(sa, ca), (sb, cb)| ca.cmp(cb).then_with(|| sb.cmp(sa)))
            .map(|(surface, _)| surface.as_str())
    }

    /// Number of distinct tags.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, usize>)> {
        self.entries.iter().map(|(tag, surfaces)| (tag.as_str(), surfaces))
    }
}

impl<'a> Extend<&'a DictionaryEntry> for SurfaceVocabulary {
    fn extend<I: IntoIterator<Item = &'a DictionaryEntry>>(&mut self, iter: I) {
        for entry in iter {
            self.add(entry);
        }
    }
}

impl<'a> FromIterator<&'a DictionaryEntry> for SurfaceVocabulary {
    fn from_iter<I: IntoIterator<Item = &'a DictionaryEntry>>(iter: I) -> Self {
        let mut vocab = Self::new();
        vocab.extend(iter);
        vocab
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THE: &str = "DT[form=defined] the";

    #[test]
    fn test_counts_duplicates() {
        let entries = vec![
            DictionaryEntry::new(THE, "The"),
            DictionaryEntry::new(THE, "the"),
            DictionaryEntry::new("DT[form=undefined] a", "an"),
        ];
        let vocab: SurfaceVocabulary = entries.iter().collect();

        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.count(THE, "the"), 2);
        assert_eq!(vocab.count(THE, "a"), 0);
        assert_eq!(vocab.most_frequent("DT[form=undefined] a"), Some("an"));
        assert_eq!(vocab.most_frequent("VP[missing]"), None);
    }

    #[test]
    fn test_merge_and_ties() {
        let tag = "VP[aspect=simple,tense=past,voice=active,person=null,number=singular] be";
        let mut left: SurfaceVocabulary = [DictionaryEntry::new(tag, "was")].iter().collect();
        let right: SurfaceVocabulary = [DictionaryEntry::new(tag, "Was"), DictionaryEntry::new(tag, "wa")]
            .iter()
            .collect();

        left.merge(right);
        assert_eq!(left.count(tag, "was"), 2);
        assert_eq!(left.most_frequent(tag), Some("was"));

        let tied: SurfaceVocabulary = [DictionaryEntry::new(THE, "b"), DictionaryEntry::new(THE, "a")]
            .iter()
            .collect();
        assert_eq!(tied.most_frequent(THE), Some("a"));
    }

    #[test]
    fn test_iterates_surfaces() {
        let vocab: SurfaceVocabulary = [DictionaryEntry::new(THE, "the")].iter().collect();
        let seen: Vec<(&str, usize)> = vocab
            .iter()
            .flat_map(|(_, surfaces)| surfaces.iter().map(|(s, c)| (s.as_str(), *c)))
            .collect();
        assert_eq!(seen, vec![("the", 1)]);
    }
}
