use delex_protocol::{
    AnnotatedToken, Aspect, DeterminerFeatureTag, DeterminerForm, GrammaticalFeatureTag, Number, Person,
    Tense, VerbTags, Voice,
};

use crate::rules::{self, MAX_CHAIN};

/// Aligned tokens, lemmas and tags of one verb group, starting at token `start`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerbGroup<'a> {
    pub start: usize,
    pub tokens: Vec<&'a str>,
    pub lemmas: Vec<&'a str>,
    pub tags: Vec<&'a str>,
}

impl<'a> VerbGroup<'a> {
    pub fn new(start: usize) -> Self {
        Self {
            start,
            ..Self::default()
        }
    }

    pub fn from_tokens(start: usize, tokens: &'a [AnnotatedToken]) -> Self {
        let mut group = Self::new(start);
        for token in tokens {
            group.push_token(token);
        }
        group
    }

    pub fn push(&mut self, token: &'a str, lemma: &'a str, tag: &'a str) {
        self.tokens.push(token);
        self.lemmas.push(lemma);
        self.tags.push(tag);
    }

    pub fn push_token(&mut self, token: &'a AnnotatedToken) {
        self.push(&token.text, &token.lemma, &token.tag);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Index of the last token, or `start` for an empty group.
    pub fn last_index(&self) -> usize {
        self.start + self.len().saturating_sub(1)
    }

    /// Space-joined surface, as stored in the dictionary (lowercased there).
    pub fn surface(&self) -> String {
        self.tokens.join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A rule of the decision table matched.
    Matched,
    /// Modeled length, no rule matched; the default features were used.
    Fallback,
    /// Empty or longer than any modeled chain; the default features were used.
    Unmodeled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbClassification {
    pub tag: GrammaticalFeatureTag,
    pub outcome: Outcome,
}

/// Classifies a verb group. Total: windows without a rule get
/// `{simple, present, active}` and are reported through `outcome`.
pub fn classify_verb_group(group: &VerbGroup<'_>) -> VerbClassification {
    let tags: Vec<VerbTags> = group
        .tags
        .iter()
        .zip(&group.lemmas)
        .map(|(tag, lemma)| crate::tags::verbal_tags(tag, lemma))
        .collect();

    let (aspect, tense, voice, outcome) = if group.is_empty() || group.len() > MAX_CHAIN {
        (Aspect::Simple, Tense::Present, Voice::Active, Outcome::Unmodeled)
    } else {
        match rules::lookup(&tags, &group.lemmas) {
            Some(rule) => (rule.aspect, rule.tense, rule.voice, Outcome::Matched),
            None => (Aspect::Simple, Tense::Present, Voice::Active, Outcome::Fallback),
        }
    };

    let lemma = match (group.lemmas.last(), group.tokens.last()) {
        (Some(lemma), _) if !lemma.is_empty() => lemma.to_string(),
        (_, Some(token)) => token.to_lowercase(),
        _ => String::new(),
    };

    VerbClassification {
        tag: GrammaticalFeatureTag {
            aspect,
            tense,
            voice,
            person: person_of(group),
            number: number_of(group),
            lemma,
        },
        outcome,
    }
}

/// Person only depends on the first tag of the group.
fn person_of(group: &VerbGroup<'_>) -> Person {
    match group.tags.first().copied() {
        Some("VBZ") => Person::Third,
        Some("VBP") => Person::NonThird,
        _ => Person::Null,
    }
}

/// Number is only read off forms of "be" leading the group.
fn number_of(group: &VerbGroup<'_>) -> Number {
    let (Some(token), Some(lemma)) = (group.tokens.first(), group.lemmas.first()) else {
        return Number::Null;
    };
    if !lemma.eq_ignore_ascii_case("be") {
        return Number::Null;
    }

    match token.to_lowercase().as_str() {
        "am" | "is" | "was" | "'m" | "'s" => Number::Singular,
        "are" | "were" | "'re" => Number::Plural,
        _ => Number::Null,
    }
}

/// Classifies a determiner by its surface form, case-insensitively.
/// Unknown determiners ("all", "some", "no") count as defined.
pub fn classify_determiner(token: &str, lemma: &str) -> DeterminerFeatureTag {
    let form = match token.to_lowercase().as_str() {
        "a" | "an" => DeterminerForm::Undefined,
        "the" => DeterminerForm::Defined,
        "this" | "that" | "these" | "those" => DeterminerForm::Demonstrative,
        _ => DeterminerForm::Defined,
    };

    let lemma = if lemma.is_empty() {
        token.to_lowercase()
    } else {
        lemma.to_string()
    };

    DeterminerFeatureTag { form, lemma }
}
