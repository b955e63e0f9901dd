//! Decision table for auxiliary chains.
//!
//! Each rule is a window of slots, one per token of the verb group. A slot
//! names the tags it accepts and, for auxiliaries, the lemma it requires.
//! Rules are tried in order and the first full match wins.

use delex_protocol::{Aspect, Tense, VerbTags, Voice};

/// Longest auxiliary chain the table models ("will have been being eaten").
pub const MAX_CHAIN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LemmaPredicate {
    Any,
    Be,
    Have,
    Will,
}

impl LemmaPredicate {
    pub fn accepts(self, lemma: &str) -> bool {
        match self {
            LemmaPredicate::Any => true,
            LemmaPredicate::Be => lemma.eq_ignore_ascii_case("be"),
            LemmaPredicate::Have => lemma.eq_ignore_ascii_case("have"),
            LemmaPredicate::Will => lemma.eq_ignore_ascii_case("will"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub tags: VerbTags,
    pub lemma: LemmaPredicate,
}

impl Slot {
    pub fn accepts(&self, tag: VerbTags, lemma: &str) -> bool {
        self.tags.intersects(tag) && self.lemma.accepts(lemma)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub pattern: &'static [Slot],
    pub aspect: Aspect,
    pub tense: Tense,
    pub voice: Voice,
}

impl Rule {
    pub fn matches(&self, tags: &[VerbTags], lemmas: &[&str]) -> bool {
        self.pattern.len() == tags.len()
            && tags.len() == lemmas.len()
            && self
                .pattern
                .iter()
                .zip(tags.iter().zip(lemmas))
                .all(|(slot, (&tag, lemma))| slot.accepts(tag, lemma))
    }
}

const fn slot(tags: VerbTags, lemma: LemmaPredicate) -> Slot {
    Slot { tags, lemma }
}

const fn rule(pattern: &'static [Slot], aspect: Aspect, tense: Tense, voice: Voice) -> Rule {
    Rule {
        pattern,
        aspect,
        tense,
        voice,
    }
}

use Aspect::{Perfect, PerfectProgressive, Progressive, Simple};
use LemmaPredicate::{Any, Be, Have, Will};
use Tense::{Future, Infinitive, Past, PastPerfect, Present};
use Voice::{Active, Passive};

const PRES: VerbTags = VerbTags::PRESENT;
const PAST: VerbTags = VerbTags::PAST;
const FINITE_PRES: VerbTags = VerbTags::VBP.union(VerbTags::VBZ);
const PAST_FORM: VerbTags = VerbTags::VBD.union(VerbTags::VBN);
const VB: VerbTags = VerbTags::VB;
const VBG: VerbTags = VerbTags::VBG;
const VBN: VerbTags = VerbTags::VBN;
const MD: VerbTags = VerbTags::MD;
/// Any verbal tag but the modal: the verb after "will" is not required to be `VB`.
const AFTER_WILL: VerbTags = VerbTags::PRESENT
    .union(VerbTags::VBD)
    .union(VerbTags::VBG)
    .union(VerbTags::VBN);

pub const RULES: &[Rule] = &[
    // Single verbs
    rule(&[slot(VB, Any)], Simple, Infinitive, Active),
    rule(&[slot(FINITE_PRES, Any)], Simple, Present, Active),
    rule(&[slot(PAST_FORM, Any)], Simple, Past, Active),
    rule(&[slot(VBG, Any)], Progressive, Present, Active),
    // One auxiliary
    rule(&[slot(PRES, Be), slot(VBG, Any)], Progressive, Present, Active),
    rule(&[slot(PRES, Have), slot(VBN, Any)], Perfect, Present, Active),
    rule(&[slot(PRES, Be), slot(VBN, Any)], Simple, Present, Passive),
    rule(&[slot(PAST, Be), slot(VBG, Any)], Progressive, Past, Active),
    rule(&[slot(PAST, Have), slot(VBN, Any)], Perfect, Past, Active),
    rule(&[slot(PAST, Be), slot(VBN, Any)], Simple, Past, Passive),
    rule(&[slot(MD, Will), slot(AFTER_WILL, Any)], Simple, Future, Active),
    // Two auxiliaries
    rule(&[slot(PRES, Have), slot(VBN, Be), slot(VBG, Any)], PerfectProgressive, Present, Active),
    rule(&[slot(PRES, Have), slot(VBN, Be), slot(VBN, Any)], Perfect, Present, Passive),
    rule(&[slot(PRES, Be), slot(VBG, Be), slot(VBN, Any)], Progressive, Present, Passive),
    rule(&[slot(PAST, Have), slot(VBN, Be), slot(VBG, Any)], PerfectProgressive, Past, Active),
    rule(&[slot(PAST, Have), slot(VBN, Be), slot(VBN, Any)], Simple, PastPerfect, Passive),
    rule(&[slot(PAST, Be), slot(VBG, Be), slot(VBN, Any)], Progressive, Past, Passive),
    rule(&[slot(MD, Will), slot(AFTER_WILL, Be), slot(VBG, Any)], Progressive, Future, Active),
    rule(&[slot(MD, Will), slot(AFTER_WILL, Be), slot(VBN, Any)], Simple, Future, Passive),
    rule(&[slot(MD, Will), slot(AFTER_WILL, Have), slot(VBN, Any)], Perfect, Future, Active),
    // Three auxiliaries
    rule(
        &[slot(PRES, Have), slot(VBN, Be), slot(VBG, Be), slot(VBN, Any)],
        PerfectProgressive,
        Present,
        Passive,
    ),
    rule(
        &[slot(PAST, Have), slot(VBN, Be), slot(VBG, Be), slot(VBN, Any)],
        PerfectProgressive,
        Past,
        Passive,
    ),
    rule(
        &[slot(MD, Will), slot(AFTER_WILL, Have), slot(VBN, Be), slot(VBG, Any)],
        PerfectProgressive,
        Future,
        Active,
    ),
    rule(
        &[slot(MD, Will), slot(AFTER_WILL, Have), slot(VBN, Be), slot(VBN, Any)],
        Perfect,
        Future,
        Passive,
    ),
    rule(
        &[slot(MD, Will), slot(AFTER_WILL, Be), slot(VBG, Be), slot(VBN, Any)],
        Progressive,
        Future,
        Passive,
    ),
    // Four auxiliaries
    rule(
        &[slot(MD, Will), slot(AFTER_WILL, Have), slot(VBN, Be), slot(VBG, Be), slot(VBN, Any)],
        PerfectProgressive,
        Future,
        Passive,
    ),
];

/// First rule matching the window, if any.
pub fn lookup(tags: &[VerbTags], lemmas: &[&str]) -> Option<&'static Rule> {
    RULES.iter().find(|rule| rule.matches(tags, lemmas))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> Vec<VerbTags> {
        names.iter().map(|t| VerbTags::from_tag(t)).collect()
    }

    fn features(names: &[&str], lemmas: &[&str]) -> Option<(Aspect, Tense, Voice)> {
        lookup(&tags(names), lemmas).map(|r| (r.aspect, r.tense, r.voice))
    }

    #[test]
    fn test_every_rule_fits_the_chain_limit() {
        for rule in RULES {
            assert!(!rule.pattern.is_empty());
            assert!(rule.pattern.len() <= MAX_CHAIN);
        }
    }

    #[test]
    fn test_no_rule_is_shadowed() {
        // A rule whose every slot is covered by an earlier rule of the same
        // length can never fire.
        for (i, later) in RULES.iter().enumerate() {
            for earlier in &RULES[..i] {
                let covered = earlier.pattern.len() == later.pattern.len()
                    && earlier.pattern.iter().zip(later.pattern).all(|(e, l)| {
                        e.tags.contains(l.tags) && (e.lemma == Any || e.lemma == l.lemma)
                    });
                assert!(!covered, "rule {} is shadowed by an earlier rule", i);
            }
        }
    }

    #[test]
    fn test_single_verbs() {
        assert_eq!(features(&["VB"], &["go"]), Some((Simple, Infinitive, Active)));
        assert_eq!(features(&["VBZ"], &["go"]), Some((Simple, Present, Active)));
        assert_eq!(features(&["VBP"], &["go"]), Some((Simple, Present, Active)));
        assert_eq!(features(&["VBD"], &["go"]), Some((Simple, Past, Active)));
        assert_eq!(features(&["VBN"], &["go"]), Some((Simple, Past, Active)));
        assert_eq!(features(&["VBG"], &["go"]), Some((Progressive, Present, Active)));
        assert_eq!(features(&["MD"], &["will"]), None);
    }

    #[test]
    fn test_one_auxiliary() {
        assert_eq!(features(&["VBZ", "VBG"], &["be", "run"]), Some((Progressive, Present, Active)));
        assert_eq!(features(&["VBP", "VBN"], &["have", "eat"]), Some((Perfect, Present, Active)));
        assert_eq!(features(&["VB", "VBN"], &["be", "eat"]), Some((Simple, Present, Passive)));
        assert_eq!(features(&["VBD", "VBG"], &["be", "run"]), Some((Progressive, Past, Active)));
        assert_eq!(features(&["VBD", "VBN"], &["have", "eat"]), Some((Perfect, Past, Active)));
        assert_eq!(features(&["VBD", "VBN"], &["be", "eat"]), Some((Simple, Past, Passive)));
        assert_eq!(features(&["MD", "VB"], &["will", "eat"]), Some((Simple, Future, Active)));
        // "do" support is not modeled
        assert_eq!(features(&["VBZ", "VB"], &["do", "eat"]), None);
    }

    #[test]
    fn test_two_auxiliaries() {
        assert_eq!(
            features(&["VBZ", "VBN", "VBG"], &["have", "be", "run"]),
            Some((PerfectProgressive, Present, Active))
        );
        assert_eq!(
            features(&["VBP", "VBN", "VBN"], &["have", "be", "eat"]),
            Some((Perfect, Present, Passive))
        );
        assert_eq!(
            features(&["VBZ", "VBG", "VBN"], &["be", "be", "eat"]),
            Some((Progressive, Present, Passive))
        );
        assert_eq!(
            features(&["VBD", "VBN", "VBG"], &["have", "be", "run"]),
            Some((PerfectProgressive, Past, Active))
        );
        assert_eq!(
            features(&["VBD", "VBN", "VBN"], &["have", "be", "eat"]),
            Some((Simple, PastPerfect, Passive))
        );
        assert_eq!(
            features(&["VBD", "VBG", "VBN"], &["be", "be", "chase"]),
            Some((Progressive, Past, Passive))
        );
        assert_eq!(
            features(&["MD", "VB", "VBG"], &["will", "be", "run"]),
            Some((Progressive, Future, Active))
        );
        assert_eq!(
            features(&["MD", "VB", "VBN"], &["will", "be", "eat"]),
            Some((Simple, Future, Passive))
        );
        assert_eq!(
            features(&["MD", "VB", "VBN"], &["will", "have", "eat"]),
            Some((Perfect, Future, Active))
        );
    }

    #[test]
    fn test_three_and_four_auxiliaries() {
        assert_eq!(
            features(&["VBZ", "VBN", "VBG", "VBN"], &["have", "be", "be", "eat"]),
            Some((PerfectProgressive, Present, Passive))
        );
        assert_eq!(
            features(&["VBD", "VBN", "VBG", "VBN"], &["have", "be", "be", "eat"]),
            Some((PerfectProgressive, Past, Passive))
        );
        assert_eq!(
            features(&["MD", "VB", "VBN", "VBG"], &["will", "have", "be", "run"]),
            Some((PerfectProgressive, Future, Active))
        );
        assert_eq!(
            features(&["MD", "VB", "VBN", "VBN"], &["will", "have", "be", "eat"]),
            Some((Perfect, Future, Passive))
        );
        assert_eq!(
            features(&["MD", "VB", "VBG", "VBN"], &["will", "be", "be", "eat"]),
            Some((Progressive, Future, Passive))
        );
        assert_eq!(
            features(&["MD", "VB", "VBN", "VBG", "VBN"], &["will", "have", "be", "be", "eat"]),
            Some((PerfectProgressive, Future, Passive))
        );
    }

    #[test]
    fn test_auxiliary_lemmas_are_case_insensitive() {
        assert_eq!(features(&["VBD", "VBN"], &["Be", "eat"]), Some((Simple, Past, Passive)));
        assert_eq!(features(&["MD", "VB"], &["WILL", "go"]), Some((Simple, Future, Active)));
    }

    #[test]
    fn test_will_accepts_any_verb_tag_next() {
        assert_eq!(features(&["MD", "VBP"], &["will", "go"]), Some((Simple, Future, Active)));
        assert_eq!(features(&["MD", "VBD"], &["will", "go"]), Some((Simple, Future, Active)));
        assert_eq!(
            features(&["MD", "VBZ", "VBN"], &["will", "be", "eat"]),
            Some((Simple, Future, Passive))
        );
        assert_eq!(
            features(&["MD", "VBP", "VBN"], &["will", "have", "eat"]),
            Some((Perfect, Future, Active))
        );
        assert_eq!(
            features(&["MD", "VBP", "VBN", "VBG", "VBN"], &["will", "have", "be", "be", "eat"]),
            Some((PerfectProgressive, Future, Passive))
        );
        // The slot after "will" still has to hold the right auxiliary.
        assert_eq!(features(&["MD", "VBZ", "VBN"], &["will", "do", "eat"]), None);
        assert_eq!(features(&["MD", "MD"], &["will", "will"]), None);
    }

    #[test]
    fn test_unmatched_windows() {
        assert_eq!(features(&["VBD", "VBN", "VBN"], &["be", "be", "eat"]), None);
        assert_eq!(features(&["VBZ", "VBZ"], &["be", "be"]), None);
        assert_eq!(features(&[], &[]), None);
        assert_eq!(features(&["VB"; 6], &["be"; 6]), None);
        // Misaligned windows never match.
        assert_eq!(features(&["VBZ"], &[]), None);
    }
}
