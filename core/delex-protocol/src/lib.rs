#![no_std] // Shared by every crate in the workspace, keeps no std requirement

extern crate alloc;

// Enable std if the feature is active (for tests/tools)
#[cfg(feature = "std")]
extern crate std;

pub mod features;
pub mod ids;

// Re-export core types for convenience
pub use features::*;
pub use ids::NodeId;

pub mod model;
pub use model::*;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use rkyv::{from_bytes, to_bytes};

    fn progressive_past_passive() -> GrammaticalFeatureTag {
        GrammaticalFeatureTag {
            aspect: Aspect::Progressive,
            tense: Tense::Past,
            voice: Voice::Passive,
            person: Person::Null,
            number: Number::Singular,
            lemma: "chase".to_string(),
        }
    }

    #[test]
    fn test_verb_tag_rendering() {
        assert_eq!(
            progressive_past_passive().to_string(),
            "VP[aspect=progressive,tense=past,voice=passive,person=null,number=singular] chase"
        );
    }

    #[test]
    fn test_determiner_tag_rendering() {
        let tag = DeterminerFeatureTag {
            form: DeterminerForm::Demonstrative,
            lemma: "those".to_string(),
        };
        assert_eq!(tag.to_string(), "DT[form=demonstrative] those");
    }

    #[test]
    fn test_past_perfect_keeps_its_space() {
        assert_eq!(Tense::PastPerfect.as_str(), "past perfect");
        assert_eq!(Aspect::PerfectProgressive.as_str(), "perfect-progressive");
    }

    #[test]
    fn test_verb_tags_from_tag() {
        assert_eq!(VerbTags::from_tag("VBZ"), VerbTags::VBZ);
        assert!(VerbTags::PRESENT.contains(VerbTags::VB));
        assert!(VerbTags::PRESENT.contains(VerbTags::VBP));
        assert!(!VerbTags::PRESENT.contains(VerbTags::VBD));
        assert!(VerbTags::from_tag("NN").is_empty());
        assert!(VerbTags::from_tag("vbz").is_empty());
    }

    #[test]
    fn test_enum_serialization() {
        let original = Tense::Future;
        let bytes = to_bytes::<_, 256>(&original).expect("Failed to serialize Tense");
        let deserialized: Tense = from_bytes(&bytes).expect("Failed to deserialize Tense");
        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_lexicalization_serialization() {
        let mut lex = Lexicalization::default();
        lex.emit_tag(progressive_past_passive(), "was being chased");
        lex.emit_literal(".");
        lex.diagnostics.push(Diagnostic::ParseDiscarded { reason: "unbalanced".to_string() });

        let bytes = to_bytes::<_, 1024>(&lex).expect("Failed to serialize Lexicalization");
        let deserialized: Lexicalization = from_bytes(&bytes).expect("Failed to deserialize Lexicalization");
        assert_eq!(lex, deserialized);
    }

    #[test]
    fn test_id_layout() {
        assert_eq!(core::mem::size_of::<NodeId>(), 4);
        assert_eq!(NodeId::from(7u32), NodeId::new(7));
    }

    #[test]
    fn test_dictionary_entry_lowercases_surface() {
        let entry = DictionaryEntry::new("DT[form=defined] the", "The");
        assert_eq!(entry.surface, "the");
    }

    #[test]
    fn test_realize_substitutes_tags_in_order() {
        let mut lex = Lexicalization::default();
        lex.emit_tag("DT[form=defined] the", "The");
        lex.emit_literal("Cat");
        lex.emit_tag("VP[aspect=simple,tense=present,voice=active,person=3rd,number=null] sleep", "sleeps");

        let words = lex.realize().expect("tags and dictionary pair up");
        assert_eq!(words, vec!["the", "cat", "sleeps"]);
        assert_eq!(lex.template.tags().count(), 2);
    }

    #[test]
    fn test_realize_rejects_unpaired_dictionary() {
        let mut lex = Lexicalization::default();
        lex.emit_tag("DT[form=defined] the", "the");
        lex.dictionary.push(DictionaryEntry::new("DT[form=undefined] a", "a"));
        assert!(lex.realize().is_none());

        let mut swapped = Lexicalization::default();
        swapped.template.push_tag(String::from("DT[form=undefined] a"));
        swapped.dictionary.push(DictionaryEntry::new("DT[form=defined] the", "the"));
        assert!(swapped.realize().is_none());
    }

    #[test]
    fn test_template_display() {
        let mut template = Template::new();
        template.push_tag("DT[form=undefined] a");
        template.push_literal("dog");
        assert_eq!(template.to_string(), "DT[form=undefined] a dog");
    }
}
