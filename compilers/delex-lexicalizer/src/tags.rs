use delex_protocol::VerbTags;

pub const DETERMINER_TAG: &str = "DT";

/// Verbal flag of a token. `MD` only counts for "will", so future chains
/// group while other modals stay literal.
pub fn verbal_tags(tag: &str, lemma: &str) -> VerbTags {
    let tags = VerbTags::from_tag(tag);
    if tags == VerbTags::MD && !lemma.eq_ignore_ascii_case("will") {
        return VerbTags::empty();
    }
    tags
}

pub fn is_verbal(tag: &str, lemma: &str) -> bool {
    !verbal_tags(tag, lemma).is_empty()
}

pub fn is_determiner(tag: &str) -> bool {
    tag == DETERMINER_TAG
}
