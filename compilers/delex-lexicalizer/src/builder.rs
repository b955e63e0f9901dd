use delex_parser::ParseTree;
use delex_protocol::{AnnotatedToken, Diagnostic, GrammaticalFeatureTag, Lexicalization};
use tracing::{debug, warn};

use crate::classify::{classify_determiner, classify_verb_group, Outcome, VerbGroup};
use crate::tags::{is_determiner, is_verbal};

pub const DEFAULT_PHRASE_LABEL: &str = "VP";

/// Scans one sentence left to right, grouping verbal tokens and replacing
/// verb groups and determiners with feature tags.
///
/// With a parse tree, two adjacent verbal tokens share a group only when
/// they climb to the same enclosing verb phrase. Without one, every
/// contiguous run of verbal tokens is a group.
#[derive(Debug, Clone, Copy)]
pub struct TemplateBuilder<'t> {
    tree: Option<&'t ParseTree>,
    phrase_label: &'t str,
}

impl Default for TemplateBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'t> TemplateBuilder<'t> {
    pub fn new() -> Self {
        Self {
            tree: None,
            phrase_label: DEFAULT_PHRASE_LABEL,
        }
    }

    pub fn with_tree(tree: &'t ParseTree) -> Self {
        Self {
            tree: Some(tree),
            ..Self::new()
        }
    }

    pub fn phrase_label(mut self, label: &'t str) -> Self {
        self.phrase_label = label;
        self
    }

    pub fn build(&self, tokens: &[AnnotatedToken]) -> Lexicalization {
        let mut out = Lexicalization::default();

        let tree = match self.tree {
            Some(tree) if tree.terminal_count() != tokens.len() => {
                let reason = format!(
                    "parse has {} terminals for {} tokens",
                    tree.terminal_count(),
                    tokens.len()
                );
                warn!("{}, grouping contiguous runs instead", reason);
                out.diagnostics.push(Diagnostic::ParseDiscarded { reason });
                None
            }
            tree => tree,
        };

        let mut open: Option<VerbGroup<'_>> = None;

        for (i, token) in tokens.iter().enumerate() {
            if is_verbal(&token.tag, &token.lemma) {
                let continues = open
                    .as_ref()
                    .map_or(false, |group| self.continues(tree, group.last_index(), i));

                match open.as_mut() {
                    Some(group) if continues => group.push_token(token),
                    _ => {
                        if let Some(group) = open.take() {
                            close_group(&group, &mut out);
                        }
                        open = Some(VerbGroup::from_tokens(i, std::slice::from_ref(token)));
                    }
                }
                continue;
            }

            if let Some(group) = open.take() {
                close_group(&group, &mut out);
            }

            if is_determiner(&token.tag) {
                let tag = classify_determiner(&token.text, &token.lemma);
                out.emit_tag(tag, &token.text);
            } else {
                out.emit_literal(&token.text);
            }
        }

        if let Some(group) = open.take() {
            close_group(&group, &mut out);
        }

        out
    }

    /// Whether token `next` joins the group whose last token is `prev`.
    /// A token missing from the tree falls back to the contiguous-run rule.
    fn continues(&self, tree: Option<&ParseTree>, prev: usize, next: usize) -> bool {
        let Some(tree) = tree else {
            return true;
        };

        match (
            tree.enclosing_phrase(prev, self.phrase_label),
            tree.enclosing_phrase(next, self.phrase_label),
        ) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }
}

/// Classifies `group`, emits its tag and records a diagnostic when no rule fit.
pub(crate) fn close_group(group: &VerbGroup<'_>, out: &mut Lexicalization) {
    let tag = classify_and_flag(group, &mut out.diagnostics);
    out.emit_tag(tag, &group.surface());
}

pub(crate) fn classify_and_flag(group: &VerbGroup<'_>, diagnostics: &mut Vec<Diagnostic>) -> GrammaticalFeatureTag {
    let classification = classify_verb_group(group);

    match classification.outcome {
        Outcome::Matched => {}
        Outcome::Fallback => {
            debug!(start = group.start, tags = ?group.tags, "no rule for verb group, using default features");
            diagnostics.push(Diagnostic::FallbackPattern {
                start: group.start,
                tags: group.tags.join(" "),
            });
        }
        Outcome::Unmodeled => {
            warn!(start = group.start, len = group.len(), "verb group is longer than any modeled chain");
            diagnostics.push(Diagnostic::UnmodeledVerbGroup {
                start: group.start,
                len: group.len(),
            });
        }
    }

    debug!(start = group.start, tag = %classification.tag, "verb group");
    classification.tag
}
