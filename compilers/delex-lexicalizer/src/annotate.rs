//! Parse-driven annotation: the tree counterpart of [`TemplateBuilder`].
//!
//! The input tree is cloned and each auxiliary chain is collapsed into its
//! outermost verb phrase. Tags live in a side table keyed by node id, so the
//! caller's tree is never touched.
//!
//! [`TemplateBuilder`]: crate::builder::TemplateBuilder

use std::collections::{HashMap, HashSet};

use delex_parser::{ParseTree, TreeError};
use delex_protocol::{Diagnostic, Lexicalization, NodeId};

use crate::builder::{classify_and_flag, DEFAULT_PHRASE_LABEL};
use crate::classify::{classify_determiner, VerbGroup};
use crate::tags::{is_determiner, is_verbal};

/// A rendered tag and the surface it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission {
    pub tag: String,
    pub surface: String,
}

#[derive(Debug, Clone)]
pub struct AnnotatedTree {
    tree: ParseTree,
    /// Emitted right before the subtree of the keyed node.
    emissions: HashMap<NodeId, Emission>,
    /// Preterminals whose token is covered by an emission.
    absorbed: HashSet<NodeId>,
    diagnostics: Vec<Diagnostic>,
}

impl AnnotatedTree {
    /// The collapsed tree.
    pub fn tree(&self) -> &ParseTree {
        &self.tree
    }

    pub fn emission(&self, id: NodeId) -> Option<&Emission> {
        self.emissions.get(&id)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Reads the template off the collapsed tree, left to right.
    pub fn flatten(&self) -> Lexicalization {
        let mut out = Lexicalization {
            diagnostics: self.diagnostics.clone(),
            ..Lexicalization::default()
        };

        for id in self.tree.preorder() {
            if let Some(emission) = self.emissions.get(&id) {
                out.emit_tag(&emission.tag, &emission.surface);
            }
            if let Some(node) = self.tree.node(id) {
                let covered = node.parent.map_or(false, |p| self.absorbed.contains(&p));
                if node.is_terminal() && !covered {
                    out.emit_literal(&node.label);
                }
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TreeAnnotator<'a> {
    phrase_label: &'a str,
}

impl Default for TreeAnnotator<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> TreeAnnotator<'a> {
    pub fn new() -> Self {
        Self {
            phrase_label: DEFAULT_PHRASE_LABEL,
        }
    }

    pub fn phrase_label(mut self, label: &'a str) -> Self {
        self.phrase_label = label;
        self
    }

    pub fn annotate(&self, tree: &ParseTree) -> Result<AnnotatedTree, TreeError> {
        let mut annotated = AnnotatedTree {
            tree: tree.clone(),
            emissions: HashMap::new(),
            absorbed: HashSet::new(),
            diagnostics: Vec::new(),
        };

        // Children are pushed after the node is handled, so a collapse
        // only ever rewrites parts of the tree not yet visited.
        let mut stack = vec![annotated.tree.root()];
        while let Some(id) = stack.pop() {
            if !annotated.absorbed.contains(&id) {
                if self.is_chain_head(&annotated.tree, id) {
                    self.collapse_chain(&mut annotated, id)?;
                } else {
                    annotate_preterminal(&mut annotated, id);
                }
            }
            stack.extend(annotated.tree.children(id).iter().rev());
        }

        Ok(annotated)
    }

    /// A verb phrase that opens with at least one verbal preterminal.
    fn is_chain_head(&self, tree: &ParseTree, id: NodeId) -> bool {
        tree.label(id) == Some(self.phrase_label) && leading_verbs(tree, id) > 0
    }

    /// Follows `(VP verbs... (VP verbs... (VP ...)))` down while each level
    /// holds only verbs and a single nested chain, then collapses the levels.
    fn collapse_chain(&self, annotated: &mut AnnotatedTree, head: NodeId) -> Result<(), TreeError> {
        let tree = &annotated.tree;
        let mut members = Vec::new();
        let mut anchor = head;

        loop {
            let children = tree.children(anchor);
            let verbs = leading_verbs(tree, anchor);
            members.extend_from_slice(&children[..verbs]);

            match &children[verbs..] {
                [next] if self.is_chain_head(tree, *next) => anchor = *next,
                _ => break,
            }
        }

        let group = group_of(tree, &members);
        let tag = classify_and_flag(&group, &mut annotated.diagnostics);
        let emission = Emission {
            tag: tag.to_string(),
            surface: group.surface(),
        };

        if anchor != head {
            annotated.tree.prune_subtree_except_anchor(head, anchor)?;
        }
        annotated.absorbed.extend(members);
        annotated.emissions.insert(head, emission);
        Ok(())
    }
}

/// Determiners, and verbs that sit outside any chain head.
fn annotate_preterminal(annotated: &mut AnnotatedTree, id: NodeId) {
    let tree = &annotated.tree;
    let Some((token, lemma, tag, _)) = preterminal_token(tree, id) else {
        return;
    };

    if is_determiner(tag) {
        let emission = Emission {
            tag: classify_determiner(token, lemma).to_string(),
            surface: token.to_string(),
        };
        annotated.absorbed.insert(id);
        annotated.emissions.insert(id, emission);
        return;
    }
    if !is_verbal(tag, lemma) {
        return;
    }

    // Run of sibling verbs starting here
    let members: Vec<NodeId> = match tree.parent(id) {
        Some(parent) => tree
            .children(parent)
            .iter()
            .copied()
            .skip_while(|&c| c != id)
            .take_while(|&c| is_verbal_preterminal(tree, c) && !annotated.absorbed.contains(&c))
            .collect(),
        None => vec![id],
    };

    let group = group_of(tree, &members);
    let tag = classify_and_flag(&group, &mut annotated.diagnostics);
    let emission = Emission {
        tag: tag.to_string(),
        surface: group.surface(),
    };
    annotated.absorbed.extend(members);
    annotated.emissions.insert(id, emission);
}

/// `(token, lemma, tag, token index)` of a preterminal.
fn preterminal_token(tree: &ParseTree, id: NodeId) -> Option<(&str, &str, &str, usize)> {
    let node = tree.node(id)?;
    if !node.is_preterminal() {
        return None;
    }
    let terminal = tree.node(*node.children.first()?)?;
    Some((
        terminal.label.as_str(),
        terminal.lemma().unwrap_or(""),
        node.label.as_str(),
        terminal.token_index()?,
    ))
}

fn is_verbal_preterminal(tree: &ParseTree, id: NodeId) -> bool {
    preterminal_token(tree, id).map_or(false, |(_, lemma, tag, _)| is_verbal(tag, lemma))
}

fn leading_verbs(tree: &ParseTree, id: NodeId) -> usize {
    tree.children(id)
        .iter()
        .take_while(|&&c| is_verbal_preterminal(tree, c))
        .count()
}

fn group_of<'t>(tree: &'t ParseTree, preterminals: &[NodeId]) -> VerbGroup<'t> {
    let mut group = VerbGroup::default();
    for &id in preterminals {
        if let Some((token, lemma, tag, index)) = preterminal_token(tree, id) {
            if group.is_empty() {
                group.start = index;
            }
            group.push(token, lemma, tag);
        }
    }
    group
}
