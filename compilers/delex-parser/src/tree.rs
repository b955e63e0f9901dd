use std::fmt;

use delex_protocol::NodeId;

use crate::lemmas::LemmaTable;
use crate::parser::{parse_bracketed, RawTree, MAX_DEPTH};
use crate::{ParseError, TreeError};

pub const ROOT_LABEL: &str = "ROOT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Nonterminal,
    /// Phrase whose single child is a terminal (the POS tag level).
    Preterminal,
    /// Token text, with its position in the sentence and its lemma.
    Terminal { index: usize, lemma: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    /// Phrase tag, POS tag, or token text for terminals.
    pub label: String,
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
    /// Surface order, left to right.
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, NodeKind::Terminal { .. })
    }

    pub fn is_preterminal(&self) -> bool {
        self.kind == NodeKind::Preterminal
    }

    pub fn token_index(&self) -> Option<usize> {
        match self.kind {
            NodeKind::Terminal { index, .. } => Some(index),
            _ => None,
        }
    }

    pub fn lemma(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Terminal { lemma, .. } => Some(lemma),
            _ => None,
        }
    }
}

/// Constituency tree stored as an arena. Slot `i` holds the node with id
/// `i + 1`; pruned nodes leave an empty slot so ids stay stable.
#[derive(Debug, Clone)]
pub struct ParseTree {
    nodes: Vec<Option<Node>>,
    /// Terminal node for each token index.
    terminals: Vec<Option<NodeId>>,
    root: NodeId,
}

fn slot(id: NodeId) -> Option<usize> {
    (id.0 as usize).checked_sub(1)
}

impl ParseTree {
    /// Parses a bracketed string such as `(ROOT (S (NP (DT The) (NN cat)) ...))`.
    ///
    /// The root always carries the `ROOT` label and id 1: an outer `ROOT` or
    /// unlabeled bracket becomes the root itself, anything else is wrapped.
    pub fn parse(input: &str, lemmas: &LemmaTable) -> Result<Self, ParseError> {
        let raw = parse_bracketed(input)?;
        Self::from_raw(&raw, lemmas)
    }

    pub fn from_raw(raw: &RawTree<'_>, lemmas: &LemmaTable) -> Result<Self, ParseError> {
        let depth = raw.depth();
        if depth > MAX_DEPTH {
            return Err(ParseError::TooDeep { depth });
        }

        let mut tree = ParseTree {
            nodes: Vec::new(),
            terminals: Vec::new(),
            root: NodeId::new(1),
        };

        match raw {
            RawTree::Phrase { label, children } if label.is_empty() || *label == ROOT_LABEL => {
                tree.add_phrase(ROOT_LABEL, children, None, lemmas)?;
            }
            _ => {
                let root = tree.push(ROOT_LABEL.to_string(), None, NodeKind::Nonterminal);
                tree.add(raw, root, lemmas)?;
            }
        }

        Ok(tree)
    }

    fn push(&mut self, label: String, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32 + 1);
        self.nodes.push(Some(Node {
            id,
            label,
            parent,
            kind,
            children: Vec::new(),
        }));

        if let Some(parent_node) = parent.and_then(|p| self.node_mut(p)) {
            parent_node.children.push(id);
        }
        id
    }

    fn add(&mut self, raw: &RawTree<'_>, parent: NodeId, lemmas: &LemmaTable) -> Result<NodeId, ParseError> {
        match raw {
            RawTree::Phrase { label, children } => self.add_phrase(label, children, Some(parent), lemmas),
            RawTree::Leaf(text) => Err(ParseError::StrayTerminal {
                token: text.to_string(),
            }),
        }
    }

    fn add_phrase(
        &mut self,
        label: &str,
        children: &[RawTree<'_>],
        parent: Option<NodeId>,
        lemmas: &LemmaTable,
    ) -> Result<NodeId, ParseError> {
        let leaves = children.iter().filter(|c| matches!(c, RawTree::Leaf(_))).count();

        match (leaves, children) {
            (_, []) => Err(ParseError::EmptyPhrase {
                label: label.to_string(),
            }),
            (0, _) => {
                let id = self.push(label.to_string(), parent, NodeKind::Nonterminal);
                for child in children {
                    self.add(child, id, lemmas)?;
                }
                Ok(id)
            }
            (1, [RawTree::Leaf(text)]) => {
                let id = self.push(label.to_string(), parent, NodeKind::Preterminal);
                let kind = NodeKind::Terminal {
                    index: self.terminals.len(),
                    lemma: lemmas.lookup(text).to_string(),
                };
                let terminal = self.push(text.to_string(), Some(id), kind);
                self.terminals.push(Some(terminal));
                Ok(id)
            }
            _ => Err(ParseError::MixedChildren {
                label: label.to_string(),
            }),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(slot(id)?)?.as_ref()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(slot(id)?)?.as_mut()
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.label.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Terminal node holding the token at `index`, if it is still in the tree.
    pub fn terminal(&self, index: usize) -> Option<NodeId> {
        self.terminals.get(index).copied().flatten()
    }

    /// Number of terminals the tree was built with.
    pub fn terminal_count(&self) -> usize {
        self.terminals.len()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Depth-first, left-to-right ids of every live node.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        order
    }

    /// Token texts of the live terminals, left to right.
    pub fn tokens(&self) -> Vec<&str> {
        self.preorder()
            .into_iter()
            .filter_map(|id| self.node(id))
            .filter(|n| n.is_terminal())
            .map(|n| n.label.as_str())
            .collect()
    }

    /// True when `node` lies strictly below `ancestor`.
    pub fn is_descendant(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Starting at the preterminal above token `token_index`, climbs while the
    /// parent is labeled `label` and returns the highest node reached.
    ///
    /// Every verb of an auxiliary chain `(VP (VBD was) (VP (VBG being) (VP ...)))`
    /// resolves to the outermost VP, while verbs separated by another phrase
    /// (an `S`, an `SBAR`) resolve to different nodes. `None` when the token
    /// is not in the tree.
    pub fn enclosing_phrase(&self, token_index: usize, label: &str) -> Option<NodeId> {
        let terminal = self.terminal(token_index)?;
        let mut current = self.parent(terminal)?;

        while let Some(parent) = self.parent(current) {
            if self.label(parent) != Some(label) {
                break;
            }
            current = parent;
        }
        Some(current)
    }

    /// Collapses the layers between `node` and `anchor`: every descendant of
    /// `node` is deleted except the children of `anchor`, which become the
    /// direct children of `node`.
    pub fn prune_subtree_except_anchor(&mut self, node: NodeId, anchor: NodeId) -> Result<(), TreeError> {
        if self.node(node).is_none() {
            return Err(TreeError::UnknownNode(node));
        }
        let anchor_node = self.node(anchor).ok_or(TreeError::UnknownNode(anchor))?;
        if anchor_node.is_terminal() {
            return Err(TreeError::TerminalAnchor(anchor));
        }
        let anchor_is_preterminal = anchor_node.is_preterminal();
        if node == anchor {
            return Ok(());
        }
        if !self.is_descendant(node, anchor) {
            return Err(TreeError::NotADescendant { node, anchor });
        }

        let spliced = self.children(anchor).to_vec();
        let mut stack = self.children(node).to_vec();
        while let Some(id) = stack.pop() {
            if id != anchor {
                stack.extend_from_slice(self.children(id));
            }
            self.remove(id);
        }

        for &child in &spliced {
            if let Some(child_node) = self.node_mut(child) {
                child_node.parent = Some(node);
            }
        }
        if let Some(parent) = self.node_mut(node) {
            parent.children = spliced;
            if anchor_is_preterminal {
                parent.kind = NodeKind::Preterminal;
            }
        }
        Ok(())
    }

    fn remove(&mut self, id: NodeId) {
        let removed = slot(id).and_then(|i| self.nodes.get_mut(i)).and_then(Option::take);
        if let Some(Node {
            kind: NodeKind::Terminal { index, .. },
            ..
        }) = removed
        {
            if let Some(entry) = self.terminals.get_mut(index) {
                *entry = None;
            }
        }
    }
}

impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        enum Step {
            Open(NodeId),
            Close,
        }

        let mut stack = vec![Step::Open(self.root)];
        while let Some(step) = stack.pop() {
            let id = match step {
                Step::Close => {
                    f.write_str(")")?;
                    continue;
                }
                Step::Open(id) => id,
            };
            let Some(node) = self.node(id) else {
                continue;
            };
            if id != self.root {
                f.write_str(" ")?;
            }
            if node.is_terminal() {
                f.write_str(&node.label)?;
                continue;
            }

            write!(f, "({}", node.label)?;
            stack.push(Step::Close);
            stack.extend(node.children.iter().rev().map(|&child| Step::Open(child)));
        }
        Ok(())
    }
}
