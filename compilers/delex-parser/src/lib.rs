pub mod lemmas;
pub mod parser;
pub mod tree;

use delex_protocol::NodeId;
use thiserror::Error;

pub use lemmas::LemmaTable;
pub use parser::{parse_bracketed, RawTree, MAX_DEPTH};
pub use tree::{Node, NodeKind, ParseTree, ROOT_LABEL};

/// Why a bracketed parse string could not become a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("parse string is empty")]
    Empty,

    #[error("unbalanced brackets: {opened} opened, {closed} closed")]
    Unbalanced { opened: usize, closed: usize },

    #[error("unexpected input at byte {offset}")]
    Syntax { offset: usize },

    #[error("trailing input after the tree at byte {offset}")]
    TrailingInput { offset: usize },

    #[error("phrase `{label}` has no children")]
    EmptyPhrase { label: String },

    #[error("phrase `{label}` mixes terminals with other children")]
    MixedChildren { label: String },

    #[error("terminal `{token}` outside of any phrase")]
    StrayTerminal { token: String },

    #[error("brackets nested {depth} deep, more than the {} allowed", parser::MAX_DEPTH)]
    TooDeep { depth: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("no node with id {0}")]
    UnknownNode(NodeId),

    #[error("node {anchor} is not below node {node}")]
    NotADescendant { node: NodeId, anchor: NodeId },

    #[error("terminal node {0} cannot anchor a collapse")]
    TerminalAnchor(NodeId),
}
