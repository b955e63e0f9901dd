//! Turns POS-tagged, optionally parsed sentences into delexicalized templates.
//!
//! Verb groups and determiners are replaced by feature tags such as
//! `VP[aspect=simple,tense=past,voice=passive,person=null,number=singular] chase`,
//! and every replaced surface is recorded so the template can be realized again.

pub mod annotate;
pub mod builder;
pub mod classify;
pub mod config;
pub mod rules;
pub mod tags;
pub mod vocab;

use std::fmt;

use delex_parser::{LemmaTable, ParseTree};
use delex_protocol::{AnnotatedToken, Diagnostic, Lexicalization, Sentence};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use annotate::{AnnotatedTree, TreeAnnotator};
pub use builder::{TemplateBuilder, DEFAULT_PHRASE_LABEL};
pub use classify::{classify_determiner, classify_verb_group, Outcome, VerbClassification, VerbGroup};
pub use config::{LexicalizerConfig, Mode};
pub use vocab::SurfaceVocabulary;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Misaligned columns: {tokens} tokens, {lemmas} lemmas, {tags} tags")]
    Misaligned {
        tokens: usize,
        lemmas: usize,
        tags: usize,
    },
}

/// Zips parallel token, lemma and tag columns into a [`Sentence`].
pub fn align<S: AsRef<str>>(
    tokens: &[S],
    lemmas: &[S],
    tags: &[S],
    parse: Option<String>,
) -> Result<Sentence, LexError> {
    if tokens.len() != lemmas.len() || tokens.len() != tags.len() {
        return Err(LexError::Misaligned {
            tokens: tokens.len(),
            lemmas: lemmas.len(),
            tags: tags.len(),
        });
    }

    let tokens = tokens
        .iter()
        .zip(lemmas)
        .zip(tags)
        .map(|((t, l), p)| AnnotatedToken::new(t.as_ref(), l.as_ref(), p.as_ref()))
        .collect();
    Ok(Sentence::new(tokens, parse))
}

/// Counts over a batch of documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub processed: usize,
    pub failed: usize,
    pub diagnostics: usize,
}

impl BatchReport {
    pub fn record_success(&mut self, lexicalization: &Lexicalization) {
        self.processed += 1;
        self.diagnostics += lexicalization.diagnostics.len();
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    pub fn merge(&mut self, other: BatchReport) {
        self.processed += other.processed;
        self.failed += other.failed;
        self.diagnostics += other.diagnostics;
    }

    /// Share of documents that failed; `0.0` for an empty batch.
    pub fn error_rate(&self) -> f64 {
        let total = self.processed + self.failed;
        if total == 0 {
            0.0
        } else {
            self.failed as f64 / total as f64
        }
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} processed, {} failed ({:.2}%), {} diagnostics",
            self.processed,
            self.failed,
            self.error_rate() * 100.0,
            self.diagnostics
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct Lexicalizer {
    config: LexicalizerConfig,
}

impl Lexicalizer {
    pub fn new(config: LexicalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LexicalizerConfig {
        &self.config
    }

    pub fn lexicalize(&self, sentence: &Sentence) -> Lexicalization {
        let mut discarded = Vec::new();
        let tree = self.tree_for(sentence, &mut discarded);

        let mut out = match (self.config.mode, tree.as_ref()) {
            (Mode::Tree, Some(tree)) if tree.terminal_count() == sentence.len() => {
                self.annotate(tree, sentence, &mut discarded)
            }
            (_, tree) => self.scan(tree, &sentence.tokens),
        };

        if !discarded.is_empty() {
            discarded.append(&mut out.diagnostics);
            out.diagnostics = discarded;
        }
        out
    }

    /// Lexicalizes the sentences of one text as a single entry.
    pub fn lexicalize_document(&self, sentences: &[Sentence]) -> Lexicalization {
        let mut out = Lexicalization::default();
        for sentence in sentences {
            out.append(self.lexicalize(sentence));
        }
        out
    }

    /// Lexicalizes every document, recording failed inputs instead of stopping.
    pub fn lexicalize_batch<I, E>(&self, documents: I) -> (Vec<Result<Lexicalization, E>>, BatchReport)
    where
        I: IntoIterator<Item = Result<Vec<Sentence>, E>>,
        E: fmt::Display,
    {
        let mut report = BatchReport::default();
        let results = documents
            .into_iter()
            .map(|document| match document {
                Ok(sentences) => {
                    let lexicalization = self.lexicalize_document(&sentences);
                    report.record_success(&lexicalization);
                    Ok(lexicalization)
                }
                Err(e) => {
                    warn!("Skipping document: {:#}", e);
                    report.record_failure();
                    Err(e)
                }
            })
            .collect();

        info!("Batch finished: {}", report);
        (results, report)
    }

    fn tree_for(&self, sentence: &Sentence, discarded: &mut Vec<Diagnostic>) -> Option<ParseTree> {
        if !self.config.use_parse {
            return None;
        }
        let parse = sentence.parse.as_deref()?;

        match ParseTree::parse(parse, &LemmaTable::from_sentence(sentence)) {
            Ok(tree) => Some(tree),
            Err(e) => {
                warn!("Discarding parse: {}", e);
                discarded.push(Diagnostic::ParseDiscarded { reason: e.to_string() });
                None
            }
        }
    }

    fn scan(&self, tree: Option<&ParseTree>, tokens: &[AnnotatedToken]) -> Lexicalization {
        let builder = match tree {
            Some(tree) => TemplateBuilder::with_tree(tree),
            None => TemplateBuilder::new(),
        };
        builder.phrase_label(&self.config.phrase_label).build(tokens)
    }

    fn annotate(&self, tree: &ParseTree, sentence: &Sentence, discarded: &mut Vec<Diagnostic>) -> Lexicalization {
        let annotator = TreeAnnotator::new().phrase_label(&self.config.phrase_label);
        match annotator.annotate(tree) {
            Ok(annotated) => {
                debug!("Collapsed tree: {}", annotated.tree());
                annotated.flatten()
            }
            Err(e) => {
                warn!("Tree annotation failed, scanning tokens instead: {}", e);
                discarded.push(Diagnostic::ParseDiscarded { reason: e.to_string() });
                self.scan(None, &sentence.tokens)
            }
        }
    }
}
