use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::map,
    multi::many0,
    sequence::preceded,
    IResult,
};

use crate::ParseError;

/// Deepest bracket nesting accepted. The grammar recurses once per level.
pub const MAX_DEPTH: usize = 256;

/// Bracketed tree as written, before ids and node kinds are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTree<'a> {
    Phrase { label: &'a str, children: Vec<RawTree<'a>> },
    Leaf(&'a str),
}

impl RawTree<'_> {
    /// Number of nested phrases on the longest path; a leaf has depth 0.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0)];
        while let Some((tree, depth)) = stack.pop() {
            if let RawTree::Phrase { children, .. } = tree {
                deepest = deepest.max(depth + 1);
                stack.extend(children.iter().map(|c| (c, depth + 1)));
            }
        }
        deepest
    }
}

/// Highest number of simultaneously open brackets.
fn nesting_depth(input: &str) -> usize {
    let mut open: usize = 0;
    let mut deepest = 0;
    for c in input.chars() {
        match c {
            '(' => {
                open += 1;
                deepest = deepest.max(open);
            }
            ')' => open = open.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

/// Labels and terminals: anything up to whitespace or a bracket.
/// The annotator escapes literal brackets (`-LRB-`, `-RRB-`).
fn is_atom_char(c: char) -> bool {
    !c.is_whitespace() && c != '(' && c != ')'
}

fn leaf(input: &str) -> IResult<&str, RawTree<'_>> {
    map(take_while1(is_atom_char), RawTree::Leaf)(input)
}

fn phrase(input: &str) -> IResult<&str, RawTree<'_>> {
    let (input, _) = char('(')(input)?;
    let (input, _) = multispace0(input)?;
    // PTB-style files open with an unlabeled bracket: `( (S ...))`
    let (input, label) = take_while(is_atom_char)(input)?;
    let (input, children) = many0(preceded(multispace0, node))(input)?;
    let (input, _) = preceded(multispace0, char(')'))(input)?;

    Ok((input, RawTree::Phrase { label, children }))
}

fn node(input: &str) -> IResult<&str, RawTree<'_>> {
    alt((phrase, leaf))(input)
}

/// Parses exactly one bracketed tree. Surrounding whitespace and line
/// breaks are ignored.
pub fn parse_bracketed(original_input: &str) -> Result<RawTree<'_>, ParseError> {
    let offset = |rest: &str| original_input.len() - rest.len();

    let (input, _) = multispace0::<&str, nom::error::Error<&str>>(original_input)
        .map_err(|_| ParseError::Empty)?;
    if input.is_empty() {
        return Err(ParseError::Empty);
    }
    let depth = nesting_depth(input);
    if depth > MAX_DEPTH {
        return Err(ParseError::TooDeep { depth });
    }

    match phrase(input) {
        Ok((rest, tree)) => {
            let trailing = rest.trim_start();
            if trailing.is_empty() {
                Ok(tree)
            } else {
                Err(ParseError::TrailingInput { offset: offset(trailing) })
            }
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let opened = original_input.matches('(').count();
            let closed = original_input.matches(')').count();
            if opened != closed {
                Err(ParseError::Unbalanced { opened, closed })
            } else {
                Err(ParseError::Syntax { offset: offset(e.input) })
            }
        }
        Err(nom::Err::Incomplete(_)) => Err(ParseError::Syntax { offset: original_input.len() }),
    }
}
