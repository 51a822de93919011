//! Readers for external parser output
//!
//! Parses Penn Treebank bracketed trees and typed dependency listings
//! (`nsubj(jumped-5, fox-4)`, one per line) using a pest grammar.

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use thiserror::Error;

use crate::tree::{NodeId, PhraseTree, Relation};

#[derive(Parser)]
#[grammar = "grammar.pest"]
struct ParseOutputParser;

/// Label given to a bracketed root with no label of its own, as in `( (S ...))`
pub const DEFAULT_ROOT_LABEL: &str = "ROOT";

/// Error type for reading parser output
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Parse error: {0}")]
    Syntax(#[from] Box<pest::error::Error<Rule>>),

    #[error("Parse error: invalid token index: {0}")]
    InvalidIndex(String),
}

/// Parse a bracketed tree such as `(ROOT (S (NP (DT The) (NN dog)) (VP (VBZ runs))))`
pub fn parse_tree(input: &str) -> Result<PhraseTree, ParseError> {
    let mut pairs = ParseOutputParser::parse(Rule::tree, input).map_err(Box::new)?;
    let mut tree = PhraseTree::new();

    // tree -> (node | leaf) ~ EOI
    let top = pairs.next().unwrap().into_inner().next().unwrap();
    match top.as_rule() {
        Rule::node => build_node(top, None, &mut tree),
        Rule::leaf => {
            tree.add_node(top.as_str(), None);
        }
        rule => unreachable!("unexpected rule at top of tree: {:?}", rule),
    }

    Ok(tree)
}

/// Add a bracketed constituent and its subtree
fn build_node(pair: Pair<Rule>, parent: Option<NodeId>, tree: &mut PhraseTree) {
    let mut inner = pair.into_inner().peekable();

    let label = match inner.peek().map(|p| p.as_rule()) {
        Some(Rule::label) => inner.next().unwrap().as_str().to_string(),
        _ => DEFAULT_ROOT_LABEL.to_string(),
    };
    let id = tree.add_node(&label, parent);

    for child in inner {
        match child.as_rule() {
            Rule::node => build_node(child, Some(id), tree),
            Rule::leaf => {
                tree.add_node(child.as_str(), Some(id));
            }
            rule => unreachable!("unexpected rule inside node: {:?}", rule),
        }
    }
}

/// Parse a typed dependency listing into relations
///
/// Governor `ROOT-0` maps to the virtual root. Copy marks (`went-3'`) are
/// accepted and ignored.
pub fn parse_dependencies(input: &str) -> Result<Vec<Relation>, ParseError> {
    let mut pairs = ParseOutputParser::parse(Rule::dependencies, input).map_err(Box::new)?;
    let mut relations = Vec::new();

    for dependency in pairs.next().unwrap().into_inner() {
        if dependency.as_rule() != Rule::dependency {
            continue; // EOI
        }
        let mut inner = dependency.into_inner();
        let label = inner.next().unwrap().as_str();
        let governor = parse_dep_token(inner.next().unwrap())?;
        let dependent = parse_dep_token(inner.next().unwrap())?;
        relations.push(Relation::new(governor, dependent, label));
    }

    Ok(relations)
}

/// Extract the index from `word-5`
fn parse_dep_token(pair: Pair<Rule>) -> Result<usize, ParseError> {
    let index = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::token_index)
        .unwrap();
    index
        .as_str()
        .parse()
        .map_err(|_| ParseError::InvalidIndex(index.as_str().to_string()))
}
