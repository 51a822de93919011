//! Shared test sentences

use crate::config::IndexConfig;
use crate::index::{BuildError, IndexBuilder, MarkupMap, SentenceIndex};
use crate::parser::{parse_dependencies, parse_tree};
use crate::session::{LowercaseLemmatizer, Pipeline, Precomputed};
use crate::tree::{Parse, PhraseTree, Relation};

pub const FOX_TEXT: &str = "The quick brown fox jumped over a lazy dog.";

pub const FOX_TREE: &str = "(ROOT (S (NP (DT The) (JJ quick) (JJ brown) (NN fox)) (VP (VBD jumped) (PP (IN over) (NP (DT a) (JJ lazy) (NN dog)))) (. .)))";

pub const FOX_DEPS: &str = "det(fox-4, The-1)
amod(fox-4, quick-2)
amod(fox-4, brown-3)
nsubj(jumped-5, fox-4)
root(ROOT-0, jumped-5)
prep(jumped-5, over-6)
det(dog-9, a-7)
amod(dog-9, lazy-8)
pobj(over-6, dog-9)
punct(jumped-5, .-10)";

/// Build with the default config and the lowercasing lemmatizer
pub fn build(
    tree: PhraseTree,
    relations: Vec<Relation>,
    markup: &MarkupMap,
) -> Result<SentenceIndex, BuildError> {
    let config = IndexConfig::default();
    IndexBuilder::new(&config, &LowercaseLemmatizer).build(Parse::new(tree, relations), markup)
}

pub fn fox_index() -> SentenceIndex {
    let tree = parse_tree(FOX_TREE).unwrap();
    let relations = parse_dependencies(FOX_DEPS).unwrap();
    build(tree, relations, &MarkupMap::new()).unwrap()
}

pub fn fox_session() -> Pipeline<Precomputed, Precomputed, LowercaseLemmatizer> {
    let mut session = Precomputed::new();
    session.add(FOX_TREE, -42.0, FOX_DEPS).unwrap();
    let extractor = session.clone();
    Pipeline::new(session, extractor, LowercaseLemmatizer)
}
