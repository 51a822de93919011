//! Sentence index: the dependency-annotated view of one parse
//!
//! Tokens live in an integer-keyed map; markup fragments stripped before
//! parsing live in a sorted list of rational keys between them. The two are
//! merged on demand by [`SentenceIndex::slots`].

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::IndexConfig;
use crate::key::{MarkupKey, ROOT, SlotKey, TokenId, fractional_keys};
use crate::normalize::{is_punctuation, normalize_tag, normalize_word};
use crate::session::Lemmatizer;
use crate::tree::Parse;

/// Markup fragments by boundary: the number of real tokens preceding them
pub type MarkupMap = BTreeMap<TokenId, Vec<String>>;

/// Error raised when the parse and its relations disagree about the tree
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Build error: relation {relation} references unknown position {position}")]
    UnknownPosition { position: TokenId, relation: String },

    #[error("Build error: token {dependent} has more than one governor")]
    MultipleGovernors { dependent: TokenId },

    #[error("Build error: dependency cycle through token {key}")]
    Cycle { key: TokenId },
}

/// A real word of the sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub word: String,
    pub tag: String,
    pub lemma: String,
    /// Head token, or 0 for the virtual root
    pub governor: TokenId,
    pub relation: String,
}

/// One slot in sentence order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot<'a> {
    Token(TokenId, &'a Token),
    Markup(MarkupKey, &'a str),
}

impl Slot<'_> {
    pub fn key(&self) -> SlotKey {
        match self {
            Slot::Token(id, _) => SlotKey::Token(*id),
            Slot::Markup(key, _) => SlotKey::Markup(*key),
        }
    }

    /// Surface text: the word, or the raw markup
    pub fn text(&self) -> &str {
        match self {
            Slot::Token(_, token) => &token.word,
            Slot::Markup(_, text) => text,
        }
    }
}

/// Dependency-annotated sentence built from one parse
#[derive(Debug, Clone)]
pub struct SentenceIndex {
    pub(crate) tokens: BTreeMap<TokenId, Token>,
    /// Dependents by governor, in discovery order; key 0 holds root attachments
    pub(crate) children: FxHashMap<TokenId, Vec<TokenId>>,
    /// Sorted by key
    pub(crate) markup: Vec<(MarkupKey, String)>,
    pub(crate) parse: Parse,
    pub(crate) config: IndexConfig,
}

impl SentenceIndex {
    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(&id)
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.tokens.contains_key(&id)
    }

    /// Tokens in key order
    pub fn tokens(&self) -> impl Iterator<Item = (TokenId, &Token)> {
        self.tokens.iter().map(|(&id, token)| (id, token))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Keys of the tokens governed by `id` (0 for root attachments)
    pub fn children(&self, id: TokenId) -> &[TokenId] {
        self.children.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Governor and relation label of a token, or `None` for root attachments
    pub fn head(&self, id: TokenId) -> Option<(TokenId, &str)> {
        let token = self.tokens.get(&id)?;
        if token.governor == ROOT {
            return None;
        }
        Some((token.governor, token.relation.as_str()))
    }

    /// Children of a token paired with their relation labels
    pub fn dependents(&self, id: TokenId) -> impl Iterator<Item = (TokenId, &str)> {
        self.children(id)
            .iter()
            .filter_map(|child| self.tokens.get(child).map(|t| (*child, t.relation.as_str())))
    }

    /// Markup fragments in key order
    pub fn markup(&self) -> impl Iterator<Item = (MarkupKey, &str)> {
        self.markup.iter().map(|(key, text)| (*key, text.as_str()))
    }

    /// Words and markup merged in sentence order
    pub fn slots(&self) -> impl Iterator<Item = Slot<'_>> {
        let mut tokens = self.tokens.iter().peekable();
        let mut markup = self.markup.iter().peekable();

        std::iter::from_fn(move || {
            let take_token = match (tokens.peek(), markup.peek()) {
                (Some((id, _)), Some((key, _))) => SlotKey::Token(**id) < SlotKey::Markup(*key),
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => return None,
            };
            if take_token {
                tokens.next().map(|(id, token)| Slot::Token(*id, token))
            } else {
                markup.next().map(|(key, text)| Slot::Markup(*key, text.as_str()))
            }
        })
    }

    /// The original, unmodified parse
    pub fn parse(&self) -> &Parse {
        &self.parse
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }
}

/// Builds a [`SentenceIndex`] from a parse, its relations and stripped markup
pub struct IndexBuilder<'a> {
    config: &'a IndexConfig,
    lemmatizer: &'a dyn Lemmatizer,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(config: &'a IndexConfig, lemmatizer: &'a dyn Lemmatizer) -> Self {
        Self { config, lemmatizer }
    }

    /// Build the index
    ///
    /// Relations are applied before the token walk so that every token sees
    /// its aggregated governor. Punctuation and tokens with no governor hang
    /// off the virtual root with the punctuation relation.
    pub fn build(&self, parse: Parse, markup: &MarkupMap) -> Result<SentenceIndex, BuildError> {
        let nodes = parse.tree.nodes();
        let terminals: Vec<_> = nodes
            .iter()
            .filter(|node| !node.wrapper && node.value != self.config.root_label)
            .collect();
        let positions: FxHashSet<TokenId> = terminals.iter().map(|node| node.position).collect();

        let mut index = SentenceIndex {
            tokens: BTreeMap::new(),
            children: FxHashMap::default(),
            markup: Vec::new(),
            parse: Parse::default(),
            config: self.config.clone(),
        };

        if let Some(fragments) = markup.get(&0) {
            index.push_markup(0, fragments);
        }

        // Governors from the aggregated relation set
        let mut heads: FxHashMap<TokenId, (TokenId, &str)> = FxHashMap::default();
        for relation in &parse.relations {
            for position in [relation.governor, relation.dependent] {
                if position != ROOT && !positions.contains(&position) {
                    return Err(BuildError::UnknownPosition {
                        position,
                        relation: relation.label.clone(),
                    });
                }
            }
            if relation.dependent == ROOT {
                return Err(BuildError::UnknownPosition {
                    position: ROOT,
                    relation: relation.label.clone(),
                });
            }
            let head = (relation.governor, relation.label.as_str());
            if heads.insert(relation.dependent, head).is_some() {
                return Err(BuildError::MultipleGovernors {
                    dependent: relation.dependent,
                });
            }
            index
                .children
                .entry(relation.governor)
                .or_default()
                .push(relation.dependent);
        }

        let mut emitted: FxHashSet<TokenId> = FxHashSet::default();
        emitted.insert(0);

        for node in terminals {
            let id = node.position;
            let word = normalize_word(&node.value);
            let tag = node
                .parent_label
                .as_deref()
                .unwrap_or(&self.config.fallback_tag);
            let lemma = self.lemmatizer.lemmatize(word, tag);

            let (governor, relation) = match heads.get(&id) {
                Some(&(governor, label)) if !is_punctuation(word) => (governor, label.to_string()),
                head => {
                    if let Some(&(governor, _)) = head {
                        if let Some(siblings) = index.children.get_mut(&governor) {
                            siblings.retain(|&child| child != id);
                        }
                    }
                    index.children.entry(ROOT).or_default().push(id);
                    (ROOT, self.config.punct_relation.clone())
                }
            };

            index.tokens.insert(
                id,
                Token {
                    word: word.to_string(),
                    tag: normalize_tag(word, tag).to_string(),
                    lemma,
                    governor,
                    relation,
                },
            );

            if let Some(fragments) = markup.get(&id) {
                index.push_markup(id, fragments);
            }
            emitted.insert(id);
        }

        for (&boundary, fragments) in markup {
            if !emitted.contains(&boundary) {
                warn!(boundary, count = fragments.len(), "markup past the last token");
                index.push_markup(boundary, fragments);
            }
        }
        index.markup.sort_by(|a, b| a.0.cmp(&b.0));

        if let Some(key) = index.find_cycle() {
            return Err(BuildError::Cycle { key });
        }

        debug!(
            tokens = index.tokens.len(),
            markup = index.markup.len(),
            "built sentence index"
        );

        index.parse = parse;
        Ok(index)
    }
}

impl SentenceIndex {
    fn push_markup(&mut self, boundary: TokenId, fragments: &[String]) {
        let keys = fractional_keys(boundary, fragments.len());
        self.markup.extend(keys.zip(fragments.iter().cloned()));
    }

    /// First token whose governor chain loops without reaching the root
    fn find_cycle(&self) -> Option<TokenId> {
        self.tokens
            .keys()
            .copied()
            .find(|&id| self.path_to_root(id).is_err())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{FOX_DEPS, FOX_TREE, build, fox_index};
    use crate::parser::{parse_dependencies, parse_tree};
    use crate::tree::{PhraseTree, Relation};

    #[test]
    fn test_build_fox() {
        let index = fox_index();

        assert_eq!(index.len(), 10);
        let fox = index.token(4).unwrap();
        assert_eq!(fox.word, "fox");
        assert_eq!(fox.tag, "NN");
        assert_eq!(fox.lemma, "fox");
        assert_eq!(fox.governor, 5);
        assert_eq!(fox.relation, "nsubj");

        let jumped = index.token(5).unwrap();
        assert_eq!(jumped.governor, ROOT);
        assert_eq!(jumped.relation, "root");

        assert_eq!(index.children(4), &[1, 2, 3]);
        assert_eq!(index.head(9), Some((6, "pobj")));
        assert_eq!(index.head(5), None);
    }

    #[test]
    fn test_punctuation_hangs_off_root() {
        let index = fox_index();

        // punct(jumped-5, .-10) is overridden
        let period = index.token(10).unwrap();
        assert_eq!(period.governor, ROOT);
        assert_eq!(period.relation, "punct");
        assert!(!index.children(5).contains(&10));
        assert_eq!(index.children(ROOT), &[5, 10]);
    }

    #[test]
    fn test_multi_character_punctuation_keeps_governor() {
        let tree = parse_tree("(ROOT (S (NP (NNS Dogs)) (VP (VBP bark)) (: ...) (`` ``)))").unwrap();
        let relations = parse_dependencies(
            "nsubj(bark-2, Dogs-1)\nroot(ROOT-0, bark-2)\npunct(bark-2, ...-3)\npunct(bark-2, ``-4)",
        )
        .unwrap();
        let index = build(tree, relations, &MarkupMap::new()).unwrap();

        assert_eq!(index.head(3), Some((2, "punct")));
        assert_eq!(index.head(4), Some((2, "punct")));
        assert_eq!(index.children(ROOT), &[2]);
        assert_eq!(index.descendants(2), vec![2, 1, 3, 4]);
        assert_eq!(index.check_tree(), Ok(()));
    }

    #[test]
    fn test_dependents_carry_relations() {
        let index = fox_index();
        let dependents: Vec<_> = index.dependents(5).collect();
        assert_eq!(dependents, vec![(4, "nsubj"), (6, "prep")]);
        assert_eq!(index.dependents(1).count(), 0);
        assert_eq!(index.dependents(42).count(), 0);
    }

    #[test]
    fn test_missing_governor_defaults_to_root() {
        let tree = parse_tree("(ROOT (S (NP (NNP Kim)) (VP (VBZ sleeps))))").unwrap();
        let relations = vec![Relation::new(0, 2, "root")];
        let index = build(tree, relations, &MarkupMap::new()).unwrap();

        let kim = index.token(1).unwrap();
        assert_eq!(kim.governor, ROOT);
        assert_eq!(kim.relation, "punct");
        assert_eq!(index.children(ROOT), &[2, 1]);
        assert_eq!(index.check_tree(), Ok(()));
    }

    #[test]
    fn test_unknown_position_is_fatal() {
        let tree = parse_tree(FOX_TREE).unwrap();
        let mut relations = parse_dependencies(FOX_DEPS).unwrap();
        relations.push(Relation::new(5, 42, "dobj"));

        assert_eq!(
            build(tree, relations, &MarkupMap::new()).unwrap_err(),
            BuildError::UnknownPosition {
                position: 42,
                relation: "dobj".to_string()
            }
        );
    }

    #[test]
    fn test_multiple_governors_is_fatal() {
        let tree = parse_tree("(ROOT (S (NP (NNS Dogs)) (VP (VBP bark))))").unwrap();
        let relations = vec![
            Relation::new(0, 2, "root"),
            Relation::new(2, 1, "nsubj"),
            Relation::new(2, 1, "dobj"),
        ];
        assert_eq!(
            build(tree, relations, &MarkupMap::new()).unwrap_err(),
            BuildError::MultipleGovernors { dependent: 1 }
        );
    }

    #[test]
    fn test_cycle_is_fatal() {
        let tree = parse_tree("(ROOT (S (NP (NNS Dogs)) (VP (VBP bark))))").unwrap();
        let relations = vec![Relation::new(2, 1, "nsubj"), Relation::new(1, 2, "dep")];
        assert!(matches!(
            build(tree, relations, &MarkupMap::new()),
            Err(BuildError::Cycle { .. })
        ));
    }

    #[test]
    fn test_brackets_and_to() {
        let tree = parse_tree(
            "(ROOT (S (NP (PRP I)) (VP (VBP want) (S (VP (TO to) (VP (VB go) (PRN (-LRB- -LRB-) (ADVP (RB now)) (-RRB- -RRB-))))))))",
        )
        .unwrap();
        let relations = parse_dependencies(
            "nsubj(want-2, I-1)\nroot(ROOT-0, want-2)\naux(go-4, to-3)\nxcomp(want-2, go-4)\nadvmod(go-4, now-6)",
        )
        .unwrap();
        let index = build(tree, relations, &MarkupMap::new()).unwrap();

        assert_eq!(index.token(3).unwrap().tag, "IN");
        assert_eq!(index.token(5).unwrap().word, "(");
        assert_eq!(index.token(7).unwrap().word, ")");
        assert_eq!(index.token(5).unwrap().relation, "punct");
        assert_eq!(index.head(3), Some((4, "aux")));
        assert_eq!(index.check_tree(), Ok(()));
    }

    #[test]
    fn test_empty_word_keeps_its_key() {
        let mut tree = PhraseTree::new();
        let root = tree.add_node("ROOT", None);
        let s = tree.add_node("S", Some(root));
        let blank = tree.add_node("NN", Some(s));
        tree.add_node(" ", Some(blank));
        let nn = tree.add_node("NN", Some(s));
        tree.add_node("y", Some(nn));

        let index = build(tree, vec![Relation::new(0, 2, "root")], &MarkupMap::new()).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.token(1).unwrap().word, " ");
        assert_eq!(index.token(1).unwrap().relation, "punct");
    }

    #[test]
    fn test_fallback_tag_for_bare_leaf() {
        let tree = parse_tree("hello").unwrap();
        let index = build(tree, Vec::new(), &MarkupMap::new()).unwrap();
        assert_eq!(index.token(1).unwrap().tag, "Z");
    }

    #[test]
    fn test_markup_threaded_between_tokens() {
        let tree = parse_tree("(ROOT (S (NP (DT This)) (VP (VBZ is) (NP (DT a) (NN test))) (. .)))")
            .unwrap();
        let relations = parse_dependencies(
            "nsubj(test-4, This-1)\ncop(test-4, is-2)\ndet(test-4, a-3)\nroot(ROOT-0, test-4)",
        )
        .unwrap();
        let mut markup = MarkupMap::new();
        markup.insert(0, vec!["<doc>".to_string()]);
        markup.insert(1, vec!["<a>".to_string()]);
        markup.insert(2, vec!["</a>".to_string()]);
        markup.insert(4, vec!["<!-- b -->".to_string(), "<br/>".to_string()]);
        let index = build(tree, relations, &markup).unwrap();

        let texts: Vec<_> = index.slots().map(|slot| slot.text().to_string()).collect();
        assert_eq!(
            texts,
            vec!["<doc>", "This", "<a>", "is", "</a>", "a", "test", "<!-- b -->", "<br/>", "."]
        );

        let keys: Vec<_> = index.slots().map(|slot| slot.key()).collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(index.markup().count(), 5);
        assert_eq!(index.check_tree(), Ok(()));
    }

    #[test]
    fn test_markup_after_last_token_is_kept() {
        let tree = parse_tree("(ROOT (S (VP (VB Go))))").unwrap();
        let mut markup = MarkupMap::new();
        markup.insert(3, vec!["</p>".to_string()]);
        let index = build(tree, vec![Relation::new(0, 1, "root")], &markup).unwrap();

        let last = index.slots().last().unwrap();
        assert_eq!(last.text(), "</p>");
    }

    #[test]
    fn test_root_label_leaf_is_skipped() {
        let tree = parse_tree("(ROOT)").unwrap();
        let index = build(tree, Vec::new(), &MarkupMap::new()).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_original_parse_is_kept() {
        let index = fox_index();
        assert_eq!(index.parse().tree.words().len(), 10);
        assert_eq!(index.parse().relations.len(), 10);
    }
}
