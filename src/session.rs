//! Parser collaborators and the annotation pipeline
//!
//! Statistical parsing, relation extraction and lemmatization are supplied
//! from outside through the traits below. [`Pipeline`] owns one parser
//! session exclusively and turns text into fresh [`SentenceIndex`]es.

use regex::Regex;
use rustc_hash::FxHashMap;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

use crate::config::IndexConfig;
use crate::index::{BuildError, IndexBuilder, MarkupMap, SentenceIndex};
use crate::parser::{ParseError, parse_dependencies, parse_tree};
use crate::tree::{Parse, PhraseTree, Relation};

static MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[^>]+>|(?:\p{L}\.){2,}|\w+(?:['’]\w+)*|[^\w\s]").unwrap()
});

// Treebank clitics split off their host: do|n't, it|'s, we|'re
static CLITIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\w+?)(n['’]t|['’](?:s|re|ll|ve|d|m))$").unwrap());

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("The sentence was not accepted by the parser: {text}")]
    Unparseable { text: String },

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Splits raw text into word and markup tokens, in order
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// A stateful statistical parser
///
/// Takes `&mut self`: a session must not be driven from two threads at once.
pub trait ParserSession {
    /// Best parse of a token sequence, or `None` if the parser rejects it
    fn parse(&mut self, words: &[String]) -> Option<PhraseTree>;

    /// Up to `k` best parses with their log-probabilities, best first
    fn kbest(&mut self, words: &[String], k: usize) -> Vec<(PhraseTree, f64)>;
}

/// Derives governor/dependent relations from a phrase-structure tree
pub trait RelationExtractor {
    fn relations(&self, tree: &PhraseTree) -> Vec<Relation>;
}

/// Maps a surface word and its tag to a lemma
pub trait Lemmatizer {
    fn lemmatize(&self, word: &str, tag: &str) -> String;
}

/// Words, `<...>` markup and single punctuation characters
///
/// Follows treebank conventions for the common cases: `n't` and `'s`-style
/// clitics become tokens of their own and dotted abbreviations like `U.S.`
/// stay whole. Quote conversion and the rest of the treebank rules are not
/// applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexTokenizer;

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        for m in TOKEN.find_iter(text) {
            match CLITIC.captures(m.as_str()) {
                Some(caps) => {
                    tokens.push(caps[1].to_string());
                    tokens.push(caps[2].to_string());
                }
                None => tokens.push(m.as_str().to_string()),
            }
        }
        tokens
    }
}

/// Lowercases the word; a stand-in when no morphological analyser is at hand
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseLemmatizer;

impl Lemmatizer for LowercaseLemmatizer {
    fn lemmatize(&self, word: &str, _tag: &str) -> String {
        word.to_lowercase()
    }
}

/// Replays parser output captured elsewhere
///
/// Candidates are keyed by the space-joined token sequence. Each candidate
/// is a bracketed tree, its log-probability and its dependency listing.
#[derive(Debug, Clone, Default)]
pub struct Precomputed {
    candidates: FxHashMap<String, Vec<(PhraseTree, f64)>>,
    relations: FxHashMap<String, Vec<Relation>>,
}

impl Precomputed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parse for the sentence whose words are the tree's leaves
    pub fn add(&mut self, tree: &str, log_prob: f64, dependencies: &str) -> Result<(), ParseError> {
        let tree = parse_tree(tree)?;
        let relations = parse_dependencies(dependencies)?;
        self.relations.insert(tree.to_oneline(), relations);
        self.candidates
            .entry(tree.words().join(" "))
            .or_default()
            .push((tree, log_prob));
        Ok(())
    }

    fn lookup(&self, words: &[String]) -> Option<&Vec<(PhraseTree, f64)>> {
        self.candidates.get(&words.join(" "))
    }
}

impl ParserSession for Precomputed {
    fn parse(&mut self, words: &[String]) -> Option<PhraseTree> {
        self.kbest(words, 1).into_iter().next().map(|(tree, _)| tree)
    }

    fn kbest(&mut self, words: &[String], k: usize) -> Vec<(PhraseTree, f64)> {
        let Some(candidates) = self.lookup(words) else {
            return Vec::new();
        };
        let mut ranked = candidates.clone();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(k);
        ranked
    }
}

impl RelationExtractor for Precomputed {
    fn relations(&self, tree: &PhraseTree) -> Vec<Relation> {
        self.relations
            .get(&tree.to_oneline())
            .cloned()
            .unwrap_or_default()
    }
}

/// Remove all `<...>` markup from text
pub fn strip_markup(text: &str) -> String {
    MARKUP.replace_all(text, "").into_owned()
}

/// Peel markup tokens off a token stream
///
/// Returns the real words and the markup map keyed by the number of real
/// words seen before each fragment.
pub fn split_markup(tokens: Vec<String>) -> (Vec<String>, MarkupMap) {
    let mut words = Vec::with_capacity(tokens.len());
    let mut markup = MarkupMap::new();
    for token in tokens {
        if token.starts_with('<') {
            markup.entry(words.len()).or_default().push(token);
        } else {
            words.push(token);
        }
    }
    (words, markup)
}

/// Text in, sentence indices out
pub struct Pipeline<S, E, L, T = RegexTokenizer> {
    session: S,
    extractor: E,
    lemmatizer: L,
    tokenizer: T,
    config: IndexConfig,
}

impl<S, E, L> Pipeline<S, E, L>
where
    S: ParserSession,
    E: RelationExtractor,
    L: Lemmatizer,
{
    pub fn new(session: S, extractor: E, lemmatizer: L) -> Self {
        Self::with_tokenizer(session, extractor, lemmatizer, RegexTokenizer)
    }
}

impl<S, E, L, T> Pipeline<S, E, L, T>
where
    S: ParserSession,
    E: RelationExtractor,
    L: Lemmatizer,
    T: Tokenizer,
{
    pub fn with_tokenizer(session: S, extractor: E, lemmatizer: L, tokenizer: T) -> Self {
        Self {
            session,
            extractor,
            lemmatizer,
            tokenizer,
            config: IndexConfig::default(),
        }
    }

    pub fn with_config(mut self, config: IndexConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.tokenizer.tokenize(text)
    }

    /// Strip markup, then parse
    pub fn parse(&mut self, text: &str) -> Result<SentenceIndex, SessionError> {
        let words = self.tokenize(&strip_markup(text));
        self.parse_words(text, &words, &MarkupMap::new())
    }

    /// Parse while keeping markup positions, threading fragments into the index
    pub fn parse_markup(&mut self, text: &str) -> Result<SentenceIndex, SessionError> {
        let (words, markup) = split_markup(self.tokenize(text));
        self.parse_words(text, &words, &markup)
    }

    /// Up to `k` candidate analyses with their probabilities, best first
    ///
    /// Each candidate gets its own index.
    pub fn most_probable_parses(
        &mut self,
        text: &str,
        k: usize,
    ) -> Result<Vec<(SentenceIndex, f64)>, SessionError> {
        let words = self.tokenize(text);
        self.check_length(text, &words)?;

        let candidates = self.session.kbest(&words, k);
        if candidates.is_empty() {
            return Err(unparseable(text));
        }
        debug!(candidates = candidates.len(), "k-best parses");

        candidates
            .into_iter()
            .map(|(tree, log_prob)| {
                let index = self.index(tree, &MarkupMap::new())?;
                Ok((index, log_prob.exp()))
            })
            .collect()
    }

    fn parse_words(
        &mut self,
        text: &str,
        words: &[String],
        markup: &MarkupMap,
    ) -> Result<SentenceIndex, SessionError> {
        self.check_length(text, words)?;
        let tree = self
            .session
            .parse(words)
            .ok_or_else(|| unparseable(text))?;
        self.index(tree, markup)
    }

    fn index(&self, tree: PhraseTree, markup: &MarkupMap) -> Result<SentenceIndex, SessionError> {
        let relations = self.extractor.relations(&tree);
        let builder = IndexBuilder::new(&self.config, &self.lemmatizer);
        Ok(builder.build(Parse::new(tree, relations), markup)?)
    }

    fn check_length(&self, text: &str, words: &[String]) -> Result<(), SessionError> {
        if words.is_empty() || words.len() > self.config.max_length {
            return Err(unparseable(text));
        }
        Ok(())
    }
}

fn unparseable(text: &str) -> SessionError {
    SessionError::Unparseable {
        text: text.to_string(),
    }
}
