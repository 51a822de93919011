//! Output projections of a sentence index
//!
//! - `plain_text`: words only, with punctuation glued to the left
//! - `table`: one tab-separated row per slot, markup included
//! - `legacy_tuples`: (word, tag, lemma) triples in sentence order
//! - `tree_view`: the original parse rendered in a named mode

use std::str::FromStr;
use thiserror::Error;

use crate::index::{SentenceIndex, Slot};
use crate::normalize::normalize_tag;

/// Punctuation that never takes a space before it
const TIGHT_PUNCTUATION: [char; 6] = [',', '.', ':', ';', '!', '?'];

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown tree format: {0}")]
pub struct UnknownFormat(pub String);

/// Rendering modes for [`SentenceIndex::tree_view`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFormat {
    /// Indented bracketed constituency tree
    Penn,
    /// Bracketed constituency tree on a single line
    OneLine,
    /// One `label(governor-i, dependent-j)` line per relation
    TypedDependencies,
}

impl FromStr for TreeFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "penn" => Ok(TreeFormat::Penn),
            "oneline" => Ok(TreeFormat::OneLine),
            "typedDependencies" => Ok(TreeFormat::TypedDependencies),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// One row of the legacy (word, tag, lemma) projection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedWord {
    pub word: String,
    pub tag: String,
    pub lemma: String,
}

impl SentenceIndex {
    /// Space-joined words in key order, without markup
    pub fn plain_text(&self) -> String {
        let mut text = self
            .tokens()
            .map(|(_, token)| token.word.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        for mark in TIGHT_PUNCTUATION {
            text = text.replace(&format!(" {}", mark), &mark.to_string());
        }
        text
    }

    /// Tab-separated rows: key, word, lemma, tag, relation, governor
    ///
    /// Markup rows show the placeholder key, the fragment as word and lemma,
    /// the markup tag and empty relation and governor fields.
    pub fn table(&self) -> String {
        let config = &self.config;
        let mut out = String::new();
        for slot in self.slots() {
            let row = match slot {
                Slot::Token(id, token) => format!(
                    "{}\t{}\t{}\t{}\t{}\t{}\n",
                    id, token.word, token.lemma, token.tag, token.relation, token.governor
                ),
                Slot::Markup(_, text) => format!(
                    "{}\t{}\t{}\t{}\t{}\t{}\n",
                    config.markup_placeholder,
                    text,
                    text,
                    config.markup_tag,
                    config.empty_field,
                    config.empty_field
                ),
            };
            out.push_str(&row);
        }
        out
    }

    /// (word, tag, lemma) for every slot in sentence order
    ///
    /// Markup gets the markup tag and itself as lemma. The tag correction is
    /// applied again here so this view agrees with the index.
    pub fn legacy_tuples(&self) -> Vec<TaggedWord> {
        self.slots()
            .map(|slot| match slot {
                Slot::Token(_, token) => TaggedWord {
                    word: token.word.clone(),
                    tag: normalize_tag(&token.word, &token.tag).to_string(),
                    lemma: token.lemma.clone(),
                },
                Slot::Markup(_, text) => TaggedWord {
                    word: text.to_string(),
                    tag: self.config.markup_tag.clone(),
                    lemma: text.to_string(),
                },
            })
            .collect()
    }

    /// Render the original, unpruned parse
    pub fn tree_view(&self, format: TreeFormat) -> String {
        match format {
            TreeFormat::Penn => self.parse.tree.to_penn(),
            TreeFormat::OneLine => self.parse.tree.to_oneline(),
            TreeFormat::TypedDependencies => {
                let words = self.parse.tree.words();
                let word_at = |position: usize| {
                    if position == 0 {
                        self.config.root_label.as_str()
                    } else {
                        words.get(position - 1).copied().unwrap_or("")
                    }
                };
                let mut out = String::new();
                for relation in &self.parse.relations {
                    out.push_str(&format!(
                        "{}({}-{}, {}-{})\n",
                        relation.label,
                        word_at(relation.governor),
                        relation.governor,
                        word_at(relation.dependent),
                        relation.dependent
                    ));
                }
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{FOX_DEPS, FOX_TREE, fox_index, fox_session};

    #[test]
    fn test_plain_text() {
        let text = fox_index().plain_text();
        assert_eq!(text, "The quick brown fox jumped over a lazy dog.");
        assert!(!text.contains("  "));
        assert!(!text.contains(" ."));
    }

    #[test]
    fn test_plain_text_after_prune() {
        let mut index = fox_index();
        index.prune(4);
        assert_eq!(index.plain_text(), "jumped over a lazy dog.");
    }

    #[test]
    fn test_table() {
        let table = fox_index().table();
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines.len(), 10);
        assert_eq!(lines[3], "4\tfox\tfox\tNN\tnsubj\t5");
        assert_eq!(lines[4], "5\tjumped\tjumped\tVBD\troot\t0");
        assert_eq!(lines[9], "10\t.\t.\t.\tpunct\t0");
    }

    #[test]
    fn test_table_with_markup() {
        let mut pipeline = fox_session();
        let index = pipeline
            .parse_markup("The quick brown <tag>fox</tag> jumped over a lazy dog.")
            .unwrap();
        let table = index.table();
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines.len(), 12);
        assert_eq!(lines[2], "3\tbrown\tbrown\tJJ\tamod\t4");
        assert_eq!(lines[3], "-\t<tag>\t<tag>\tXML\t_\t_");
        assert_eq!(lines[4], "4\tfox\tfox\tNN\tnsubj\t5");
        assert_eq!(lines[5], "-\t</tag>\t</tag>\tXML\t_\t_");
    }

    #[test]
    fn test_legacy_tuples() {
        let mut pipeline = fox_session();
        let index = pipeline
            .parse_markup("<s>The quick brown fox jumped over a lazy dog.")
            .unwrap();
        let tuples = index.legacy_tuples();

        assert_eq!(tuples.len(), 11);
        assert_eq!(
            tuples[0],
            TaggedWord {
                word: "<s>".to_string(),
                tag: "XML".to_string(),
                lemma: "<s>".to_string()
            }
        );
        assert_eq!(tuples[1].word, "The");
        assert_eq!(tuples[1].tag, "DT");
        assert_eq!(tuples[1].lemma, "the");
    }

    #[test]
    fn test_legacy_tuples_fix_to() {
        let mut index = fox_index();
        // Simulate a tag produced upstream without the correction
        let token = index.tokens.get_mut(&6).unwrap();
        token.word = "to".to_string();
        token.tag = "TO".to_string();

        let tuples = index.legacy_tuples();
        assert_eq!(tuples[5].word, "to");
        assert_eq!(tuples[5].tag, "IN");
    }

    #[test]
    fn test_tree_view() {
        let mut index = fox_index();
        index.prune(4);

        // Views always show the original parse
        assert_eq!(index.tree_view(TreeFormat::OneLine), FOX_TREE);
        assert!(index.tree_view(TreeFormat::Penn).starts_with("(ROOT\n  (S\n"));
        assert_eq!(
            index.tree_view(TreeFormat::TypedDependencies),
            format!("{}\n", FOX_DEPS)
        );
    }

    #[test]
    fn test_tree_format_names() {
        assert_eq!("penn".parse(), Ok(TreeFormat::Penn));
        assert_eq!("typedDependencies".parse(), Ok(TreeFormat::TypedDependencies));
        assert_eq!(
            "dot".parse::<TreeFormat>(),
            Err(UnknownFormat("dot".to_string()))
        );
    }
}
