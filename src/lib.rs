//! Depindex: dependency-annotated sentence indices
//!
//! Turns a phrase-structure parse, its governor/dependent relations and the
//! markup stripped before parsing into one ordered, queryable sentence index.
//! Statistical parsing itself is left to an external parser session.

// Core modules
pub mod config; // Sentinel labels and session limits
pub mod format; // Plain text, table, tuple and tree views
pub mod index; // Sentence index and its builder
pub mod key; // Integer and fractional slot keys
pub mod normalize; // Word and tag corrections
pub mod parser; // Bracketed tree and dependency listing reader
pub mod query; // Ancestor paths, common ancestors, pruning
pub mod session; // Parser collaborators and the text pipeline
pub mod tree; // Phrase-structure trees and relations

// Python bindings
#[cfg(feature = "pyo3")]
pub mod python;

#[cfg(test)]
mod fixtures;

// Re-exports for convenience
pub use config::IndexConfig;
pub use format::{TaggedWord, TreeFormat};
pub use index::{BuildError, IndexBuilder, MarkupMap, SentenceIndex, Slot, Token};
pub use key::{MarkupKey, ROOT, SlotKey, TokenId};
pub use parser::{parse_dependencies, parse_tree};
pub use query::{CommonNode, QueryError};
pub use session::{
    Lemmatizer, LowercaseLemmatizer, ParserSession, Pipeline, Precomputed, RegexTokenizer,
    RelationExtractor, SessionError, Tokenizer,
};
pub use tree::{Parse, PhraseTree, Relation};
