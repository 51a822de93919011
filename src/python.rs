//! Python bindings for depindex
//!
//! This module provides PyO3-based Python bindings for the Rust core.

use pyo3::exceptions::{PyIndexError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::config::IndexConfig;
use crate::format::TreeFormat;
use crate::index::{BuildError, IndexBuilder, MarkupMap, SentenceIndex};
use crate::parser::{ParseError, parse_dependencies, parse_tree};
use crate::query::QueryError;
use crate::session::LowercaseLemmatizer;
use crate::tree::Parse;

impl From<BuildError> for PyErr {
    fn from(err: BuildError) -> PyErr {
        PyRuntimeError::new_err(err.to_string())
    }
}

impl From<ParseError> for PyErr {
    fn from(err: ParseError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

impl From<QueryError> for PyErr {
    fn from(err: QueryError) -> PyErr {
        PyRuntimeError::new_err(err.to_string())
    }
}

#[pyclass(name = "Sentence")]
pub struct PySentence {
    inner: SentenceIndex,
}

#[pymethods]
impl PySentence {
    /// Build a sentence from parser output.
    ///
    /// Args:
    ///     tree: Bracketed constituency tree, e.g. "(ROOT (S ...))"
    ///     dependencies: Typed dependency listing, one "label(gov-i, dep-j)" per line
    ///     markup: Optional dict mapping a boundary (number of preceding words)
    ///             to the markup fragments found there
    ///
    /// Lemmas are the lowercased words.
    #[new]
    #[pyo3(signature = (tree, dependencies, markup=None))]
    fn new(tree: &str, dependencies: &str, markup: Option<MarkupMap>) -> PyResult<Self> {
        let parse = Parse::new(parse_tree(tree)?, parse_dependencies(dependencies)?);
        let config = IndexConfig::default();
        let inner = IndexBuilder::new(&config, &LowercaseLemmatizer)
            .build(parse, &markup.unwrap_or_default())?;
        Ok(Self { inner })
    }

    fn word(&self, key: usize) -> PyResult<String> {
        self.inner
            .token(key)
            .map(|token| token.word.clone())
            .ok_or_else(|| PyIndexError::new_err(format!("no such token: {}", key)))
    }

    fn path_to_root(&self, key: usize) -> PyResult<Vec<usize>> {
        Ok(self.inner.path_to_root(key)?)
    }

    /// Returns (common, path) or None when the two words share no ancestor.
    fn least_common_node(&self, a: usize, b: usize) -> PyResult<Option<(usize, Vec<usize>)>> {
        Ok(self
            .inner
            .least_common_node(a, b)?
            .map(|found| (found.common, found.path)))
    }

    fn descendants(&self, key: usize) -> Vec<usize> {
        self.inner.descendants(key)
    }

    /// Remove a word and everything below it; returns the removed keys.
    fn prune(&mut self, key: usize) -> Vec<usize> {
        self.inner.prune(key)
    }

    fn plain_text(&self) -> String {
        self.inner.plain_text()
    }

    fn table(&self) -> String {
        self.inner.table()
    }

    /// (word, tag, lemma) triples in sentence order, markup included.
    fn tuples(&self) -> Vec<(String, String, String)> {
        self.inner
            .legacy_tuples()
            .into_iter()
            .map(|t| (t.word, t.tag, t.lemma))
            .collect()
    }

    /// Render the original parse: "penn", "oneline" or "typedDependencies".
    #[pyo3(signature = (mode="penn"))]
    fn tree_view(&self, mode: &str) -> PyResult<String> {
        let format: TreeFormat = mode
            .parse()
            .map_err(|e: crate::format::UnknownFormat| PyValueError::new_err(e.to_string()))?;
        Ok(self.inner.tree_view(format))
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        let text = self.inner.plain_text();
        if text.chars().count() > 40 {
            let head: String = text.chars().take(40).collect();
            format!("<Sentence len={} text='{} ...'>", self.inner.len(), head)
        } else {
            format!("<Sentence len={} text='{}'>", self.inner.len(), text)
        }
    }
}

#[pymodule]
fn depindex(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySentence>()?;
    m.add_function(wrap_pyfunction!(__version__, m)?)?;
    Ok(())
}

#[pyfunction]
fn __version__() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
