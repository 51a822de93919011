//! Parse text with embedded markup and print it as a table
//!
//! Run with: cargo run --example markup_table

use depindex::{LowercaseLemmatizer, Pipeline, Precomputed};
use tracing_subscriber::EnvFilter;

const TEXT: &str =
    "The quick brown <tag attr=\"term\">fox<!-- this is a comment --></tag> jumped over the lazy dog.";

const TREE: &str = "(ROOT (S (NP (DT The) (JJ quick) (JJ brown) (NN fox)) (VP (VBD jumped) (PP (IN over) (NP (DT the) (JJ lazy) (NN dog)))) (. .)))";

const DEPS: &str = "det(fox-4, The-1)
amod(fox-4, quick-2)
amod(fox-4, brown-3)
nsubj(jumped-5, fox-4)
root(ROOT-0, jumped-5)
prep(jumped-5, over-6)
det(dog-9, the-7)
amod(dog-9, lazy-8)
pobj(over-6, dog-9)";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut session = Precomputed::new();
    session.add(TREE, 0.0, DEPS)?;
    let extractor = session.clone();
    let mut pipeline = Pipeline::new(session, extractor, LowercaseLemmatizer);

    println!("IN: {}", TEXT);
    let sentence = pipeline.parse_markup(TEXT)?;
    println!("OUT:");
    print!("{}", sentence.table());

    println!("\nTuples:");
    for t in sentence.legacy_tuples() {
        println!("  ({}, {}, {})", t.word, t.tag, t.lemma);
    }

    Ok(())
}
