//! Least common node and shortest path between two words
//!
//! Run with: cargo run --example common_path

use depindex::{LowercaseLemmatizer, Pipeline, Precomputed, TreeFormat};
use tracing_subscriber::EnvFilter;

const TEXT: &str = "The quick brown fox jumped over a lazy dog.";

const TREE: &str = "(ROOT (S (NP (DT The) (JJ quick) (JJ brown) (NN fox)) (VP (VBD jumped) (PP (IN over) (NP (DT a) (JJ lazy) (NN dog)))) (. .)))";

const DEPS: &str = "det(fox-4, The-1)
amod(fox-4, quick-2)
amod(fox-4, brown-3)
nsubj(jumped-5, fox-4)
root(ROOT-0, jumped-5)
prep(jumped-5, over-6)
det(dog-9, a-7)
amod(dog-9, lazy-8)
pobj(over-6, dog-9)
punct(jumped-5, .-10)";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut session = Precomputed::new();
    session.add(TREE, 0.0, DEPS)?;
    let extractor = session.clone();
    let mut pipeline = Pipeline::new(session, extractor, LowercaseLemmatizer);

    println!("Text: {}", TEXT);
    let mut sentence = pipeline.parse(TEXT)?;
    println!("{}\n", sentence.tree_view(TreeFormat::Penn));

    let (fox, dog) = (4, 9);
    match sentence.least_common_node(fox, dog)? {
        Some(found) => {
            let word = |k| sentence.token(k).map(|t| t.word.as_str()).unwrap_or("?");
            println!(
                "Least common node for \"{}\" and \"{}\": \"{}\"",
                word(fox),
                word(dog),
                word(found.common)
            );
            let mut path = found.path.clone();
            path.sort();
            let path: Vec<_> = path.into_iter().map(word).collect();
            println!("Path: {}", path.join(" "));
        }
        None => println!("No common node"),
    }

    println!("\nPruning \"fox\"...");
    sentence.prune(fox);
    println!("{}", sentence.plain_text());

    Ok(())
}
