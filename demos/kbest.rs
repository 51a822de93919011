//! Several candidate parses with their probabilities
//!
//! Run with: cargo run --example kbest

use depindex::{LowercaseLemmatizer, Pipeline, Precomputed};
use tracing_subscriber::EnvFilter;

const TEXT: &str = "I saw a man with a telescope.";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut session = Precomputed::new();
    // PP attached to the verb
    session.add(
        "(ROOT (S (NP (PRP I)) (VP (VBD saw) (NP (DT a) (NN man)) (PP (IN with) (NP (DT a) (NN telescope)))) (. .)))",
        -38.2,
        "nsubj(saw-2, I-1)\nroot(ROOT-0, saw-2)\ndet(man-4, a-3)\ndobj(saw-2, man-4)\nprep(saw-2, with-5)\ndet(telescope-7, a-6)\npobj(with-5, telescope-7)",
    )?;
    // PP attached to the noun
    session.add(
        "(ROOT (S (NP (PRP I)) (VP (VBD saw) (NP (NP (DT a) (NN man)) (PP (IN with) (NP (DT a) (NN telescope))))) (. .)))",
        -38.9,
        "nsubj(saw-2, I-1)\nroot(ROOT-0, saw-2)\ndet(man-4, a-3)\ndobj(saw-2, man-4)\nprep(man-4, with-5)\ndet(telescope-7, a-6)\npobj(with-5, telescope-7)",
    )?;
    let extractor = session.clone();
    let mut pipeline = Pipeline::new(session, extractor, LowercaseLemmatizer);

    println!("IN: {}\n", TEXT);
    for (sentence, prob) in pipeline.most_probable_parses(TEXT, 2)? {
        println!("Probability: {:e}", prob);
        print!("{}", sentence.table());
        println!("{}", "-".repeat(50));
    }

    Ok(())
}
