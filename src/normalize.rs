//! Lexical corrections applied wherever words and tags are emitted

/// Undo the parser's bracket escaping
pub fn normalize_word(word: &str) -> &str {
    match word {
        "-LRB-" => "(",
        "-RRB-" => ")",
        _ => word,
    }
}

/// Fold the infinitival marker into the preposition/subordinator tag
///
/// `to` tagged `TO` becomes `IN`; every other pair passes through.
pub fn normalize_tag<'a>(word: &str, tag: &'a str) -> &'a str {
    if word == "to" && tag == "TO" { "IN" } else { tag }
}

/// The ASCII punctuation characters in code-point order
const PUNCTUATION: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

/// Punctuation never takes part in the dependency structure
///
/// A word is punctuation when it is a contiguous run of [`PUNCTUATION`],
/// so `(` and `,` are but `...`, ` `` ` and `--` are not. The empty word is.
pub fn is_punctuation(word: &str) -> bool {
    PUNCTUATION.contains(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("-LRB-"), "(");
        assert_eq!(normalize_word("-RRB-"), ")");
        assert_eq!(normalize_word("dog"), "dog");
    }

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("to", "TO"), "IN");
        assert_eq!(normalize_tag("To", "TO"), "TO");
        assert_eq!(normalize_tag("to", "IN"), "IN");
        assert_eq!(normalize_tag("dog", "NN"), "NN");
    }

    #[test]
    fn test_is_punctuation() {
        for word in [".", ",", "?", "(", ")", "", "()", "./", "{|}"] {
            assert!(is_punctuation(word), "{word:?}");
        }
        for word in ["--", "``", "''", "...", " ", "dog", "U.S.", "3.5", "a-b", "é"] {
            assert!(!is_punctuation(word), "{word:?}");
        }
    }
}
