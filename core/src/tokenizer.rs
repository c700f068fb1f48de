use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref STRIP: Regex = Regex::new(r"[.,/#!$%\^*;:{}=_`~()@]").expect("valid regex");
    static ref SPACES: Regex = Regex::new(r"\s+").expect("valid regex");
    static ref WORD: Regex = Regex::new(r"(?u)\p{Alphabetic}+").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
}

/// Lowercase, drop the punctuation class, collapse whitespace and trim.
pub fn normalize(text: &str) -> String {
    let lowered = text.nfkc().collect::<String>().to_lowercase();
    let stripped = STRIP.replace_all(&lowered, "");
    SPACES.replace_all(&stripped, " ").trim().to_string()
}

/// Tokenize text into stemmed terms. Only maximal alphabetic runs become
/// tokens; digits and leftover punctuation never join neighbouring words.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    WORD.find_iter(&normalized)
        .map(|m| STEMMER.stem(m.as_str()).into_owned())
        .collect()
}

/// Absent text is an empty token stream.
pub fn tokenize_opt(text: Option<&str>) -> Vec<String> {
    text.map(tokenize).unwrap_or_default()
}
