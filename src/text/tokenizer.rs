// Tokenizer — raw text to positionally indexed, stemmed tokens.
//
// Words are maximal runs of ASCII letters; everything else is a separator.
// Markup tags are blanked out first (same byte length), so token spans point
// into the original text. Offsets are dense: only retained tokens consume an
// offset, so the distance between two offsets counts non-stopword words.

use std::ops::Range;
use std::sync::OnceLock;

use regex_lite::{Captures, Regex};
use rust_stemmers::{Algorithm, Stemmer};

use super::stopwords::Stopwords;
use crate::error::{Result, TermscapeError};

static WORDS: OnceLock<Regex> = OnceLock::new();
static TAGS: OnceLock<Regex> = OnceLock::new();

fn words() -> &'static Regex {
    WORDS.get_or_init(|| Regex::new("[A-Za-z]+").expect("word pattern is valid"))
}

fn tags() -> &'static Regex {
    TAGS.get_or_init(|| Regex::new("</?[^<>]*>").expect("tag pattern is valid"))
}

/// One retained occurrence of a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Stemmed form, the term identity
    pub stemmed: String,
    /// Lower-cased surface form
    pub unstemmed: String,
    /// Position among retained tokens, starting at 0
    pub offset: usize,
    /// Byte range of the word in the input text
    pub span: Range<usize>,
}

/// Replace every tag with spaces of the same byte length.
pub fn strip_tags(text: &str) -> String {
    tags()
        .replace_all(text, |caps: &Captures<'_>| " ".repeat(caps[0].len()))
        .into_owned()
}

pub struct Tokenizer {
    stopwords: Stopwords,
    stemmer: Stemmer,
}

impl Tokenizer {
    pub fn new(stopwords: Stopwords) -> Self {
        Self {
            stopwords,
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    pub fn stopwords(&self) -> &Stopwords {
        &self.stopwords
    }

    /// Stem a single lower-cased word.
    pub fn stem(&self, word: &str) -> String {
        self.stemmer.stem(word).into_owned()
    }

    /// Tokenize a text. Empty input (or input made only of stopwords and
    /// separators) yields an empty vector.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let stripped = strip_tags(text);
        let mut tokens = Vec::new();

        for m in words().find_iter(&stripped) {
            let unstemmed = m.as_str().to_ascii_lowercase();
            if self.stopwords.contains(&unstemmed) {
                continue;
            }
            tokens.push(Token {
                stemmed: self.stem(&unstemmed),
                unstemmed,
                offset: tokens.len(),
                span: m.range(),
            });
        }

        tokens
    }

    /// Tokenize a query that must name exactly one word, such as a
    /// neighbour lookup. Inputs that split into several words ("white-whale")
    /// or leave nothing after stopword filtering are refused.
    pub fn single_term(&self, word: &str) -> Result<Token> {
        let mut tokens = self.tokenize(word);
        match tokens.len() {
            1 => Ok(tokens.remove(0)),
            0 => Err(TermscapeError::invalid(
                "word",
                format!("{word:?} is a stopword or contains no letters"),
            )),
            n => Err(TermscapeError::invalid(
                "word",
                format!("{word:?} splits into {n} words, expected one"),
            )),
        }
    }
}
