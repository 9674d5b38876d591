// Stopword sets.
//
// The default list comes from the `stop-words` crate. Users can replace it
// with their own file (one word per line) or extend the default.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use stop_words::{get, LANGUAGE};
use tracing::debug;

use crate::error::Result;

/// A set of lower-cased words to drop during tokenization.
#[derive(Debug, Clone, Default)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// The bundled English list.
    pub fn english() -> Self {
        let words: Vec<String> = get(LANGUAGE::English);
        Self::from_words(words)
    }

    /// An empty set. Every word is kept.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        set.extend(words);
        set
    }

    /// Load a stopword file: one word per line, blank lines ignored.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let set = Self::from_words(raw.lines());
        debug!(path = %path.display(), words = set.len(), "Loaded stopword file");
        Ok(set)
    }

    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let word = word.as_ref().trim();
            if !word.is_empty() {
                self.words.insert(word.to_lowercase());
            }
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
