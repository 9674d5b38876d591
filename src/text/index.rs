// TermIndex — stemmed term -> ascending offsets, plus frequency queries.
//
// Built once from the tokenizer output and read-only afterwards. Terms keep
// their first-encountered order, which is the tie-break for every
// frequency ranking below.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::tokenizer::{Token, Tokenizer};
use crate::error::{Result, TermscapeError};

/// Maps a stemmed term back to a human-readable label.
pub trait Unstem {
    fn unstem_label(&self, term: &str) -> Result<String>;
}

#[derive(Debug, Clone, Default)]
struct TermEntry {
    offsets: Vec<usize>,
    /// Surface forms with their counts, in first-encountered order
    surfaces: Vec<(String, usize)>,
}

impl TermEntry {
    fn record(&mut self, token: &Token) {
        self.offsets.push(token.offset);
        match self.surfaces.iter_mut().find(|(s, _)| *s == token.unstemmed) {
            Some((_, count)) => *count += 1,
            None => self.surfaces.push((token.unstemmed.clone(), 1)),
        }
    }

    fn top_surface(&self) -> &str {
        // Strict `>` keeps the first-encountered form on ties.
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.surfaces {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(s, _)| s.as_str()).unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct TermIndex {
    order: Vec<String>,
    entries: HashMap<String, TermEntry>,
    token_count: usize,
}

impl TermIndex {
    /// Build the index from tokenizer output.
    ///
    /// Fails with `EmptyCorpus` when no tokens survived stopword filtering,
    /// since density estimation is undefined over an empty document.
    pub fn from_tokens(tokens: &[Token]) -> Result<Self> {
        if tokens.is_empty() {
            return Err(TermscapeError::EmptyCorpus);
        }

        let mut order = Vec::new();
        let mut entries: HashMap<String, TermEntry> = HashMap::new();
        for token in tokens {
            let entry = entries.entry(token.stemmed.clone()).or_insert_with(|| {
                order.push(token.stemmed.clone());
                TermEntry::default()
            });
            entry.record(token);
        }

        info!(
            tokens = tokens.len(),
            terms = order.len(),
            "Indexed term offsets"
        );

        Ok(Self {
            order,
            entries,
            token_count: tokens.len(),
        })
    }

    pub fn from_text(text: &str, tokenizer: &Tokenizer) -> Result<Self> {
        Self::from_tokens(&tokenizer.tokenize(text))
    }

    /// Number of retained tokens, which is the length of the position axis.
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    /// Distinct terms in first-encountered order.
    pub fn terms(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.entries.contains_key(term)
    }

    pub fn offsets(&self, term: &str) -> Result<&[usize]> {
        self.entry(term).map(|e| e.offsets.as_slice())
    }

    pub fn occurrence_count(&self, term: &str) -> Result<usize> {
        self.entry(term).map(|e| e.offsets.len())
    }

    /// Term counts, descending; equal counts keep first-encountered order.
    pub fn term_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = self
            .order
            .iter()
            .map(|t| (t.clone(), self.entries[t].offsets.len()))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    /// Count -> terms that occur exactly that many times.
    pub fn term_count_buckets(&self) -> BTreeMap<usize, Vec<String>> {
        let mut buckets: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for term in &self.order {
            buckets
                .entry(self.entries[term].offsets.len())
                .or_default()
                .push(term.clone());
        }
        buckets
    }

    /// The `depth` most frequent terms, widened so the lowest selected
    /// frequency bucket is never split.
    pub fn most_frequent_terms(&self, depth: usize) -> BTreeSet<String> {
        let counts = self.term_counts();
        if depth == 0 || counts.is_empty() {
            return BTreeSet::new();
        }
        let cutoff = counts[depth.min(counts.len()) - 1].1;
        counts
            .into_iter()
            .take_while(|(_, count)| *count >= cutoff)
            .map(|(term, _)| term)
            .collect()
    }

    /// The most frequent surface form of a term.
    pub fn unstem(&self, term: &str) -> Result<&str> {
        self.entry(term).map(TermEntry::top_surface)
    }

    /// Labels for a set of terms, for storing alongside a matrix snapshot.
    pub fn labels<'a, I>(&self, terms: I) -> Result<TermLabels>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut labels = BTreeMap::new();
        for term in terms {
            labels.insert(term.clone(), self.unstem(term)?.to_string());
        }
        Ok(TermLabels(labels))
    }

    fn entry(&self, term: &str) -> Result<&TermEntry> {
        self.entries
            .get(term)
            .ok_or_else(|| TermscapeError::unknown_term(term))
    }
}

impl Unstem for TermIndex {
    fn unstem_label(&self, term: &str) -> Result<String> {
        self.unstem(term).map(str::to_string)
    }
}

/// A detached stem -> label map, used when the text itself is gone
/// (a graph rebuilt from a saved matrix).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermLabels(pub BTreeMap<String, String>);

impl TermLabels {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, term: &str) -> Option<&str> {
        self.0.get(term).map(String::as_str)
    }
}

impl Unstem for TermLabels {
    fn unstem_label(&self, term: &str) -> Result<String> {
        self.get(term)
            .map(str::to_string)
            .ok_or_else(|| TermscapeError::unknown_term(term))
    }
}

/// Labels that fall back to the stem itself for terms the inner source
/// does not know. Lets a matrix saved without labels still be skimmed.
#[derive(Debug, Clone, Copy)]
pub struct OrStem<'a, U: ?Sized>(pub &'a U);

impl<U: Unstem + ?Sized> Unstem for OrStem<'_, U> {
    fn unstem_label(&self, term: &str) -> Result<String> {
        match self.0.unstem_label(term) {
            Err(TermscapeError::UnknownTerm { .. }) => Ok(term.to_string()),
            other => other,
        }
    }
}
