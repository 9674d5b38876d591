// TermMatrix — similarity scores for unordered term pairs.
//
// Pairs are stored under a canonical key (the two terms sorted and joined
// with `_`, which never occurs in a stem), so lookups are order-independent.
// A pair that was never indexed reads back as `None`, distinct from a
// legitimate score of zero.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::info;

use crate::density::DensityCache;
use crate::error::{Result, TermscapeError};
use crate::scoring::{PairScorer, ScoringPolicy};
use crate::text::TermIndex;

pub(crate) const KEY_SEPARATOR: char = '_';

/// Canonical key for an unordered pair.
pub fn pair_key(a: &str, b: &str) -> String {
    assert!(
        !a.contains(KEY_SEPARATOR) && !b.contains(KEY_SEPARATOR),
        "matrix terms must not contain {KEY_SEPARATOR:?}: {a:?}, {b:?}"
    );
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    format!("{lo}{KEY_SEPARATOR}{hi}")
}

#[derive(Debug)]
pub struct TermMatrix {
    pairs: HashMap<String, f64>,
    keys: BTreeSet<String>,
    shows_progress: bool,
    parallel: bool,
    pairs_completed: usize,
}

impl Default for TermMatrix {
    fn default() -> Self {
        Self {
            pairs: HashMap::new(),
            keys: BTreeSet::new(),
            shows_progress: false,
            parallel: true,
            pairs_completed: 0,
        }
    }
}

impl TermMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a progress bar on stderr while indexing?
    pub fn shows_progress(mut self, yes: bool) -> Self {
        self.shows_progress = yes;
        self
    }

    /// Score pairs on the rayon thread pool (default) or serially.
    pub fn parallel(mut self, yes: bool) -> Self {
        self.parallel = yes;
        self
    }

    pub fn set_pair(&mut self, a: &str, b: &str, value: f64) {
        let key = pair_key(a, b);
        self.keys.insert(a.to_string());
        self.keys.insert(b.to_string());
        self.pairs.insert(key, value);
    }

    /// The stored score, or `None` if the pair was never indexed.
    pub fn get_pair(&self, a: &str, b: &str) -> Option<f64> {
        if a.contains(KEY_SEPARATOR) || b.contains(KEY_SEPARATOR) {
            return None;
        }
        self.pairs.get(&pair_key(a, b)).copied()
    }

    /// Terms that take part in at least one stored pair.
    pub fn keys(&self) -> &BTreeSet<String> {
        &self.keys
    }

    /// Number of stored pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs scored by the most recent `index` call.
    pub fn pairs_completed(&self) -> usize {
        self.pairs_completed
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
        self.keys.clear();
        self.pairs_completed = 0;
    }

    pub(crate) fn iter_pairs(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.pairs.iter()
    }

    /// Score every unordered pair drawn from `subset` (all terms when
    /// `None`). Previous contents are discarded first. On error the matrix
    /// is left empty.
    pub fn index(
        &mut self,
        terms: &TermIndex,
        subset: Option<&[String]>,
        densities: &DensityCache,
        policy: ScoringPolicy,
    ) -> Result<()> {
        self.clear();

        let selected = select_terms(terms, subset)?;
        let pairs: Vec<(usize, usize)> = (0..selected.len())
            .flat_map(|i| (i + 1..selected.len()).map(move |j| (i, j)))
            .collect();

        info!(
            terms = selected.len(),
            pairs = pairs.len(),
            policy = %policy,
            bandwidth = densities.params().bandwidth,
            parallel = self.parallel,
            "Indexing term pairs"
        );

        let scorer = PairScorer::new(terms, densities, policy);
        let bar = progress_bar(pairs.len() as u64, self.shows_progress);
        let done = AtomicUsize::new(0);

        let score_pair = |&(i, j): &(usize, usize)| -> Result<f64> {
            let score = scorer.score(selected[i], selected[j])?;
            done.fetch_add(1, Ordering::Relaxed);
            bar.inc(1);
            Ok(score)
        };

        let scores: Result<Vec<f64>> = if self.parallel {
            // Fill the curve cache once per term before fanning out pairs.
            selected
                .par_iter()
                .try_for_each(|term| densities.curve(terms, term).map(|_| ()))
                .and_then(|_| pairs.par_iter().map(score_pair).collect())
        } else {
            pairs.iter().map(score_pair).collect()
        };
        bar.finish_and_clear();

        let scores = scores?;
        for (&(i, j), score) in pairs.iter().zip(scores) {
            self.set_pair(selected[i], selected[j], score);
        }
        self.pairs_completed = done.into_inner();

        info!(
            pairs = self.len(),
            terms = self.keys.len(),
            curves = densities.len(),
            "Term matrix indexed"
        );
        Ok(())
    }

    /// Every other indexed term paired with `anchor`, highest score first.
    /// Equal scores keep lexicographic term order. Pairs never indexed are
    /// left out; an anchor with no pairs gives an empty list.
    pub fn anchored_pairs(&self, anchor: &str) -> Vec<(String, f64)> {
        let mut pairs: Vec<(String, f64)> = self
            .keys
            .iter()
            .filter(|term| term.as_str() != anchor)
            .filter_map(|term| self.get_pair(anchor, term).map(|s| (term.clone(), s)))
            .collect();
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
        pairs
    }
}

/// Resolve the term subset: dedup in order, and reject unknown terms
/// before any scoring starts.
fn select_terms<'a>(terms: &'a TermIndex, subset: Option<&'a [String]>) -> Result<Vec<&'a str>> {
    let candidates = subset.unwrap_or(terms.terms());
    let mut seen = BTreeSet::new();
    let mut selected = Vec::with_capacity(candidates.len());
    for term in candidates {
        if !terms.contains(term) {
            return Err(TermscapeError::unknown_term(term.as_str()));
        }
        if seen.insert(term.as_str()) {
            selected.push(term.as_str());
        }
    }
    Ok(selected)
}

fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template("  Pairs [{bar:30}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}
