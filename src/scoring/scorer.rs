// PairScorer — scores two terms of one text by their density curves.

use crate::density::DensityCache;
use crate::error::{Result, TermscapeError};
use crate::text::TermIndex;

use super::policy::ScoringPolicy;

pub struct PairScorer<'a> {
    index: &'a TermIndex,
    densities: &'a DensityCache,
    policy: ScoringPolicy,
}

impl<'a> PairScorer<'a> {
    pub fn new(index: &'a TermIndex, densities: &'a DensityCache, policy: ScoringPolicy) -> Self {
        Self {
            index,
            densities,
            policy,
        }
    }

    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    /// Similarity of two indexed terms. Either term missing from the index
    /// is an `UnknownTerm` error, never a silent zero.
    pub fn score(&self, a: &str, b: &str) -> Result<f64> {
        for term in [a, b] {
            if !self.index.contains(term) {
                return Err(TermscapeError::unknown_term(term));
            }
        }
        let curve_a = self.densities.curve(self.index, a)?;
        let curve_b = self.densities.curve(self.index, b)?;
        Ok(self.policy.score(&curve_a, &curve_b))
    }
}
