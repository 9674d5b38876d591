// Term selection — which terms enter the matrix.
//
// `Frequent` keeps the most frequent terms, completing the last frequency
// bucket. `Clumpy` ranks terms by how concentrated their density curve is,
// so words that bunch up in a few passages win over words spread evenly
// through the text.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::AnalysisConfig;
use crate::density::{DensityCache, DensityCurve};
use crate::error::Result;
use crate::text::TermIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermSelection {
    #[default]
    Frequent,
    Clumpy,
}

impl TermSelection {
    pub const ALL: [TermSelection; 2] = [TermSelection::Frequent, TermSelection::Clumpy];

    pub fn as_str(&self) -> &'static str {
        match self {
            TermSelection::Frequent => "frequent",
            TermSelection::Clumpy => "clumpy",
        }
    }
}

impl fmt::Display for TermSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TermSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TermSelection::ALL
            .into_iter()
            .find(|sel| sel.as_str() == s.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown term selection {s:?}"))
    }
}

/// Peak of a curve relative to its mass. Zero for an all-zero curve.
pub fn clumpiness(curve: &DensityCurve) -> f64 {
    let area = curve.trapezoid();
    if area <= 0.0 {
        return 0.0;
    }
    curve.values().iter().copied().fold(0.0, f64::max) / area
}

/// The `depth` clumpiest terms with their scores, clumpiest first.
///
/// Terms that occur once have no spread to measure and are skipped. Equal
/// scores fall back to frequency, then first-encountered order. Curves are
/// computed through `densities`, so a matrix indexed afterwards with the same
/// cache reuses them.
pub fn clumpiest_terms(
    index: &TermIndex,
    densities: &DensityCache,
    depth: usize,
    parallel: bool,
) -> Result<Vec<(String, f64)>> {
    let candidates: Vec<(String, usize)> = index
        .term_counts()
        .into_iter()
        .filter(|(_, count)| *count >= 2)
        .collect();

    let score = |(term, _): &(String, usize)| -> Result<(String, f64)> {
        let curve = densities.curve(index, term)?;
        Ok((term.clone(), clumpiness(&curve)))
    };
    let mut scored: Vec<(String, f64)> = if parallel {
        candidates.par_iter().map(score).collect::<Result<_>>()?
    } else {
        candidates.iter().map(score).collect::<Result<_>>()?
    };

    // Stable sort keeps the count-descending order of `term_counts` on ties.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(depth);
    Ok(scored)
}

/// Pick the terms to index for one run.
///
/// `densities` must have been built with `config.density_params()`; a cache
/// built for other parameters is refused rather than silently reused.
pub fn select_terms(
    index: &TermIndex,
    densities: &DensityCache,
    config: &AnalysisConfig,
) -> Result<BTreeSet<String>> {
    densities.ensure_params(&config.density_params())?;

    let selected: BTreeSet<String> = match config.selection {
        TermSelection::Frequent => index.most_frequent_terms(config.term_depth),
        TermSelection::Clumpy => {
            clumpiest_terms(index, densities, config.term_depth, config.parallel)?
                .into_iter()
                .map(|(term, _)| term)
                .collect()
        }
    };

    info!(
        selection = %config.selection,
        requested = config.term_depth,
        selected = selected.len(),
        "Selected terms"
    );
    Ok(selected)
}
