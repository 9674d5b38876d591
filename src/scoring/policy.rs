// Pair-scoring policies over two density curves.
//
// All policies report similarity: higher means the two terms cluster in the
// same parts of the text. One policy is chosen per run and applied to every
// pair.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::density::estimator::trapezoid;
use crate::density::DensityCurve;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringPolicy {
    /// Area under the pointwise minimum of the two curves
    Overlap,
    /// 1 - Bray-Curtis dissimilarity
    #[default]
    BrayCurtis,
    /// 1 - cosine distance
    Cosine,
}

impl ScoringPolicy {
    pub const ALL: [ScoringPolicy; 3] = [
        ScoringPolicy::Overlap,
        ScoringPolicy::BrayCurtis,
        ScoringPolicy::Cosine,
    ];

    /// Score two curves sampled on the same grid.
    ///
    /// Panics if the curves have different lengths. Curves from one run
    /// always share the grid.
    pub fn score(&self, a: &DensityCurve, b: &DensityCurve) -> f64 {
        assert_eq!(
            a.len(),
            b.len(),
            "density curves must share a sampling grid"
        );
        let (a, b) = (a.values(), b.values());
        match self {
            ScoringPolicy::Overlap => overlap(a, b),
            ScoringPolicy::BrayCurtis => bray_curtis_similarity(a, b),
            ScoringPolicy::Cosine => cosine_similarity(a, b),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringPolicy::Overlap => "overlap",
            ScoringPolicy::BrayCurtis => "braycurtis",
            ScoringPolicy::Cosine => "cosine",
        }
    }
}

impl fmt::Display for ScoringPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScoringPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "overlap" => Ok(Self::Overlap),
            "braycurtis" | "bray-curtis" | "distance-complement" => Ok(Self::BrayCurtis),
            "cosine" => Ok(Self::Cosine),
            _ => Err(format!("unknown scoring policy {s:?}")),
        }
    }
}

fn overlap(a: &[f64], b: &[f64]) -> f64 {
    let mins: Vec<f64> = a.iter().zip(b).map(|(x, y)| x.min(*y)).collect();
    trapezoid(&mins)
}

fn bray_curtis_similarity(a: &[f64], b: &[f64]) -> f64 {
    let (diff, total) = a
        .iter()
        .zip(b)
        .fold((0.0, 0.0), |(d, t), (x, y)| (d + (x - y).abs(), t + (x + y).abs()));
    if total == 0.0 {
        // Both curves are all-zero, hence identical.
        return 1.0;
    }
    1.0 - diff / total
}

fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    match (norm_a == 0.0, norm_b == 0.0) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        _ => dot / (norm_a * norm_b),
    }
}
