use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::density::{DensityParams, Kernel};
use crate::error::{Result, TermscapeError};
use crate::pipeline::TermSelection;
use crate::scoring::ScoringPolicy;

/// Analysis settings for one run.
///
/// Loaded from `TERMSCAPE_*` environment variables (the binary reads `.env`
/// first via dotenvy); CLI flags then override individual fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// How many terms enter the matrix
    pub term_depth: usize,
    /// How those terms are picked
    pub selection: TermSelection,
    /// Neighbours linked per term in the graph
    pub skim_depth: usize,
    pub bandwidth: f64,
    /// Points on the density sampling grid
    pub samples: usize,
    pub kernel: Kernel,
    pub scoring: ScoringPolicy,
    /// Store `1 - score` as edge weight
    pub distance_weights: bool,
    /// Replace the built-in English stopword list with this file
    pub stopwords_path: Option<PathBuf>,
    /// Score pairs on the rayon pool
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let density = DensityParams::default();
        Self {
            term_depth: 500,
            selection: TermSelection::default(),
            skim_depth: 10,
            bandwidth: density.bandwidth,
            samples: density.samples,
            kernel: density.kernel,
            scoring: ScoringPolicy::default(),
            distance_weights: false,
            stopwords_path: None,
            parallel: true,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional; unset ones take the defaults above.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (the environment in `load`).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            term_depth: parse_var(&lookup, "TERMSCAPE_TERM_DEPTH")?.unwrap_or(defaults.term_depth),
            selection: parse_var(&lookup, "TERMSCAPE_SELECTION")?.unwrap_or(defaults.selection),
            skim_depth: parse_var(&lookup, "TERMSCAPE_SKIM_DEPTH")?.unwrap_or(defaults.skim_depth),
            bandwidth: parse_var(&lookup, "TERMSCAPE_BANDWIDTH")?.unwrap_or(defaults.bandwidth),
            samples: parse_var(&lookup, "TERMSCAPE_SAMPLES")?.unwrap_or(defaults.samples),
            kernel: parse_var(&lookup, "TERMSCAPE_KERNEL")?.unwrap_or(defaults.kernel),
            scoring: parse_var(&lookup, "TERMSCAPE_SCORING")?.unwrap_or(defaults.scoring),
            distance_weights: parse_flag(&lookup, "TERMSCAPE_DISTANCE_WEIGHTS")?
                .unwrap_or(defaults.distance_weights),
            stopwords_path: lookup("TERMSCAPE_STOPWORDS")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            parallel: parse_flag(&lookup, "TERMSCAPE_PARALLEL")?.unwrap_or(defaults.parallel),
        })
    }

    pub fn density_params(&self) -> DensityParams {
        DensityParams {
            kernel: self.kernel,
            bandwidth: self.bandwidth,
            samples: self.samples,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.term_depth == 0 {
            return Err(TermscapeError::invalid("term_depth", "must be at least 1"));
        }
        if self.skim_depth == 0 {
            return Err(TermscapeError::invalid("skim_depth", "must be at least 1"));
        }
        self.density_params().validate()
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| TermscapeError::invalid(key, format!("{raw:?}: {e}"))),
    }
}

fn parse_flag<F>(lookup: &F, key: &str) -> Result<Option<bool>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(TermscapeError::invalid(key, format!("{raw:?} is not a boolean"))),
    }
}
