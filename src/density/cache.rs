// Run-scoped memo of density curves.
//
// Curves are pure functions of (term, params), and the kernel fit is the
// expensive part of scoring a pair, so each curve is computed once per run.
// The cache holds a single parameter set for its whole lifetime; a matrix
// indexed through it can never mix bandwidths.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use super::estimator::{estimate, DensityCurve, DensityParams};
use crate::error::{Result, TermscapeError};
use crate::text::TermIndex;

#[derive(Debug)]
pub struct DensityCache {
    params: DensityParams,
    curves: RwLock<HashMap<String, Arc<DensityCurve>>>,
}

impl DensityCache {
    pub fn new(params: DensityParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            curves: RwLock::new(HashMap::new()),
        })
    }

    pub fn params(&self) -> &DensityParams {
        &self.params
    }

    /// Refuse a parameter set other than the one this cache was built with.
    pub fn ensure_params(&self, params: &DensityParams) -> Result<()> {
        if *params != self.params {
            return Err(TermscapeError::invalid(
                "density_params",
                format!(
                    "cache was built with {:?}, refusing to mix in {:?}",
                    self.params, params
                ),
            ));
        }
        Ok(())
    }

    /// The curve for `term`, computing and storing it on first use.
    ///
    /// Safe to call from several threads. Two threads racing on the same
    /// term may both compute it; the first insert wins and both get the
    /// same values.
    pub fn curve(&self, index: &TermIndex, term: &str) -> Result<Arc<DensityCurve>> {
        if let Some(curve) = self.read().get(term) {
            return Ok(Arc::clone(curve));
        }

        let offsets = index.offsets(term)?;
        let curve = Arc::new(estimate(offsets, index.token_count(), &self.params)?);
        debug!(term, occurrences = offsets.len(), "Estimated density curve");

        let mut curves = self.curves.write().unwrap_or_else(|e| e.into_inner());
        let stored = curves.entry(term.to_string()).or_insert(curve);
        Ok(Arc::clone(stored))
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.curves
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<DensityCurve>>> {
        // A poisoned lock only means another worker panicked mid-insert;
        // every stored curve is still complete.
        self.curves.read().unwrap_or_else(|e| e.into_inner())
    }
}
