// Kernel density estimate of where a term occurs along the text.
//
// Every occurrence offset is one sample point. The fitted density is read
// off at `samples` evenly spaced positions covering [0, token_count) and
// multiplied by the grid spacing, so each value is the probability mass of
// one grid cell and a unit-spacing trapezoid of the curve comes out near 1.

use serde::{Deserialize, Serialize};

use super::kernel::Kernel;
use crate::error::{Result, TermscapeError};

/// Estimation parameters. Fixed for the whole of one indexing pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityParams {
    pub kernel: Kernel,
    /// Kernel width, in token positions
    pub bandwidth: f64,
    /// Number of points on the sampling grid
    pub samples: usize,
}

impl Default for DensityParams {
    fn default() -> Self {
        Self {
            kernel: Kernel::Gaussian,
            bandwidth: 2000.0,
            samples: 1000,
        }
    }
}

impl DensityParams {
    pub fn validate(&self) -> Result<()> {
        if !self.bandwidth.is_finite() || self.bandwidth <= 0.0 {
            return Err(TermscapeError::invalid(
                "bandwidth",
                format!("must be a positive number, got {}", self.bandwidth),
            ));
        }
        if self.samples == 0 {
            return Err(TermscapeError::invalid("samples", "must be at least 1"));
        }
        Ok(())
    }
}

/// A density sampled on an even grid. Values are non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityCurve(Vec<f64>);

impl DensityCurve {
    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Trapezoidal integral with unit spacing between samples.
    pub fn trapezoid(&self) -> f64 {
        trapezoid(&self.0)
    }
}

impl From<Vec<f64>> for DensityCurve {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

pub(crate) fn trapezoid(values: &[f64]) -> f64 {
    match values {
        [] | [_] => 0.0,
        [first, .., last] => values.iter().sum::<f64>() - 0.5 * (first + last),
    }
}

/// Estimate the occurrence density for one term.
///
/// `offsets` must be ascending. `domain_len` is the total retained token
/// count. A term without offsets gets an all-zero curve.
pub fn estimate(offsets: &[usize], domain_len: usize, params: &DensityParams) -> Result<DensityCurve> {
    params.validate()?;
    if offsets.is_empty() {
        return Ok(DensityCurve::zeros(params.samples));
    }

    let n = offsets.len() as f64;
    let h = params.bandwidth;
    let step = domain_len as f64 / params.samples as f64;
    let norm = step / (n * h);

    let points: Vec<f64> = offsets.iter().map(|&o| o as f64).collect();

    let values = (0..params.samples)
        .map(|i| {
            let x = i as f64 * step;
            let window = match params.kernel.support() {
                // Only offsets inside the kernel's support contribute.
                Some(width) => {
                    let lo = points.partition_point(|&p| p < x - width * h);
                    let hi = points.partition_point(|&p| p <= x + width * h);
                    &points[lo..hi]
                }
                None => &points[..],
            };
            let sum: f64 = window
                .iter()
                .map(|&p| params.kernel.profile((x - p) / h))
                .sum();
            sum * norm
        })
        .collect();

    Ok(DensityCurve(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(kernel: Kernel, bandwidth: f64, samples: usize) -> DensityParams {
        DensityParams {
            kernel,
            bandwidth,
            samples,
        }
    }

    #[test]
    fn test_curve_length_matches_samples() {
        let curve = estimate(&[1, 5, 9], 10, &params(Kernel::Gaussian, 2.0, 37)).unwrap();
        assert_eq!(curve.len(), 37);
    }

    #[test]
    fn test_empty_offsets_give_zero_curve() {
        let curve = estimate(&[], 100, &DensityParams::default()).unwrap();
        assert_eq!(curve.len(), 1000);
        assert!(curve.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_integrates_to_about_one() {
        // Occurrences spread through the middle of a long text, so little
        // mass leaks past either end of the grid.
        let offsets: Vec<usize> = (2000..8000).step_by(250).collect();
        for kernel in Kernel::ALL {
            let curve = estimate(&offsets, 10_000, &params(kernel, 300.0, 1000)).unwrap();
            let area = curve.trapezoid();
            assert!(
                (area - 1.0).abs() < 0.03,
                "{kernel}: area {area}, expected ~1.0"
            );
        }
    }

    #[test]
    fn test_values_non_negative() {
        let curve = estimate(&[0, 3, 99], 100, &params(Kernel::Epanechnikov, 5.0, 200)).unwrap();
        assert!(curve.values().iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_peak_near_occurrences() {
        let curve = estimate(&[750, 760, 770], 1000, &params(Kernel::Gaussian, 20.0, 100)).unwrap();
        let (peak, _) = curve
            .values()
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best });
        assert_eq!(peak, 76);
    }

    #[test]
    fn test_deterministic() {
        let p = params(Kernel::Gaussian, 50.0, 500);
        let a = estimate(&[10, 200, 340], 1000, &p).unwrap();
        let b = estimate(&[10, 200, 340], 1000, &p).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_params() {
        assert!(estimate(&[1], 10, &params(Kernel::Gaussian, 0.0, 10)).is_err());
        assert!(estimate(&[1], 10, &params(Kernel::Gaussian, f64::NAN, 10)).is_err());
        assert!(estimate(&[1], 10, &params(Kernel::Gaussian, 1.0, 0)).is_err());
    }

    #[test]
    fn test_trapezoid() {
        assert_eq!(trapezoid(&[]), 0.0);
        assert_eq!(trapezoid(&[3.0]), 0.0);
        assert_eq!(trapezoid(&[1.0, 1.0, 1.0]), 2.0);
        assert_eq!(trapezoid(&[0.0, 2.0, 0.0]), 2.0);
    }
}
