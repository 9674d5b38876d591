// Kernel shapes for one-dimensional density estimation.
//
// Each profile integrates to 1 over the real line when evaluated on
// u = (x - sample) / bandwidth and divided by the bandwidth.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kernel {
    #[default]
    Gaussian,
    Epanechnikov,
    Tophat,
    Exponential,
    Linear,
    Cosine,
}

impl Kernel {
    pub const ALL: [Kernel; 6] = [
        Kernel::Gaussian,
        Kernel::Epanechnikov,
        Kernel::Tophat,
        Kernel::Exponential,
        Kernel::Linear,
        Kernel::Cosine,
    ];

    /// Normalized kernel profile at `u`.
    pub fn profile(&self, u: f64) -> f64 {
        let a = u.abs();
        match self {
            Kernel::Gaussian => (-0.5 * a * a).exp() / (2.0 * PI).sqrt(),
            Kernel::Exponential => 0.5 * (-a).exp(),
            Kernel::Epanechnikov if a < 1.0 => 0.75 * (1.0 - a * a),
            Kernel::Tophat if a < 1.0 => 0.5,
            Kernel::Linear if a < 1.0 => 1.0 - a,
            Kernel::Cosine if a < 1.0 => PI / 4.0 * (PI * a / 2.0).cos(),
            _ => 0.0,
        }
    }

    /// Half-width of the support in units of the bandwidth, or `None` for
    /// kernels with unbounded support.
    pub fn support(&self) -> Option<f64> {
        match self {
            Kernel::Gaussian | Kernel::Exponential => None,
            _ => Some(1.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Kernel::Gaussian => "gaussian",
            Kernel::Epanechnikov => "epanechnikov",
            Kernel::Tophat => "tophat",
            Kernel::Exponential => "exponential",
            Kernel::Linear => "linear",
            Kernel::Cosine => "cosine",
        }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Kernel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kernel::ALL
            .into_iter()
            .find(|k| k.as_str() == s.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown kernel {s:?}"))
    }
}
