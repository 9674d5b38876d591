// Occurrence-density estimation — kernels, the estimator and its run cache.

pub mod cache;
pub mod estimator;
pub mod kernel;

pub use cache::DensityCache;
pub use estimator::{estimate, DensityCurve, DensityParams};
pub use kernel::Kernel;
