// Pair scoring — similarity between two terms' density curves.

pub mod policy;
pub mod scorer;

pub use policy::ScoringPolicy;
pub use scorer::PairScorer;
