// Term matrix — pairwise similarity scores and their JSON snapshots.

pub mod snapshot;
pub mod term_matrix;

pub use snapshot::MatrixSnapshot;
pub use term_matrix::{pair_key, TermMatrix};
