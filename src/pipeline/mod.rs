// Pipeline — end-to-end runs over a whole text.

pub mod mental_map;
pub mod selection;

pub use mental_map::{rank_neighbors, skim_snapshot, texture_map, MentalMap};
pub use selection::{clumpiest_terms, select_terms, TermSelection};
