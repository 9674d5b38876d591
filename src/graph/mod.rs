// Term graph — the labelled graph, its builders and GML export.

pub mod gml;
pub mod model;
pub mod skimmer;
pub mod texture;
pub mod traits;

pub use model::{Edge, Graph};
pub use skimmer::Skimmer;
pub use texture::Texture;
pub use traits::{BuildState, GraphBuilder};
