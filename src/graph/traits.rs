// Graph builder trait — the swap point for edge-selection strategies.
//
// The Skimmer reads a scored TermMatrix (top-K neighbours per term); the
// Texture builder reads the token stream (co-occurrence windows). Both label
// nodes through the same Unstem source and fill the same Graph.

use crate::error::Result;
use crate::text::Unstem;

use super::model::Graph;

/// Where a builder is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildState {
    #[default]
    Empty,
    Building,
    Built,
}

pub trait GraphBuilder {
    /// What the builder reads edges from.
    type Source: ?Sized;

    /// Build a graph from `source`, labelling nodes through `labels`.
    /// Calling `build` again discards the previous graph.
    fn build(&mut self, source: &Self::Source, labels: &dyn Unstem) -> Result<&Graph>;

    fn state(&self) -> BuildState;

    /// The graph from the last completed build, if any.
    fn graph(&self) -> Option<&Graph>;
}
