// Skimmer — links every term to its `depth` most similar neighbours.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::error::{Result, TermscapeError};
use crate::matrix::TermMatrix;
use crate::text::Unstem;

use super::model::Graph;
use super::traits::{BuildState, GraphBuilder};

#[derive(Debug)]
pub struct Skimmer {
    depth: usize,
    distance_weights: bool,
    shows_progress: bool,
    state: BuildState,
    graph: Graph,
}

impl Skimmer {
    pub fn new(depth: usize) -> Result<Self> {
        if depth == 0 {
            return Err(TermscapeError::invalid("skim_depth", "must be at least 1"));
        }
        Ok(Self {
            depth,
            distance_weights: false,
            shows_progress: false,
            state: BuildState::Empty,
            graph: Graph::new(),
        })
    }

    /// Store `1 - score` as the edge weight, so heavier edges mean farther
    /// apart (what path-based layouts expect).
    pub fn distance_weights(mut self, yes: bool) -> Self {
        self.distance_weights = yes;
        self
    }

    pub fn shows_progress(mut self, yes: bool) -> Self {
        self.shows_progress = yes;
        self
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Hand over the built graph, leaving the skimmer empty.
    pub fn into_graph(self) -> Graph {
        self.graph
    }
}

impl GraphBuilder for Skimmer {
    type Source = TermMatrix;

    fn build(&mut self, matrix: &TermMatrix, labels: &dyn Unstem) -> Result<&Graph> {
        self.graph = Graph::new();
        self.state = BuildState::Building;

        let bar = if self.shows_progress {
            let pb = ProgressBar::new(matrix.keys().len() as u64);
            pb.set_style(
                ProgressStyle::with_template("  Skimming [{bar:30}] {pos}/{len} ({eta})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        let mut graph = Graph::new();
        for anchor in matrix.keys() {
            let source = match labels.unstem_label(anchor) {
                Ok(label) => label,
                Err(e) => {
                    bar.finish_and_clear();
                    self.state = BuildState::Empty;
                    return Err(e);
                }
            };
            for (term, score) in matrix.anchored_pairs(anchor).into_iter().take(self.depth) {
                let target = match labels.unstem_label(&term) {
                    Ok(label) => label,
                    Err(e) => {
                        bar.finish_and_clear();
                        self.state = BuildState::Empty;
                        return Err(e);
                    }
                };
                let weight = if self.distance_weights { 1.0 - score } else { score };
                graph.add_edge(&source, &target, weight);
            }
            bar.inc(1);
        }
        bar.finish_and_clear();

        info!(
            anchors = matrix.keys().len(),
            depth = self.depth,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            distance_weights = self.distance_weights,
            "Skimmed term graph"
        );

        self.graph = graph;
        self.state = BuildState::Built;
        Ok(&self.graph)
    }

    fn state(&self) -> BuildState {
        self.state
    }

    fn graph(&self) -> Option<&Graph> {
        (self.state == BuildState::Built).then_some(&self.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TermLabels;
    use std::collections::BTreeMap;

    fn labels(pairs: &[(&str, &str)]) -> TermLabels {
        TermLabels(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    fn matrix() -> TermMatrix {
        let mut m = TermMatrix::new();
        m.set_pair("a", "b", 0.9);
        m.set_pair("a", "c", 0.5);
        m.set_pair("a", "d", 0.1);
        m.set_pair("b", "c", 0.3);
        m.set_pair("b", "d", 0.2);
        m.set_pair("c", "d", 0.4);
        m
    }

    fn identity() -> TermLabels {
        labels(&[("a", "a"), ("b", "b"), ("c", "c"), ("d", "d")])
    }

    #[test]
    fn test_zero_depth_rejected() {
        let err = Skimmer::new(0).unwrap_err();
        assert!(matches!(err, TermscapeError::InvalidParameter { ref name, .. } if name == "skim_depth"));
    }

    #[test]
    fn test_depth_one_keeps_best_neighbour() {
        let mut skimmer = Skimmer::new(1).unwrap();
        let graph = skimmer.build(&matrix(), &identity()).unwrap();
        // a->b, b->a, c->a, d->c
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.edge_weight("a", "b"), Some(0.9));
        assert_eq!(graph.edge_weight("a", "c"), Some(0.5));
        assert_eq!(graph.edge_weight("c", "d"), Some(0.4));
        assert_eq!(graph.edge_weight("a", "d"), None);
    }

    #[test]
    fn test_distance_weights() {
        let mut skimmer = Skimmer::new(1).unwrap().distance_weights(true);
        let graph = skimmer.build(&matrix(), &identity()).unwrap();
        let w = graph.edge_weight("a", "b").unwrap();
        assert!((w - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_nodes_use_labels() {
        let names = labels(&[("a", "alpha"), ("b", "beta"), ("c", "gamma"), ("d", "delta")]);
        let mut skimmer = Skimmer::new(2).unwrap();
        let graph = skimmer.build(&matrix(), &names).unwrap();
        assert!(graph.contains_node("alpha"));
        assert!(!graph.contains_node("a"));
        assert_eq!(graph.edge_weight("alpha", "beta"), Some(0.9));
    }

    #[test]
    fn test_shared_label_makes_self_loop() {
        let names = labels(&[("a", "x"), ("b", "x"), ("c", "c"), ("d", "d")]);
        let mut skimmer = Skimmer::new(1).unwrap();
        let graph = skimmer.build(&matrix(), &names).unwrap();
        assert_eq!(graph.edge_weight("x", "x"), Some(0.9));
    }

    #[test]
    fn test_state_transitions() {
        let mut skimmer = Skimmer::new(2).unwrap();
        assert_eq!(skimmer.state(), BuildState::Empty);
        assert!(skimmer.graph().is_none());

        skimmer.build(&matrix(), &identity()).unwrap();
        assert_eq!(skimmer.state(), BuildState::Built);
        assert!(skimmer.graph().is_some());

        let err = skimmer.build(&matrix(), &labels(&[("a", "a")])).unwrap_err();
        assert!(matches!(err, TermscapeError::UnknownTerm { .. }));
        assert_eq!(skimmer.state(), BuildState::Empty);
        assert!(skimmer.graph().is_none());
    }

    #[test]
    fn test_empty_matrix_builds_empty_graph() {
        let mut skimmer = Skimmer::new(3).unwrap();
        let graph = skimmer.build(&TermMatrix::new(), &identity()).unwrap();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }
}
