// Texture — co-occurrence graph straight from the token stream.
//
// No density scoring involved. Every window of `size` consecutive tokens
// links its first and last token, and each repeat of a pair adds 1 to the
// edge weight. The default passes are 2-word (adjacent words) and 5-word
// windows.

use std::collections::HashMap;

use tracing::info;

use crate::error::{Result, TermscapeError};
use crate::text::{Token, Unstem};

use super::model::Graph;
use super::traits::{BuildState, GraphBuilder};

pub const DEFAULT_WINDOWS: [usize; 2] = [2, 5];

#[derive(Debug)]
pub struct Texture {
    windows: Vec<usize>,
    state: BuildState,
    graph: Graph,
}

impl Default for Texture {
    fn default() -> Self {
        Self {
            windows: DEFAULT_WINDOWS.to_vec(),
            state: BuildState::Empty,
            graph: Graph::new(),
        }
    }
}

impl Texture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the window passes. Each size must be at least 2.
    pub fn windows(mut self, sizes: &[usize]) -> Result<Self> {
        if sizes.is_empty() {
            return Err(TermscapeError::invalid("windows", "at least one window size is required"));
        }
        if let Some(bad) = sizes.iter().find(|&&s| s < 2) {
            return Err(TermscapeError::invalid(
                "windows",
                format!("window size must be at least 2, got {bad}"),
            ));
        }
        self.windows = sizes.to_vec();
        Ok(self)
    }

    pub fn window_sizes(&self) -> &[usize] {
        &self.windows
    }

    /// Hand over the built graph, leaving the builder empty.
    pub fn into_graph(self) -> Graph {
        self.graph
    }

    fn link(&self, tokens: &[Token], labels: &dyn Unstem) -> Result<Graph> {
        let mut names: HashMap<&str, String> = HashMap::new();
        let mut graph = Graph::new();
        for &size in &self.windows {
            for window in tokens.windows(size) {
                let source = label_of(&mut names, labels, &window[0].stemmed)?;
                let target = label_of(&mut names, labels, &window[size - 1].stemmed)?;
                graph.accumulate_edge(&source, &target, 1.0);
            }
        }
        Ok(graph)
    }
}

fn label_of<'t>(
    names: &mut HashMap<&'t str, String>,
    labels: &dyn Unstem,
    term: &'t str,
) -> Result<String> {
    if let Some(name) = names.get(term) {
        return Ok(name.clone());
    }
    let name = labels.unstem_label(term)?;
    names.insert(term, name.clone());
    Ok(name)
}

impl GraphBuilder for Texture {
    type Source = [Token];

    fn build(&mut self, tokens: &[Token], labels: &dyn Unstem) -> Result<&Graph> {
        self.graph = Graph::new();
        self.state = BuildState::Building;

        let graph = match self.link(tokens, labels) {
            Ok(graph) => graph,
            Err(e) => {
                self.state = BuildState::Empty;
                return Err(e);
            }
        };

        info!(
            tokens = tokens.len(),
            windows = ?self.windows,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Built texture graph"
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
