// Graph — undirected, weighted, labelled by unstemmed term.
//
// Nodes keep insertion order. There is at most one edge per unordered node
// pair; `add_edge` overwrites an existing weight, `accumulate_edge` adds to it.

use std::collections::HashMap;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Graph {
    nodes: Vec<String>,
    edges: Vec<Edge>,
    #[serde(skip)]
    node_ids: HashMap<String, usize>,
    #[serde(skip)]
    edge_ids: HashMap<(usize, usize), usize>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_edge(&mut self, a: &str, b: &str, weight: f64) {
        let ia = self.node_id(a);
        let ib = self.node_id(b);
        let key = (ia.min(ib), ia.max(ib));
        match self.edge_ids.get(&key) {
            Some(&slot) => self.edges[slot].weight = weight,
            None => {
                self.edge_ids.insert(key, self.edges.len());
                self.edges.push(Edge {
                    source: a.to_string(),
                    target: b.to_string(),
                    weight,
                });
            }
        }
    }

    /// Add `delta` to the edge between `a` and `b`, creating it with weight
    /// `delta` if absent.
    pub fn accumulate_edge(&mut self, a: &str, b: &str, delta: f64) {
        let current = self.edge_weight(a, b).unwrap_or(0.0);
        self.add_edge(a, b, current + delta);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn contains_node(&self, label: &str) -> bool {
        self.node_ids.contains_key(label)
    }

    /// Weight of the edge between two labels, in either order.
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<f64> {
        let ia = *self.node_ids.get(a)?;
        let ib = *self.node_ids.get(b)?;
        let slot = self.edge_ids.get(&(ia.min(ib), ia.max(ib)))?;
        Some(self.edges[*slot].weight)
    }

    /// Labels adjacent to `label` with their edge weights, heaviest first.
    pub fn neighbors(&self, label: &str) -> Vec<(&str, f64)> {
        let mut out: Vec<(&str, f64)> = self
            .edges
            .iter()
            .filter_map(|e| {
                if e.source == label {
                    Some((e.target.as_str(), e.weight))
                } else if e.target == label {
                    Some((e.source.as_str(), e.weight))
                } else {
                    None
                }
            })
            .collect();
        out.sort_by(|a, b| b.1.total_cmp(&a.1));
        out
    }

    pub(crate) fn node_index(&self, label: &str) -> Option<usize> {
        self.node_ids.get(label).copied()
    }

    fn node_id(&mut self, label: &str) -> usize {
        if let Some(&id) = self.node_ids.get(label) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(label.to_string());
        self.node_ids.insert(label.to_string(), id);
        id
    }
}
