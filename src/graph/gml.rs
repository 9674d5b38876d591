// GML export — the plain-text graph format Gephi and networkx read.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::info;

use super::model::Graph;
use crate::error::Result;

impl Graph {
    pub fn to_gml(&self) -> String {
        let mut out = String::from("graph [\n  directed 0\n");
        for (id, label) in self.nodes().iter().enumerate() {
            let _ = write!(
                out,
                "  node [\n    id {id}\n    label \"{}\"\n  ]\n",
                escape(label)
            );
        }
        for edge in self.edges() {
            // Both endpoints were inserted by add_edge.
            let (Some(source), Some(target)) =
                (self.node_index(&edge.source), self.node_index(&edge.target))
            else {
                continue;
            };
            let _ = write!(
                out,
                "  edge [\n    source {source}\n    target {target}\n    weight {:?}\n  ]\n",
                edge.weight
            );
        }
        out.push_str("]\n");
        out
    }

    pub fn write_gml(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_gml())?;
        info!(
            path = %path.display(),
            nodes = self.node_count(),
            edges = self.edge_count(),
            "Wrote GML graph"
        );
        Ok(())
    }
}

fn escape(label: &str) -> String {
    label.replace('&', "&amp;").replace('"', "&quot;")
}
