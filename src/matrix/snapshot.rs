// Matrix snapshots — JSON persistence for an indexed TermMatrix.
//
// A snapshot carries the scored pairs plus the display labels of their
// terms, so a graph can be skimmed later without re-reading the text.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, TermscapeError};
use crate::text::TermLabels;

use super::term_matrix::{pair_key, TermMatrix, KEY_SEPARATOR};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixSnapshot {
    pub terms: Vec<String>,
    pub pairs: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "TermLabels::is_empty")]
    pub labels: TermLabels,
}

impl MatrixSnapshot {
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        info!(path = %path.display(), pairs = self.pairs.len(), "Saved matrix snapshot");
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let snapshot: Self = serde_json::from_reader(reader)?;
        info!(path = %path.display(), pairs = snapshot.pairs.len(), "Loaded matrix snapshot");
        Ok(snapshot)
    }
}

impl TermMatrix {
    pub fn snapshot(&self, labels: TermLabels) -> MatrixSnapshot {
        MatrixSnapshot {
            terms: self.keys().iter().cloned().collect(),
            pairs: self
                .iter_pairs()
                .map(|(key, value)| (key.clone(), *value))
                .collect(),
            labels,
        }
    }

    /// Rebuild a matrix from a snapshot. Every pair key must name two
    /// listed terms joined by the key separator.
    pub fn from_snapshot(snapshot: &MatrixSnapshot) -> Result<TermMatrix> {
        let listed: BTreeSet<&str> = snapshot.terms.iter().map(String::as_str).collect();
        let mut matrix = TermMatrix::new();
        for (key, &value) in &snapshot.pairs {
            let (a, b) = key
                .split_once(KEY_SEPARATOR)
                .filter(|(a, b)| !a.is_empty() && !b.is_empty() && !b.contains(KEY_SEPARATOR))
                .ok_or_else(|| TermscapeError::invalid("pairs", format!("malformed key {key:?}")))?;
            if !listed.contains(a) || !listed.contains(b) {
                return Err(TermscapeError::invalid(
                    "pairs",
                    format!("key {key:?} names a term missing from the term list"),
                ));
            }
            if pair_key(a, b) != *key {
                return Err(TermscapeError::invalid(
                    "pairs",
                    format!("key {key:?} is not in canonical order"),
                ));
            }
            matrix.set_pair(a, b, value);
        }
        Ok(matrix)
    }
}
