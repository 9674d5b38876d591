// Mental map pipeline — text in, term graph out.
//
// Steps:
// 1. Tokenize and index the text
// 2. Keep `term_depth` terms, by frequency (whole buckets) or clumpiness
// 3. Score every pair of kept terms into a TermMatrix
// 4. Skim the matrix into a graph of top-K neighbours

use std::collections::BTreeSet;

use rayon::prelude::*;

use crate::config::AnalysisConfig;
use crate::density::DensityCache;
use crate::error::Result;
use crate::graph::{Graph, GraphBuilder, Skimmer, Texture};
use crate::matrix::{MatrixSnapshot, TermMatrix};
use crate::scoring::{PairScorer, ScoringPolicy};
use crate::text::{OrStem, Stopwords, TermIndex, Tokenizer};

use super::selection::select_terms;

/// Everything one run produces, kept together so callers can inspect the
/// intermediate index and matrix as well as the graph.
#[derive(Debug)]
pub struct MentalMap {
    index: TermIndex,
    matrix: TermMatrix,
    graph: Graph,
}

impl MentalMap {
    pub fn build(text: &str, stopwords: &Stopwords, config: &AnalysisConfig) -> Result<Self> {
        Self::build_with_progress(text, stopwords, config, false)
    }

    /// Same as `build`, optionally drawing progress bars for the pair
    /// scoring and skimming stages.
    pub fn build_with_progress(
        text: &str,
        stopwords: &Stopwords,
        config: &AnalysisConfig,
        shows_progress: bool,
    ) -> Result<Self> {
        config.validate()?;

        let tokenizer = Tokenizer::new(stopwords.clone());
        let index = TermIndex::from_text(text, &tokenizer)?;

        let densities = DensityCache::new(config.density_params())?;
        let selected: Vec<String> = select_terms(&index, &densities, config)?
            .into_iter()
            .collect();

        let mut matrix = TermMatrix::new()
            .parallel(config.parallel)
            .shows_progress(shows_progress);
        matrix.index(&index, Some(selected.as_slice()), &densities, config.scoring)?;

        let mut skimmer = Skimmer::new(config.skim_depth)?
            .distance_weights(config.distance_weights)
            .shows_progress(shows_progress);
        skimmer.build(&matrix, &index)?;

        Ok(Self {
            index,
            matrix,
            graph: skimmer.into_graph(),
        })
    }

    pub fn index(&self) -> &TermIndex {
        &self.index
    }

    pub fn matrix(&self) -> &TermMatrix {
        &self.matrix
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Snapshot of the matrix with display labels for its terms.
    pub fn snapshot(&self) -> Result<MatrixSnapshot> {
        let labels = self.index.labels(self.matrix.keys())?;
        Ok(self.matrix.snapshot(labels))
    }
}

/// Rebuild a graph from a saved matrix, using the labels stored with it.
/// Terms without a stored label are named by their stem.
pub fn skim_snapshot(
    snapshot: &MatrixSnapshot,
    skim_depth: usize,
    distance_weights: bool,
) -> Result<Graph> {
    let matrix = TermMatrix::from_snapshot(snapshot)?;
    let mut skimmer = Skimmer::new(skim_depth)?.distance_weights(distance_weights);
    skimmer.build(&matrix, &OrStem(&snapshot.labels))?;
    Ok(skimmer.into_graph())
}

/// Co-occurrence graph of a text, without density scoring. Nodes are
/// labelled with each term's most frequent surface form.
pub fn texture_map(text: &str, stopwords: &Stopwords) -> Result<Graph> {
    let tokenizer = Tokenizer::new(stopwords.clone());
    let tokens = tokenizer.tokenize(text);
    let index = TermIndex::from_tokens(&tokens)?;

    let mut texture = Texture::new();
    texture.build(&tokens, &index)?;
    Ok(texture.into_graph())
}

/// Score one anchor term against each candidate, highest first, without
/// building the full matrix. Ties keep lexicographic order; the anchor itself
/// is skipped.
pub fn rank_neighbors(
    index: &TermIndex,
    densities: &DensityCache,
    policy: ScoringPolicy,
    anchor: &str,
    candidates: &BTreeSet<String>,
) -> Result<Vec<(String, f64)>> {
    let scorer = PairScorer::new(index, densities, policy);
    let mut ranked = candidates
        .par_iter()
        .filter(|term| term.as_str() != anchor)
        .map(|term| scorer.score(anchor, term).map(|s| (term.clone(), s)))
        .collect::<Result<Vec<_>>>()?;
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::Kernel;
    use crate::error::TermscapeError;
    use crate::pipeline::TermSelection;

    const TEXT: &str = "The whale swam in the sea. Whales swim deep in the sea. \
                        The ship sailed far away. Ships sail on the harbor. \
                        A whale surfaced near the sea while ships sailed.";

    fn config() -> AnalysisConfig {
        AnalysisConfig {
            term_depth: 20,
            skim_depth: 2,
            bandwidth: 3.0,
            samples: 100,
            kernel: Kernel::Gaussian,
            ..AnalysisConfig::default()
        }
    }

    fn stopwords() -> Stopwords {
        Stopwords::from_words(["the", "in", "a", "on", "far", "away", "while", "near"])
    }

    #[test]
    fn test_build_produces_labelled_graph() {
        let map = MentalMap::build(TEXT, &stopwords(), &config()).unwrap();
        assert!(map.matrix().len() > 0);
        assert!(map.graph().edge_count() > 0);
        assert!(map.graph().contains_node("whale"));

        // Nodes are the most frequent surface forms of the matrix terms.
        let labels: BTreeSet<String> = map
            .matrix()
            .keys()
            .iter()
            .map(|t| map.index().unstem(t).unwrap().to_string())
            .collect();
        assert!(map.graph().nodes().iter().all(|n| labels.contains(n)));
        assert!(map.graph().contains_node("sail") || map.graph().contains_node("sailed"));
        assert!(map.graph().edge_count() <= map.matrix().keys().len() * config().skim_depth);
    }

    #[test]
    fn test_empty_text_is_empty_corpus() {
        let err = MentalMap::build("the a in", &stopwords(), &config()).unwrap_err();
        assert!(matches!(err, TermscapeError::EmptyCorpus));
    }

    #[test]
    fn test_invalid_config_rejected_before_work() {
        let bad = AnalysisConfig {
            skim_depth: 0,
            ..config()
        };
        let err = MentalMap::build(TEXT, &stopwords(), &bad).unwrap_err();
        assert!(matches!(err, TermscapeError::InvalidParameter { .. }));
    }

    #[test]
    fn test_skim_snapshot_matches_direct_build() {
        let map = MentalMap::build(TEXT, &stopwords(), &config()).unwrap();
        let snapshot = map.snapshot().unwrap();
        let rebuilt = skim_snapshot(&snapshot, 2, false).unwrap();

        assert_eq!(rebuilt.nodes(), map.graph().nodes());
        assert_eq!(rebuilt.edges(), map.graph().edges());
    }

    #[test]
    fn test_skim_snapshot_without_labels_uses_stems() {
        let snapshot: MatrixSnapshot =
            serde_json::from_str(r#"{"terms":["a","b"],"pairs":{"a_b":0.25}}"#).unwrap();
        assert!(snapshot.labels.is_empty());

        let graph = skim_snapshot(&snapshot, 1, false).unwrap();
        assert_eq!(graph.nodes(), ["a", "b"]);
        assert_eq!(graph.edge_weight("a", "b"), Some(0.25));
    }

    #[test]
    fn test_skim_snapshot_mixes_stored_and_stem_labels() {
        let snapshot: MatrixSnapshot = serde_json::from_str(
            r#"{"terms":["sail","whale"],"pairs":{"sail_whale":0.5},"labels":{"whale":"whales"}}"#,
        )
        .unwrap();
        let graph = skim_snapshot(&snapshot, 1, true).unwrap();
        assert!(graph.contains_node("sail"));
        assert!(graph.contains_node("whales"));
        assert_eq!(graph.edge_weight("sail", "whales"), Some(0.5));
    }

    #[test]
    fn test_clumpy_selection_builds_graph() {
        let clumpy = AnalysisConfig {
            selection: TermSelection::Clumpy,
            term_depth: 3,
            ..config()
        };
        let map = MentalMap::build(TEXT, &stopwords(), &clumpy).unwrap();
        assert_eq!(map.matrix().keys().len(), 3);
        // Clumpy selection skips terms that occur once.
        for term in map.matrix().keys() {
            assert!(map.index().occurrence_count(term).unwrap() >= 2, "{term}");
        }
        assert!(map.graph().edge_count() > 0);
    }

    #[test]
    fn test_texture_map_links_adjacent_words() {
        let graph = texture_map("whale sea whale ship", &Stopwords::none()).unwrap();
        // 2-word: whale-sea twice, whale-ship
        assert_eq!(graph.edge_weight("whale", "sea"), Some(2.0));
        assert_eq!(graph.edge_weight("whale", "ship"), Some(1.0));
        assert_eq!(graph.edge_count(), 2);

        let err = texture_map("the a", &stopwords()).unwrap_err();
        assert!(matches!(err, TermscapeError::EmptyCorpus));
    }

    #[test]
    fn test_rank_neighbors_matches_matrix() {
        let map = MentalMap::build(TEXT, &stopwords(), &config()).unwrap();
        let densities = DensityCache::new(config().density_params()).unwrap();
        let candidates = map.matrix().keys().clone();
        let ranked = rank_neighbors(
            map.index(),
            &densities,
            ScoringPolicy::BrayCurtis,
            "whale",
            &candidates,
        )
        .unwrap();
        assert_eq!(ranked, map.matrix().anchored_pairs("whale"));
    }

    #[test]
    fn test_rank_neighbors_unknown_anchor() {
        let map = MentalMap::build(TEXT, &stopwords(), &config()).unwrap();
        let densities = DensityCache::new(config().density_params()).unwrap();
        let candidates = map.matrix().keys().clone();
        let err = rank_neighbors(
            map.index(),
            &densities,
            ScoringPolicy::BrayCurtis,
            "kraken",
            &candidates,
        )
        .unwrap_err();
        assert!(matches!(err, TermscapeError::UnknownTerm { .. }));
    }
}
