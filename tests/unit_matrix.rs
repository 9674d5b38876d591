// Unit tests for pair scoring and the term matrix.
//
// Tests symmetry and self-maximum for every policy, anchored-pair ordering,
// determinism of indexing, and snapshot round-trips.

use termscape::density::{DensityCache, DensityParams, Kernel};
use termscape::matrix::{pair_key, MatrixSnapshot, TermMatrix};
use termscape::scoring::{PairScorer, ScoringPolicy};
use termscape::text::{Stopwords, TermIndex, TermLabels, Tokenizer};
use termscape::TermscapeError;

const PASSAGE: &str = "whale sea ship whale harpoon sea whale ship captain deck \
                       captain ship deck sail wind sail captain whale sea harpoon \
                       wind sail deck ship whale sea sea harpoon captain wind";

fn fixture() -> (TermIndex, DensityCache) {
    let index = TermIndex::from_text(PASSAGE, &Tokenizer::new(Stopwords::none())).unwrap();
    let cache = DensityCache::new(DensityParams {
        kernel: Kernel::Gaussian,
        bandwidth: 2.5,
        samples: 150,
    })
    .unwrap();
    (index, cache)
}

fn indexed(policy: ScoringPolicy) -> (TermIndex, TermMatrix) {
    let (index, cache) = fixture();
    let mut matrix = TermMatrix::new();
    matrix.index(&index, None, &cache, policy).unwrap();
    (index, matrix)
}

// ============================================================
// PairScorer — symmetry and maximum
// ============================================================

#[test]
fn every_policy_is_symmetric() {
    let (index, cache) = fixture();
    for policy in ScoringPolicy::ALL {
        let scorer = PairScorer::new(&index, &cache, policy);
        for a in index.terms() {
            for b in index.terms() {
                assert_eq!(scorer.score(a, b).unwrap(), scorer.score(b, a).unwrap());
            }
        }
    }
}

#[test]
fn self_score_is_policy_maximum() {
    let (index, cache) = fixture();
    for policy in ScoringPolicy::ALL {
        let scorer = PairScorer::new(&index, &cache, policy);
        for a in index.terms() {
            let own = scorer.score(a, a).unwrap();
            for b in index.terms() {
                assert!(own >= scorer.score(a, b).unwrap() - 1e-12, "{policy} {a} {b}");
            }
        }
    }
}

#[test]
fn complement_policies_max_at_one() {
    let (index, cache) = fixture();
    let bc = PairScorer::new(&index, &cache, ScoringPolicy::BrayCurtis);
    let cos = PairScorer::new(&index, &cache, ScoringPolicy::Cosine);
    assert_eq!(bc.score("whale", "whale").unwrap(), 1.0);
    assert!((cos.score("whale", "whale").unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn scoring_unknown_term_is_error() {
    let (index, cache) = fixture();
    let scorer = PairScorer::new(&index, &cache, ScoringPolicy::Overlap);
    let err = scorer.score("kraken", "whale").unwrap_err();
    assert!(matches!(err, TermscapeError::UnknownTerm { ref term } if term == "kraken"));
}

// ============================================================
// TermMatrix — pairs and anchored ordering
// ============================================================

#[test]
fn pair_keys_are_canonical() {
    assert_eq!(pair_key("whale", "sea"), "sea_whale");
    assert_eq!(pair_key("sea", "whale"), pair_key("whale", "sea"));
}

#[test]
fn index_covers_every_unordered_pair() {
    let (index, matrix) = indexed(ScoringPolicy::BrayCurtis);
    let n = index.len();
    assert_eq!(matrix.len(), n * (n - 1) / 2);
    assert_eq!(matrix.pairs_completed(), matrix.len());
    for a in index.terms() {
        for b in index.terms() {
            if a != b {
                assert_eq!(matrix.get_pair(a, b), matrix.get_pair(b, a));
                assert!(matrix.get_pair(a, b).is_some());
            }
        }
    }
}

#[test]
fn anchored_pairs_non_increasing() {
    let (index, matrix) = indexed(ScoringPolicy::Overlap);
    for anchor in index.terms() {
        let pairs = matrix.anchored_pairs(anchor);
        assert_eq!(pairs.len(), index.len() - 1);
        assert!(pairs.windows(2).all(|w| w[0].1 >= w[1].1), "{anchor}");
        assert!(pairs.iter().all(|(t, _)| t != anchor));
    }
}

#[test]
fn anchored_pairs_only_indexed_terms() {
    let (index, cache) = fixture();
    let subset: Vec<String> = ["whale", "sea", "ship"].iter().map(|s| s.to_string()).collect();
    let mut matrix = TermMatrix::new();
    matrix
        .index(&index, Some(subset.as_slice()), &cache, ScoringPolicy::BrayCurtis)
        .unwrap();

    let pairs = matrix.anchored_pairs("whale");
    let terms: Vec<&str> = pairs.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(terms.len(), 2);
    assert!(terms.contains(&"sea") && terms.contains(&"ship"));
    assert!(matrix.anchored_pairs("captain").is_empty());
}

#[test]
fn zero_score_is_not_missing() {
    let mut matrix = TermMatrix::new();
    matrix.set_pair("whale", "sea", 0.0);
    assert_eq!(matrix.anchored_pairs("whale"), vec![("sea".to_string(), 0.0)]);
}

#[test]
fn indexing_is_deterministic() {
    let (_, first) = indexed(ScoringPolicy::Cosine);
    let (_, second) = indexed(ScoringPolicy::Cosine);
    let a = first.snapshot(TermLabels::default());
    let b = second.snapshot(TermLabels::default());
    assert_eq!(a.pairs.len(), b.pairs.len());
    for (key, value) in &a.pairs {
        assert_eq!(value.to_bits(), b.pairs[key].to_bits(), "{key}");
    }
}

#[test]
fn unknown_subset_term_leaves_matrix_cleared() {
    let (index, cache) = fixture();
    let mut matrix = TermMatrix::new();
    matrix.index(&index, None, &cache, ScoringPolicy::Overlap).unwrap();
    assert!(!matrix.is_empty());

    let subset = vec!["whale".to_string(), "kraken".to_string()];
    assert!(matrix
        .index(&index, Some(subset.as_slice()), &cache, ScoringPolicy::Overlap)
        .is_err());
    assert!(matrix.is_empty());
    assert!(matrix.keys().is_empty());
}

// ============================================================
// Snapshots
// ============================================================

#[test]
fn json_round_trip_reproduces_every_pair() {
    let (index, matrix) = indexed(ScoringPolicy::BrayCurtis);
    let labels = index.labels(matrix.keys()).unwrap();
    let snapshot = matrix.snapshot(labels);

    let json = serde_json::to_string(&snapshot).unwrap();
    let reloaded: MatrixSnapshot = serde_json::from_str(&json).unwrap();
    let restored = TermMatrix::from_snapshot(&reloaded).unwrap();

    for a in matrix.keys() {
        for b in matrix.keys() {
            assert_eq!(restored.get_pair(a, b), matrix.get_pair(a, b));
        }
    }
    assert_eq!(reloaded.labels, snapshot.labels);
}

#[test]
fn snapshot_json_shape() {
    let mut matrix = TermMatrix::new();
    matrix.set_pair("whale", "sea", 0.5);
    let value = serde_json::to_value(matrix.snapshot(TermLabels::default())).unwrap();
    assert_eq!(value["terms"], serde_json::json!(["sea", "whale"]));
    assert_eq!(value["pairs"]["sea_whale"], serde_json::json!(0.5));
    assert!(value.get("labels").is_none());
}

#[test]
fn snapshot_file_round_trip() {
    let (index, matrix) = indexed(ScoringPolicy::Overlap);
    let snapshot = matrix.snapshot(index.labels(matrix.keys()).unwrap());

    let path = std::env::temp_dir().join(format!("termscape-matrix-{}.json", std::process::id()));
    snapshot.save_json(&path).unwrap();
    let loaded = MatrixSnapshot::load_json(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, snapshot);
}
