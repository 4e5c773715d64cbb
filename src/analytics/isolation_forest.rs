//! Isolation Forest
//!
//! 乱数分割による教師なし外れ値検知。分離に要する分割数が少ない点ほど
//! 異常度が高い。シード固定で決定的に動作する。

use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use statrs::statistics::{Data, OrderStatistics};
use tracing::debug;

const EULER_MASCHERONI: f64 = 0.577_215_664_901_532_9;

enum Node {
    Internal {
        feature: usize,
        split: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        size: usize,
    },
}

struct Tree {
    root: Node,
}

/// Seeded Isolation Forest over dense feature rows.
pub struct IsolationForest {
    trees: Vec<Tree>,
    normalizer: f64,
}

impl IsolationForest {
    /// Subsample size per tree, as in the original algorithm.
    const MAX_SAMPLES: usize = 256;

    /// Fit `n_trees` isolation trees on `rows` (each row one feature vector).
    pub fn fit(rows: &[Vec<f64>], n_trees: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let sub = rows.len().min(Self::MAX_SAMPLES);
        let height_limit = (sub.max(2) as f64).log2().ceil() as usize;

        let trees = (0..n_trees)
            .map(|_| {
                let indices: Vec<usize> = if sub < rows.len() {
                    sample(&mut rng, rows.len(), sub).into_vec()
                } else {
                    (0..rows.len()).collect()
                };
                Tree {
                    root: build_node(rows, &indices, 0, height_limit, &mut rng),
                }
            })
            .collect();

        debug!(
            rows = rows.len(),
            trees = n_trees,
            subsample = sub,
            "isolation forest fitted"
        );

        Self {
            trees,
            // For fewer than two training rows c(n) is zero; clamp so score()
            // stays finite instead of dividing by zero.
            normalizer: average_path_length(sub).max(1.0),
        }
    }

    /// Anomaly score in (0, 1]; higher is more isolated.
    ///
    /// A forest fitted on fewer than two rows has no isolation structure and
    /// scores every point as maximally isolated.
    pub fn score(&self, row: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 1.0;
        }
        let total: f64 = self
            .trees
            .iter()
            .map(|t| path_length(&t.root, row, 0))
            .sum();
        let mean_path = total / self.trees.len() as f64;
        2f64.powf(-mean_path / self.normalizer)
    }

    /// Fit and flag the most isolated `contamination` fraction of rows.
    ///
    /// The decision threshold is the `1 - contamination` quantile of the
    /// scores; rows strictly above it are outliers.
    pub fn fit_predict(
        rows: &[Vec<f64>],
        n_trees: usize,
        contamination: f64,
        seed: u64,
    ) -> Vec<bool> {
        if rows.is_empty() {
            return Vec::new();
        }
        let forest = Self::fit(rows, n_trees, seed);
        let scores: Vec<f64> = rows.iter().map(|r| forest.score(r)).collect();
        let mut data = Data::new(scores.clone());
        let threshold = data.quantile(1.0 - contamination);
        scores.iter().map(|&s| s > threshold).collect()
    }
}

fn build_node(
    rows: &[Vec<f64>],
    indices: &[usize],
    depth: usize,
    height_limit: usize,
    rng: &mut StdRng,
) -> Node {
    if indices.len() <= 1 || depth >= height_limit {
        return Node::Leaf {
            size: indices.len(),
        };
    }

    let n_features = rows[indices[0]].len();
    // Random feature order; skip features that are constant on this subset.
    let order = sample(rng, n_features, n_features).into_vec();
    for feature in order {
        let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
        for &i in indices {
            lo = lo.min(rows[i][feature]);
            hi = hi.max(rows[i][feature]);
        }
        if lo >= hi {
            continue;
        }
        let split = rng.gen_range(lo..hi);
        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| rows[i][feature] < split);
        if left.is_empty() || right.is_empty() {
            continue;
        }
        return Node::Internal {
            feature,
            split,
            left: Box::new(build_node(rows, &left, depth + 1, height_limit, rng)),
            right: Box::new(build_node(rows, &right, depth + 1, height_limit, rng)),
        };
    }

    // Every feature constant on this subset.
    Node::Leaf {
        size: indices.len(),
    }
}

fn path_length(node: &Node, row: &[f64], depth: usize) -> f64 {
    match node {
        Node::Leaf { size } => depth as f64 + average_path_length(*size),
        Node::Internal {
            feature,
            split,
            left,
            right,
        } => {
            if row[*feature] < *split {
                path_length(left, row, depth + 1)
            } else {
                path_length(right, row, depth + 1)
            }
        }
    }
}

/// Expected path length of an unsuccessful BST search over `n` points.
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_MASCHERONI) - 2.0 * (n - 1.0) / n
        }
    }
}
