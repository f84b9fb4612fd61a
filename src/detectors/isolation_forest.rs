//! Isolation forest density-based outlier detection
//!
//! Retrained from scratch on every batch: the detector is a pure function
//! of the batch plus its seed, with no cross-call state.

use crate::error::{CarbonError, Result};
use ndarray::Array2;
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

const EULER_MASCHERONI: f64 = 0.577_215_664_901_532_9;

/// One tree of the forest
#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        value: f64,
        below: Box<Node>,
        above: Box<Node>,
    },
    Leaf {
        size: usize,
    },
}

impl Node {
    fn grow(
        x: &Array2<f64>,
        rows: &[usize],
        depth: usize,
        depth_limit: usize,
        rng: &mut Xoshiro256PlusPlus,
    ) -> Self {
        if depth >= depth_limit || rows.len() <= 1 {
            return Node::Leaf { size: rows.len() };
        }

        let feature = rng.gen_range(0..x.ncols());
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &r in rows {
            let v = x[[r, feature]];
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if hi - lo < 1e-12 {
            return Node::Leaf { size: rows.len() };
        }

        let value = rng.gen_range(lo..hi);
        let (below_rows, above_rows): (Vec<usize>, Vec<usize>) =
            rows.iter().partition(|&&r| x[[r, feature]] < value);
        if below_rows.is_empty() || above_rows.is_empty() {
            return Node::Leaf { size: rows.len() };
        }

        Node::Split {
            feature,
            value,
            below: Box::new(Self::grow(x, &below_rows, depth + 1, depth_limit, rng)),
            above: Box::new(Self::grow(x, &above_rows, depth + 1, depth_limit, rng)),
        }
    }

    fn path_length(&self, sample: &[f64], depth: usize) -> f64 {
        match self {
            Node::Leaf { size } => depth as f64 + average_path_length(*size),
            Node::Split {
                feature,
                value,
                below,
                above,
            } => {
                if sample[*feature] < *value {
                    below.path_length(sample, depth + 1)
                } else {
                    above.path_length(sample, depth + 1)
                }
            }
        }
    }
}

/// Expected path length of an unsuccessful BST search over `n` points
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

/// Isolation forest configured for stateless batch scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationForest {
    n_trees: usize,
    max_samples: usize,
    contamination: f64,
    seed: Option<u64>,
}

impl IsolationForest {
    pub fn new() -> Self {
        Self {
            n_trees: 100,
            max_samples: 256,
            contamination: 0.1,
            seed: None,
        }
    }

    /// Set the number of trees
    pub fn with_n_trees(mut self, n: usize) -> Self {
        self.n_trees = n.max(1);
        self
    }

    /// Set the subsample size per tree
    pub fn with_max_samples(mut self, n: usize) -> Self {
        self.max_samples = n.max(2);
        self
    }

    /// Set the expected outlier fraction
    pub fn with_contamination(mut self, c: f64) -> Self {
        self.contamination = c.clamp(0.0, 0.5);
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Train on the batch and flag approximately `contamination * N` rows
    /// as outliers. Returns one flag per row.
    pub fn fit_predict(&self, x: &Array2<f64>) -> Result<Vec<bool>> {
        let n = x.nrows();
        if n == 0 {
            return Err(CarbonError::ValidationError(
                "isolation forest requires a non-empty batch".to_string(),
            ));
        }
        if n < 2 {
            // A single point cannot be isolated from anything
            return Ok(vec![false; n]);
        }

        let mut rng = match self.seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_entropy(),
        };

        let subsample = self.max_samples.min(n);
        let depth_limit = (subsample as f64).log2().ceil() as usize;

        let forest: Vec<Node> = (0..self.n_trees)
            .map(|_| {
                let rows = rand::seq::index::sample(&mut rng, n, subsample).into_vec();
                Node::grow(x, &rows, 0, depth_limit, &mut rng)
            })
            .collect();

        let normalizer = average_path_length(subsample);
        let scores: Vec<f64> = (0..n)
            .map(|i| {
                let sample: Vec<f64> = x.row(i).iter().copied().collect();
                let mean_path = forest
                    .iter()
                    .map(|tree| tree.path_length(&sample, 0))
                    .sum::<f64>()
                    / forest.len() as f64;
                2.0_f64.powf(-mean_path / normalizer)
            })
            .collect();

        // Cutoff at the contamination quantile of the batch's own scores
        let mut ranked = scores.clone();
        ranked.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        let cutoff_idx = ((self.contamination * n as f64) as usize).min(n - 1);
        let cutoff = ranked[cutoff_idx];

        Ok(scores.into_iter().map(|s| s > cutoff).collect())
    }
}

impl Default for IsolationForest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clustered_batch(n: usize) -> Array2<f64> {
        let mut x = Array2::zeros((n, 3));
        for i in 0..n {
            x[[i, 0]] = (i % 10) as f64;
            x[[i, 1]] = (i % 7) as f64 * 0.5;
            x[[i, 2]] = 1.0 + (i % 4) as f64 * 0.25;
        }
        x
    }

    #[test]
    fn test_obvious_outliers_flagged() {
        let mut x = clustered_batch(60);
        x[[10, 0]] = 500.0;
        x[[10, 1]] = -500.0;
        x[[41, 2]] = 900.0;

        let flags = IsolationForest::new()
            .with_seed(42)
            .fit_predict(&x)
            .unwrap();

        assert!(flags[10]);
        assert!(flags[41]);
    }

    #[test]
    fn test_contamination_controls_flag_count() {
        for n in [30usize, 50, 95, 120] {
            let x = clustered_batch(n);
            let flags = IsolationForest::new()
                .with_seed(7)
                .with_contamination(0.10)
                .fit_predict(&x)
                .unwrap();

            let flagged = flags.iter().filter(|&&f| f).count() as f64;
            let expected = (0.10 * n as f64).round();
            assert!(
                (flagged - expected).abs() <= 1.0,
                "n={n}: flagged {flagged}, expected {expected} +/- 1"
            );
        }
    }

    #[test]
    fn test_identical_rows_flag_nothing() {
        let x = Array2::from_elem((40, 4), 3.0);
        let flags = IsolationForest::new().with_seed(1).fit_predict(&x).unwrap();
        assert!(flags.iter().all(|&f| !f));
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let x = clustered_batch(80);
        let forest = IsolationForest::new().with_seed(99);
        assert_eq!(forest.fit_predict(&x).unwrap(), forest.fit_predict(&x).unwrap());
    }

    #[test]
    fn test_empty_batch_rejected() {
        let x = Array2::<f64>::zeros((0, 8));
        assert!(IsolationForest::new().fit_predict(&x).is_err());
    }
}
