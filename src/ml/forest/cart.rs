//! Exact-greedy CART construction for regression.

use super::tree::{Node, RegressionTree};

/// Variance below which a node is treated as pure.
const PURE_VARIANCE: f64 = 1e-10;

/// Stopping rules for a single tree.
#[derive(Debug, Clone, Copy)]
pub(super) struct TreeOptions {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    /// `sum_l^2 / n_l + sum_r^2 / n_r`; larger means lower squared error.
    score: f64,
}

/// Builds one tree over rows of `x` selected by index.
///
/// Indices may repeat (bootstrap draws); a repeated row counts once per draw.
pub(super) struct CartBuilder<'a> {
    x: &'a [Vec<f64>],
    y: &'a [f64],
    options: TreeOptions,
    n_features: usize,
}

impl<'a> CartBuilder<'a> {
    pub fn new(x: &'a [Vec<f64>], y: &'a [f64], options: TreeOptions) -> Self {
        let n_features = x.first().map(Vec::len).unwrap_or(0);
        Self {
            x,
            y,
            options,
            n_features,
        }
    }

    pub fn build(&self, sample: &[usize]) -> RegressionTree {
        let mut nodes = Vec::new();
        self.build_node(sample, 0, &mut nodes);
        RegressionTree { nodes }
    }

    fn build_node(&self, indices: &[usize], depth: usize, nodes: &mut Vec<Node>) -> usize {
        let current = nodes.len();
        let (mean, variance) = self.target_moments(indices);
        let leaf = Node::Leaf {
            value: mean,
            samples: indices.len(),
        };

        let depth_reached = self.options.max_depth.is_some_and(|max| depth >= max);
        if depth_reached
            || indices.len() < self.options.min_samples_split
            || indices.len() < 2 * self.options.min_samples_leaf
            || variance < PURE_VARIANCE
        {
            nodes.push(leaf);
            return current;
        }

        let Some(split) = self.find_best_split(indices) else {
            nodes.push(leaf);
            return current;
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&idx| self.x[idx][split.feature] <= split.threshold);

        // Placeholder until both children have been numbered.
        nodes.push(leaf);
        let left = self.build_node(&left_indices, depth + 1, nodes);
        let right = self.build_node(&right_indices, depth + 1, nodes);
        nodes[current] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        current
    }

    /// Scan every feature and every boundary between distinct sorted values.
    /// Ties keep the earliest feature and the lowest threshold.
    fn find_best_split(&self, indices: &[usize]) -> Option<SplitCandidate> {
        let n = indices.len();
        let total: f64 = indices.iter().map(|&idx| self.y[idx]).sum();
        let min_leaf = self.options.min_samples_leaf.max(1);
        let mut order = indices.to_vec();
        let mut best: Option<SplitCandidate> = None;

        for feature in 0..self.n_features {
            order.sort_by(|&a, &b| self.x[a][feature].total_cmp(&self.x[b][feature]));
            let mut left_sum = 0.0f64;
            for pos in 0..n - 1 {
                left_sum += self.y[order[pos]];
                let low = self.x[order[pos]][feature];
                let high = self.x[order[pos + 1]][feature];
                if low >= high {
                    continue;
                }
                let n_left = pos + 1;
                let n_right = n - n_left;
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }
                let right_sum = total - left_sum;
                let score =
                    left_sum * left_sum / n_left as f64 + right_sum * right_sum / n_right as f64;
                if best.is_none_or(|current| score > current.score) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: midpoint(low, high),
                        score,
                    });
                }
            }
        }
        best
    }

    fn target_moments(&self, indices: &[usize]) -> (f64, f64) {
        if indices.is_empty() {
            return (0.0, 0.0);
        }
        let n = indices.len() as f64;
        let mean = indices.iter().map(|&idx| self.y[idx]).sum::<f64>() / n;
        let variance = indices
            .iter()
            .map(|&idx| (self.y[idx] - mean).powi(2))
            .sum::<f64>()
            / n;
        (mean, variance)
    }
}

/// Halfway between two adjacent values, never rounding up to `high`.
fn midpoint(low: f64, high: f64) -> f64 {
    let mid = low + (high - low) / 2.0;
    if mid >= high { low } else { mid }
}
