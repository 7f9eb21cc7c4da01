use serde::{Deserialize, Serialize};

/// A node in a flattened regression tree.
///
/// Nodes are stored in pre-order, so every child index is greater than its
/// parent's index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Go left when `features[feature] <= threshold`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Mean target of the training samples that reached this leaf.
    Leaf { value: f64, samples: usize },
}

/// A single CART regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    /// Node 0 is the root.
    pub nodes: Vec<Node>,
}

impl RegressionTree {
    /// Predict one feature vector. Missing features read as 0.
    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            match self.nodes.get(idx) {
                None => return 0.0,
                Some(Node::Leaf { value, .. }) => return *value,
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = features.get(*feature).copied().unwrap_or(0.0);
                    let next = if value <= *threshold { *left } else { *right };
                    if next <= idx {
                        return 0.0;
                    }
                    idx = next;
                }
            }
        }
    }

    /// Check structural invariants against the expected feature width.
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("Tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "Node {idx} splits on feature {feature} but the model has {n_features}"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("Node {idx} has a non-finite threshold"));
                    }
                    for child in [*left, *right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!("Node {idx} has invalid child {child}"));
                        }
                    }
                }
                Node::Leaf { value, .. } => {
                    if !value.is_finite() {
                        return Err(format!("Leaf {idx} has a non-finite value"));
                    }
                }
            }
        }
        Ok(())
    }

    /// Longest root-to-leaf path, counted in splits.
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match nodes.get(idx) {
                Some(Node::Split { left, right, .. }) => {
                    1 + walk(nodes, *left).max(walk(nodes, *right))
                }
                _ => 0,
            }
        }
        walk(&self.nodes, 0)
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }
}
