//! Random-forest regressor loaded from a JSON export.
//!
//! The file carries the feature names in training order plus every tree as a
//! flat node list:
//!
//! ```json
//! {
//!   "feature_names": ["Engine Size(L)", "Vehicle Class_COMPACT"],
//!   "trees": [
//!     { "nodes": [
//!         { "feature": 0, "threshold": 2.5, "left": 1, "right": 2 },
//!         { "value": 190.0 },
//!         { "value": 260.0 }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Prediction walks every tree from node 0, going left when
//! `row[feature] <= threshold`, and averages the leaf values.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

pub const ENGINE_SIZE_FEATURE: &str = "Engine Size(L)";
pub const VEHICLE_CLASS_PREFIX: &str = "Vehicle Class_";

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Failed to read model file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse model file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid model: {0}")]
    Invalid(String),
    #[error("Expected {expected} features, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },
}

/// Inference seam used by the prediction service.
pub trait Regressor: Send + Sync {
    fn feature_names(&self) -> &[String];
    fn predict(&self, row: &[f64]) -> Result<f64, ModelError>;

    /// Vehicle classes the model was trained on, taken from its one-hot columns.
    fn vehicle_classes(&self) -> Vec<String> {
        self.feature_names()
            .iter()
            .filter_map(|name| name.strip_prefix(VEHICLE_CLASS_PREFIX))
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn evaluate(&self, row: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Children must point past their parent, which rules out cycles.
    fn validate(&self, tree_index: usize, feature_count: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Invalid(format!("tree {} has no nodes", tree_index)));
        }

        for (node_index, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature >= feature_count {
                    return Err(ModelError::Invalid(format!(
                        "tree {} node {} splits on unknown feature {}",
                        tree_index, node_index, feature
                    )));
                }
                for child in [*left, *right] {
                    if child <= node_index || child >= self.nodes.len() {
                        return Err(ModelError::Invalid(format!(
                            "tree {} node {} has out-of-order child {}",
                            tree_index, node_index, child
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmissionModel {
    feature_names: Vec<String>,
    trees: Vec<DecisionTree>,
}

impl EmissionModel {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        let model: EmissionModel = serde_json::from_str(raw)?;
        model.validate()?;
        Ok(model)
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.feature_names.is_empty() {
            return Err(ModelError::Invalid("no feature names".to_string()));
        }

        let mut seen = HashSet::new();
        for name in &self.feature_names {
            if !seen.insert(name.as_str()) {
                return Err(ModelError::Invalid(format!("duplicate feature {}", name)));
            }
        }

        if !seen.contains(ENGINE_SIZE_FEATURE) {
            return Err(ModelError::Invalid(format!(
                "missing required feature {}",
                ENGINE_SIZE_FEATURE
            )));
        }

        if self.trees.is_empty() {
            return Err(ModelError::Invalid("no trees".to_string()));
        }

        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(index, self.feature_names.len())?;
        }

        Ok(())
    }
}

impl Regressor for EmissionModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, row: &[f64]) -> Result<f64, ModelError> {
        if row.len() != self.feature_names.len() {
            return Err(ModelError::FeatureCountMismatch {
                expected: self.feature_names.len(),
                actual: row.len(),
            });
        }

        let total: f64 = self.trees.iter().map(|tree| tree.evaluate(row)).sum();
        Ok(total / self.trees.len() as f64)
    }
}
