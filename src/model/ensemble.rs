//! Tree-ensemble artifact format.
//!
//! Models trained offline are exported to JSON as a list of decision trees
//! plus an aggregation rule. Gradient-boosted regressors sum their leaves,
//! random-forest regressors average them and random-forest classifiers take
//! a majority vote over leaf labels.

use super::Predictor;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    Sum,
    Mean,
    Vote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    pub aggregation: Aggregation,
    pub n_features: usize,
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

fn default_format_version() -> u32 {
    SUPPORTED_FORMAT_VERSION
}

impl Tree {
    /// Walks from the root to a leaf. Callers must have run `validate`,
    /// which guarantees in-range indices; the step bound stops cycles.
    fn eval(&self, features: &[f64]) -> Result<f64> {
        let mut idx = 0usize;
        for _ in 0..self.nodes.len() {
            match &self.nodes[idx] {
                Node::Leaf { value } => return Ok(*value),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
        Err(Error::prediction("tree traversal did not reach a leaf"))
    }

    fn validate(&self, n_features: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(Error::model_load("tree has no nodes"));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if let Node::Split {
                feature,
                threshold,
                left,
                right,
            } = node
            {
                if *feature >= n_features {
                    return Err(Error::model_load(format!(
                        "node {} splits on feature {} but the model has {} features",
                        i, feature, n_features
                    )));
                }
                if !threshold.is_finite() {
                    return Err(Error::model_load(format!("node {} has a non-finite threshold", i)));
                }
                if *left >= self.nodes.len() || *right >= self.nodes.len() {
                    return Err(Error::model_load(format!(
                        "node {} points outside the tree ({} nodes)",
                        i,
                        self.nodes.len()
                    )));
                }
            }
        }
        Ok(())
    }
}

impl TreeEnsemble {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let model: Self = serde_json::from_slice(bytes)
            .map_err(|e| Error::model_load(format!("invalid model artifact: {}", e)))?;
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<()> {
        if self.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(Error::model_load(format!(
                "unsupported artifact format version {}",
                self.format_version
            )));
        }
        if self.trees.is_empty() {
            return Err(Error::model_load("ensemble has no trees"));
        }
        for tree in &self.trees {
            tree.validate(self.n_features)?;
        }
        Ok(())
    }

    fn vote(leaves: &[f64]) -> f64 {
        // Labels are integral class ids; BTreeMap order makes ties go to the smallest.
        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        for leaf in leaves {
            *counts.entry(leaf.round() as i64).or_default() += 1;
        }
        let mut best = (0i64, 0usize);
        for (label, count) in counts {
            if count > best.1 {
                best = (label, count);
            }
        }
        best.0 as f64
    }
}

impl Predictor for TreeEnsemble {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.n_features {
            return Err(Error::prediction(format!(
                "feature length mismatch: got {}, expected {}",
                features.len(),
                self.n_features
            )));
        }

        let leaves = self
            .trees
            .iter()
            .map(|tree| tree.eval(features))
            .collect::<Result<Vec<_>>>()?;

        let output = match self.aggregation {
            Aggregation::Sum => self.base_score + leaves.iter().sum::<f64>(),
            Aggregation::Mean => self.base_score + leaves.iter().sum::<f64>() / leaves.len() as f64,
            Aggregation::Vote => Self::vote(&leaves),
        };

        Ok(output)
    }

    fn feature_count(&self) -> Option<usize> {
        Some(self.n_features)
    }
}
