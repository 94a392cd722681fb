//! Random Forest Classifier
//!
//! Portable JSON export of a trained scikit-learn style forest. Each tree is
//! a flat node array with the root at index 0 and children stored after
//! their parent. Classification forests carry class-weight leaves; forests
//! exported without classes are regressors (e.g. logg or numax) with value
//! leaves.

use crate::classifier::{ClassLabel, Classifier};
use crate::feature_vector::FEATURE_NAMES;
use crate::EstimatorError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Node of a decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Go to `left` when `features[feature] <= threshold`, else `right`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Class weights (counts or fractions) of the training samples in the leaf
    Leaf { distribution: Vec<f64> },
    /// Mean target of the training samples in the leaf (regression)
    Value { value: f64 },
}

/// Single decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Terminal node reached by `features`
    fn leaf(&self, features: &[f64]) -> Result<&TreeNode, EstimatorError> {
        let mut idx = 0;
        // Children always follow their parent, so a path visits each node at most once
        for _ in 0..self.nodes.len() {
            let node = self.nodes.get(idx).ok_or_else(|| {
                EstimatorError::Prediction(format!("tree node {} out of range", idx))
            })?;
            let TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } = node
            else {
                return Ok(node);
            };

            let value = features.get(*feature).ok_or_else(|| {
                EstimatorError::Prediction(format!("split on missing feature {}", feature))
            })?;
            let next = if *value <= *threshold { *left } else { *right };
            if next <= idx {
                return Err(EstimatorError::Prediction(format!(
                    "node {} points back to node {}",
                    idx, next
                )));
            }
            idx = next;
        }

        Err(EstimatorError::Prediction(
            "tree traversal did not reach a leaf".to_string(),
        ))
    }

    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!("node {} splits on feature {}", idx, feature));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {} has a NaN threshold", idx));
                    }
                    for child in [*left, *right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child {}", idx, child));
                        }
                    }
                }
                TreeNode::Leaf { .. } if n_classes == 0 => {
                    return Err(format!("leaf {} has class weights in a regression forest", idx));
                }
                TreeNode::Leaf { distribution } => {
                    if distribution.len() != n_classes {
                        return Err(format!(
                            "leaf {} has {} class weights, expected {}",
                            idx,
                            distribution.len(),
                            n_classes
                        ));
                    }
                    if distribution.iter().any(|w| !w.is_finite() || *w < 0.0) {
                        return Err(format!("leaf {} has an invalid class weight", idx));
                    }
                    if distribution.iter().sum::<f64>() <= 0.0 {
                        return Err(format!("leaf {} is empty", idx));
                    }
                }
                TreeNode::Value { .. } if n_classes > 0 => {
                    return Err(format!("leaf {} has a value in a classification forest", idx));
                }
                TreeNode::Value { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {} has a non-finite value", idx));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Forest as stored on disk, before validation
#[derive(Deserialize)]
struct ForestExport {
    feature_names: Vec<String>,
    #[serde(default)]
    classes: Vec<String>,
    trees: Vec<DecisionTree>,
}

impl TryFrom<ForestExport> for RandomForest {
    type Error = EstimatorError;

    fn try_from(export: ForestExport) -> Result<Self, Self::Error> {
        Self::new(export.feature_names, export.classes, export.trees)
    }
}

/// Ensemble of decision trees; classes are voted by mean probability,
/// regression values are averaged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ForestExport")]
pub struct RandomForest {
    /// Training column names, in input order
    feature_names: Vec<String>,
    /// Class labels, indexed by leaf distribution position; empty for regressors
    classes: Vec<String>,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Build a forest, checking it against the FliPer feature schema
    pub fn new(
        feature_names: Vec<String>,
        classes: Vec<String>,
        trees: Vec<DecisionTree>,
    ) -> Result<Self, EstimatorError> {
        let forest = Self {
            feature_names,
            classes,
            trees,
        };
        forest.validate()?;
        Ok(forest)
    }

    /// Parse and validate a forest from its JSON export
    pub fn from_json(json: &str) -> Result<Self, EstimatorError> {
        let forest: Self = serde_json::from_str(json)
            .map_err(|e| EstimatorError::Load(format!("not a random forest artifact: {}", e)))?;
        debug!(
            "Parsed random forest: {} trees, {} classes",
            forest.trees.len(),
            forest.classes.len()
        );
        Ok(forest)
    }

    fn validate(&self) -> Result<(), EstimatorError> {
        if self.feature_names.len() != FEATURE_NAMES.len()
            || self
                .feature_names
                .iter()
                .zip(FEATURE_NAMES)
                .any(|(have, want)| have != want)
        {
            return Err(EstimatorError::Load(format!(
                "model trained on features {:?}, expected {:?}",
                self.feature_names, FEATURE_NAMES
            )));
        }
        if self.trees.is_empty() {
            return Err(EstimatorError::Load("model has no trees".to_string()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.feature_names.len(), self.classes.len())
                .map_err(|e| EstimatorError::Load(format!("tree {}: {}", i, e)))?;
        }
        Ok(())
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Class labels; empty for regression forests
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Whether the forest predicts a continuous value instead of a class
    pub fn is_regressor(&self) -> bool {
        self.classes.is_empty()
    }

    fn check_shape(&self, features: &[f64]) -> Result<(), EstimatorError> {
        if features.len() != self.feature_names.len() {
            return Err(EstimatorError::InvalidInputShape {
                expected: self.feature_names.len(),
                actual: features.len(),
            });
        }
        Ok(())
    }

    /// Mean class probabilities over all trees
    pub fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, EstimatorError> {
        self.check_shape(features)?;
        if self.is_regressor() {
            return Err(EstimatorError::Prediction(
                "regression forest has no class probabilities".to_string(),
            ));
        }

        let mut probabilities = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let TreeNode::Leaf { distribution } = tree.leaf(features)? else {
                return Err(EstimatorError::Prediction("expected a class leaf".to_string()));
            };
            let total: f64 = distribution.iter().sum();
            for (acc, w) in probabilities.iter_mut().zip(distribution) {
                *acc += w / total;
            }
        }

        let n_trees = self.trees.len() as f64;
        probabilities.iter_mut().for_each(|p| *p /= n_trees);
        Ok(probabilities)
    }

    /// Mean leaf value over all trees of a regression forest
    pub fn predict_value(&self, features: &[f64]) -> Result<f64, EstimatorError> {
        self.check_shape(features)?;
        if !self.is_regressor() {
            return Err(EstimatorError::Prediction(
                "classification forest has no regression value".to_string(),
            ));
        }

        let mut total = 0.0;
        for tree in &self.trees {
            let TreeNode::Value { value } = tree.leaf(features)? else {
                return Err(EstimatorError::Prediction("expected a value leaf".to_string()));
            };
            total += value;
        }
        Ok(total / self.trees.len() as f64)
    }
}

impl Classifier for RandomForest {
    fn predict(&self, features: &[f64]) -> Result<ClassLabel, EstimatorError> {
        if self.is_regressor() {
            let value = self.predict_value(features)?;
            debug!("Forest mean value: {}", value);
            return Ok(ClassLabel::new(value.to_string()));
        }

        let probabilities = self.predict_proba(features)?;

        // First class wins ties
        let mut best = 0;
        for (i, &p) in probabilities.iter().enumerate() {
            if p > probabilities[best] {
                best = i;
            }
        }

        debug!(
            "Forest vote: {} (p={:.3})",
            self.classes[best], probabilities[best]
        );
        Ok(ClassLabel::new(self.classes[best].clone()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Two trees splitting on lnF07 and teff, classes RGB / RC
    pub(crate) const FOREST_JSON: &str = r#"{
        "feature_names": ["lnF07", "lnF7", "lnF20", "lnF50", "teff"],
        "classes": ["RGB", "RC"],
        "trees": [
            { "nodes": [
                { "kind": "split", "feature": 0, "threshold": 2.0, "left": 1, "right": 2 },
                { "kind": "leaf", "distribution": [1.0, 9.0] },
                { "kind": "leaf", "distribution": [8.0, 2.0] }
            ]},
            { "nodes": [
                { "kind": "split", "feature": 4, "threshold": 4800.0, "left": 1, "right": 2 },
                { "kind": "leaf", "distribution": [0.7, 0.3] },
                { "kind": "leaf", "distribution": [0.2, 0.8] }
            ]}
        ]
    }"#;

    fn forest() -> RandomForest {
        RandomForest::from_json(FOREST_JSON).unwrap()
    }

    #[test]
    fn test_high_fliper_cool_star() {
        // Tree 1 -> [0.8, 0.2], tree 2 -> [0.7, 0.3]
        let label = forest().predict(&[3.0, 2.5, 2.0, 1.5, 4600.0]).unwrap();
        assert_eq!(label, ClassLabel::from("RGB"));
    }

    #[test]
    fn test_low_fliper_hot_star() {
        // Tree 1 -> [0.1, 0.9], tree 2 -> [0.2, 0.8]
        let label = forest().predict(&[1.0, 0.5, 0.2, 0.1, 5000.0]).unwrap();
        assert_eq!(label.as_str(), "RC");
    }

    #[test]
    fn test_threshold_goes_left() {
        let proba = forest().predict_proba(&[2.0, 0.0, 0.0, 0.0, 4800.0]).unwrap();
        assert!((proba[0] - 0.4).abs() < 1e-12);
        assert!((proba[1] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_tie_picks_first_class() {
        let json = FOREST_JSON
            .replace("[1.0, 9.0]", "[5.0, 5.0]")
            .replace("[0.7, 0.3]", "[0.5, 0.5]");
        let forest = RandomForest::from_json(&json).unwrap();
        let label = forest.predict(&[1.0, 1.0, 1.0, 1.0, 4000.0]).unwrap();
        assert_eq!(label.as_str(), "RGB");
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = forest().predict(&[1.0, 2.0, 3.0, 4.0]).unwrap_err();
        assert_eq!(
            err,
            EstimatorError::InvalidInputShape {
                expected: 5,
                actual: 4
            }
        );
        assert!(err.is_prediction_error());
    }

    #[test]
    fn test_wrong_feature_order_rejected() {
        let json = FOREST_JSON.replace(r#""lnF07", "lnF7""#, r#""lnF7", "lnF07""#);
        let err = RandomForest::from_json(&json).unwrap_err();
        assert!(matches!(err, EstimatorError::Load(_)));
    }

    #[test]
    fn test_backward_child_rejected() {
        let json = FOREST_JSON.replacen(r#""left": 1"#, r#""left": 0"#, 1);
        assert_ne!(json, FOREST_JSON);
        assert!(RandomForest::from_json(&json).is_err());
    }

    #[test]
    fn test_leaf_size_mismatch_rejected() {
        let json = FOREST_JSON.replace("[8.0, 2.0]", "[8.0, 2.0, 1.0]");
        assert!(RandomForest::from_json(&json).is_err());
    }

    #[test]
    fn test_direct_deserialize_validates() {
        let json = FOREST_JSON.replacen(r#""left": 1"#, r#""left": 0"#, 1);
        assert!(serde_json::from_str::<RandomForest>(&json).is_err());
    }

    #[test]
    fn test_self_loop_tree_fails_fast() {
        // Deserializing DecisionTree alone skips forest validation
        let tree: DecisionTree = serde_json::from_str(
            r#"{ "nodes": [
                { "kind": "split", "feature": 0, "threshold": 1.0, "left": 0, "right": 0 }
            ]}"#,
        )
        .unwrap();
        let err = tree.leaf(&[0.0, 0.0, 0.0, 0.0, 5000.0]).unwrap_err();
        assert!(err.is_prediction_error());

        let names = FEATURE_NAMES.iter().map(|n| n.to_string()).collect();
        let result = RandomForest::new(names, vec!["RGB".to_string()], vec![tree]);
        assert!(matches!(result, Err(EstimatorError::Load(_))));
    }

    #[test]
    fn test_regression_forest_averages_values() {
        let json = r#"{
            "feature_names": ["lnF07", "lnF7", "lnF20", "lnF50", "teff"],
            "trees": [
                { "nodes": [
                    { "kind": "split", "feature": 0, "threshold": 2.0, "left": 1, "right": 2 },
                    { "kind": "value", "value": 2.5 },
                    { "kind": "value", "value": 3.0 }
                ]},
                { "nodes": [ { "kind": "value", "value": 2.0 } ]}
            ]
        }"#;
        let forest = RandomForest::from_json(json).unwrap();
        assert!(forest.is_regressor());

        let features = [3.0, 2.5, 2.0, 1.5, 4600.0];
        assert!((forest.predict_value(&features).unwrap() - 2.5).abs() < 1e-12);
        assert_eq!(forest.predict(&features).unwrap().as_str(), "2.5");
        assert!(forest.predict_proba(&features).is_err());
    }

    #[test]
    fn test_mixed_leaf_kinds_rejected() {
        let json = FOREST_JSON.replace(
            r#"{ "kind": "leaf", "distribution": [8.0, 2.0] }"#,
            r#"{ "kind": "value", "value": 2.7 }"#,
        );
        assert_ne!(json, FOREST_JSON);
        assert!(RandomForest::from_json(&json).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let err = RandomForest::from_json("{\"weights\": [1, 2, 3]}").unwrap_err();
        assert!(matches!(err, EstimatorError::Load(_)));
    }
}
