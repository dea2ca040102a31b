//! Fare model interface and the serialized artifacts that implement it.
//!
//! Artifacts are JSON exports of an already trained regressor. Every artifact
//! names its input columns; loading refuses any artifact whose columns differ
//! from [`FEATURE_NAMES`] in name or order.

use std::path::Path;

use serde::Deserialize;

use crate::error::ModelError;
use crate::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};

/// Opaque regression model mapping trip features to a raw fare.
pub trait FareModel: Send + Sync {
    /// Raw fare prediction. May be negative.
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError>;

    /// Model name for logs.
    fn name(&self) -> &str;
}

fn check_schema(features: &[String]) -> Result<(), ModelError> {
    if features.len() != FEATURE_COUNT {
        return Err(ModelError::SchemaMismatch(format!(
            "expected {} features, artifact declares {}",
            FEATURE_COUNT,
            features.len()
        )));
    }
    for (i, (got, want)) in features.iter().zip(FEATURE_NAMES).enumerate() {
        if got != want {
            return Err(ModelError::SchemaMismatch(format!(
                "column {} is \"{}\", expected \"{}\"",
                i, got, want
            )));
        }
    }
    Ok(())
}

fn default_name() -> String {
    "unnamed".to_string()
}

/// `intercept + Σ coefficient_i × feature_i`.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    #[serde(default = "default_name")]
    pub name: String,
    pub features: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    fn validate(&self) -> Result<(), ModelError> {
        check_schema(&self.features)?;
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(ModelError::Malformed(format!(
                "{} coefficients for {} features",
                self.coefficients.len(),
                FEATURE_COUNT
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::Malformed("non-finite weight".to_string()));
        }
        Ok(())
    }
}

impl FareModel for LinearModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features.to_array())
            .map(|(w, x)| w * x)
            .sum();
        Ok(self.intercept + dot)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A node in a regression tree. Samples with `x[feature] <= threshold` go left.
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

/// Nodes in pre-order; node 0 is the root.
#[derive(Debug, Clone, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    fn validate(&self, tree_index: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Malformed(format!("tree {} has no nodes", tree_index)));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } = *node
            {
                if feature >= FEATURE_COUNT {
                    return Err(ModelError::Malformed(format!(
                        "tree {} node {} splits on feature {}",
                        tree_index, i, feature
                    )));
                }
                // Children after their parent rules out cycles.
                let in_range = |c: usize| c > i && c < self.nodes.len();
                if !in_range(left) || !in_range(right) || !threshold.is_finite() {
                    return Err(ModelError::Malformed(format!(
                        "tree {} node {} has invalid children or threshold",
                        tree_index, i
                    )));
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, x: &[f64; FEATURE_COUNT]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                TreeNode::Leaf { value } => return value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if x[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

/// Bagged regression trees; the prediction is the mean of all trees.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEnsembleModel {
    #[serde(default = "default_name")]
    pub name: String,
    pub features: Vec<String>,
    pub trees: Vec<RegressionTree>,
}

impl TreeEnsembleModel {
    fn validate(&self) -> Result<(), ModelError> {
        check_schema(&self.features)?;
        if self.trees.is_empty() {
            return Err(ModelError::Malformed("ensemble has no trees".to_string()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i)?;
        }
        Ok(())
    }
}

impl FareModel for TreeEnsembleModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        let x = features.to_array();
        let total: f64 = self.trees.iter().map(|t| t.evaluate(&x)).sum();
        Ok(total / self.trees.len() as f64)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Any supported model artifact, tagged by `kind` in the JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsembleModel),
}

impl ModelArtifact {
    /// Parse and validate an artifact from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = serde_json::from_str(json)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Read, parse and validate an artifact file.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let contents = std::fs::read_to_string(path)?;
        let artifact = Self::from_json(&contents)?;
        tracing::info!(
            "Loaded fare model '{}' from {}",
            artifact.name(),
            path.display()
        );
        Ok(artifact)
    }

    fn validate(&self) -> Result<(), ModelError> {
        match self {
            Self::Linear(m) => m.validate(),
            Self::TreeEnsemble(m) => m.validate(),
        }
    }
}

impl FareModel for ModelArtifact {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        let raw = match self {
            Self::Linear(m) => m.predict(features)?,
            Self::TreeEnsemble(m) => m.predict(features)?,
        };
        if !raw.is_finite() {
            return Err(ModelError::NonFinite(raw));
        }
        Ok(raw)
    }

    fn name(&self) -> &str {
        match self {
            Self::Linear(m) => m.name(),
            Self::TreeEnsemble(m) => m.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::build_features;
    use crate::geo::Coordinate;
    use crate::trip::TripRequest;
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, NaiveTime};
    use std::io::Write;

    fn features() -> FeatureVector {
        let req = TripRequest::new(
            Coordinate::new(40.7128, -74.0060),
            Coordinate::new(40.7306, -73.9352),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            2,
        )
        .unwrap();
        build_features(&req, 45.0)
    }

    fn names() -> serde_json::Value {
        serde_json::json!(FEATURE_NAMES)
    }

    /// Linear artifact charging 2.5 base + 100 per degree of manhattan distance.
    fn linear_json() -> String {
        let mut coefficients = vec![0.0; FEATURE_COUNT];
        coefficients[18] = 100.0;
        serde_json::json!({
            "kind": "linear",
            "name": "test-linear",
            "features": names(),
            "intercept": 2.5,
            "coefficients": coefficients,
        })
        .to_string()
    }

    #[test]
    fn test_linear_predict() {
        let model = ModelArtifact::from_json(&linear_json()).unwrap();
        assert_eq!(model.name(), "test-linear");
        let raw = model.predict(&features()).unwrap();
        assert_relative_eq!(raw, 2.5 + 8.86, epsilon = 1e-9);
    }

    #[test]
    fn test_reordered_schema_rejected() {
        let mut swapped: Vec<&str> = FEATURE_NAMES.to_vec();
        swapped.swap(16, 17);
        let json = serde_json::json!({
            "kind": "linear",
            "features": swapped,
            "intercept": 0.0,
            "coefficients": vec![0.0; FEATURE_COUNT],
        })
        .to_string();

        let err = ModelArtifact::from_json(&json).unwrap_err();
        assert!(
            matches!(&err, ModelError::SchemaMismatch(msg) if msg.contains("column 16")),
            "unexpected error: {:?}",
            err
        );
    }

    #[test]
    fn test_short_schema_rejected() {
        let json = serde_json::json!({
            "kind": "linear",
            "features": &FEATURE_NAMES[..19],
            "intercept": 0.0,
            "coefficients": vec![0.0; 19],
        })
        .to_string();
        assert!(matches!(
            ModelArtifact::from_json(&json),
            Err(ModelError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_coefficient_count_checked() {
        let json = serde_json::json!({
            "kind": "linear",
            "features": names(),
            "intercept": 0.0,
            "coefficients": [1.0, 2.0],
        })
        .to_string();
        assert!(matches!(
            ModelArtifact::from_json(&json),
            Err(ModelError::Malformed(_))
        ));
    }

    #[test]
    fn test_tree_ensemble_averages_trees() {
        // Tree A splits on passenger_count (index 4), tree B is a constant.
        let json = serde_json::json!({
            "kind": "tree_ensemble",
            "name": "forest",
            "features": names(),
            "trees": [
                { "nodes": [
                    { "feature": 4, "threshold": 1.5, "left": 1, "right": 2 },
                    { "value": 10.0 },
                    { "value": 20.0 }
                ]},
                { "nodes": [ { "value": 30.0 } ] }
            ]
        })
        .to_string();

        let model = ModelArtifact::from_json(&json).unwrap();
        // passenger_count = 2 goes right in tree A
        assert_relative_eq!(model.predict(&features()).unwrap(), 25.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tree_cycle_rejected() {
        let json = serde_json::json!({
            "kind": "tree_ensemble",
            "features": names(),
            "trees": [
                { "nodes": [
                    { "feature": 0, "threshold": 1.0, "left": 0, "right": 1 },
                    { "value": 1.0 }
                ]}
            ]
        })
        .to_string();
        assert!(matches!(
            ModelArtifact::from_json(&json),
            Err(ModelError::Malformed(_))
        ));
    }

    #[test]
    fn test_tree_bad_feature_rejected() {
        let json = serde_json::json!({
            "kind": "tree_ensemble",
            "features": names(),
            "trees": [
                { "nodes": [
                    { "feature": 20, "threshold": 1.0, "left": 1, "right": 2 },
                    { "value": 1.0 },
                    { "value": 2.0 }
                ]}
            ]
        })
        .to_string();
        assert!(matches!(
            ModelArtifact::from_json(&json),
            Err(ModelError::Malformed(_))
        ));
    }

    #[test]
    fn test_unknown_kind_is_parse_error() {
        let json = r#"{"kind": "neural_net", "features": []}"#;
        assert!(matches!(
            ModelArtifact::from_json(json),
            Err(ModelError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(linear_json().as_bytes()).unwrap();

        let model = ModelArtifact::load(file.path()).unwrap();
        assert!(matches!(model, ModelArtifact::Linear(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ModelArtifact::load(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, ModelError::Io(_)));
    }
}
