//! Pretrained classifier adapter.
//!
//! The artifact is a JSON file exported from the training pipeline:
//! `{feature_names, weights, bias, threshold}` describing a logistic scorer.
//! The input vector is assembled by feature *name* against the artifact's
//! own ordering, so the adapter fails loudly, before any ledger mutation,
//! if the trained shape and [`FEATURE_COLUMNS`] ever drift apart.

use crate::domain::error::SwingbotError;
use crate::domain::feature::{FeatureRow, FEATURE_COLUMNS};
use crate::ports::model_port::{Signal, SignalModel};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ModelArtifact {
    feature_names: Vec<String>,
    weights: Vec<f64>,
    bias: f64,
    threshold: f64,
}

#[derive(Debug)]
pub struct JsonModelAdapter {
    artifact: ModelArtifact,
}

impl JsonModelAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SwingbotError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SwingbotError::ModelLoad {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, SwingbotError> {
        let artifact: ModelArtifact =
            serde_json::from_str(content).map_err(|e| SwingbotError::ModelLoad {
                reason: format!("invalid model artifact: {e}"),
            })?;

        if artifact.feature_names.len() != artifact.weights.len() {
            return Err(SwingbotError::ModelLoad {
                reason: format!(
                    "{} feature names but {} weights",
                    artifact.feature_names.len(),
                    artifact.weights.len()
                ),
            });
        }
        if !(0.0..=1.0).contains(&artifact.threshold) {
            return Err(SwingbotError::ModelLoad {
                reason: format!("threshold {} outside [0, 1]", artifact.threshold),
            });
        }

        let adapter = Self { artifact };
        adapter.check_shape()?;
        Ok(adapter)
    }

    /// The trained feature set must be exactly the one this build computes.
    fn check_shape(&self) -> Result<(), SwingbotError> {
        if self.artifact.feature_names.len() != FEATURE_COLUMNS.len() {
            return Err(SwingbotError::FeatureShape {
                reason: format!(
                    "model expects {} features, this build computes {}",
                    self.artifact.feature_names.len(),
                    FEATURE_COLUMNS.len()
                ),
            });
        }
        for name in &self.artifact.feature_names {
            if !FEATURE_COLUMNS.contains(&name.as_str()) {
                return Err(SwingbotError::FeatureShape {
                    reason: format!("model expects unknown feature '{name}'"),
                });
            }
        }
        Ok(())
    }

    /// Logistic score in [0, 1] for a feature row.
    pub fn score(&self, features: &FeatureRow) -> Result<f64, SwingbotError> {
        let mut z = self.artifact.bias;
        for (name, weight) in self.artifact.feature_names.iter().zip(&self.artifact.weights) {
            let value = features.get(name).ok_or_else(|| SwingbotError::FeatureShape {
                reason: format!("model expects unknown feature '{name}'"),
            })?;
            z += weight * value;
        }
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

impl SignalModel for JsonModelAdapter {
    fn predict(&self, features: &FeatureRow) -> Result<Signal, SwingbotError> {
        let score = self.score(features)?;
        if score >= self.artifact.threshold {
            Ok(Signal::Bullish)
        } else {
            Ok(Signal::NotBullish)
        }
    }
}
