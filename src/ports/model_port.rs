//! Directional classifier port trait.

use crate::domain::error::SwingbotError;
use crate::domain::feature::FeatureRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Bullish,
    NotBullish,
}

/// A pretrained directional classifier. Stateless and deterministic for a
/// loaded model; the only error it may raise is a feature-shape mismatch,
/// which is fatal to the run.
pub trait SignalModel {
    fn predict(&self, features: &FeatureRow) -> Result<Signal, SwingbotError>;
}
