//! Domain error types.

/// Top-level error type for swingbot.
#[derive(Debug, thiserror::Error)]
pub enum SwingbotError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("model load error: {reason}")]
    ModelLoad { reason: String },

    #[error("feature shape mismatch: {reason}")]
    FeatureShape { reason: String },

    #[error("price fetch failed for {symbol}: {reason}")]
    PriceFetch { symbol: String, reason: String },

    #[error("no price data for any symbol in the universe")]
    NoData,

    #[error("seed history error: {reason}")]
    History { reason: String },

    #[error("ledger error: {reason}")]
    Ledger { reason: String },

    #[error("notification delivery failed: {reason}")]
    Notify { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SwingbotError> for std::process::ExitCode {
    fn from(err: &SwingbotError) -> Self {
        let code: u8 = match err {
            SwingbotError::Io(_) => 1,
            SwingbotError::ConfigParse { .. }
            | SwingbotError::ConfigMissing { .. }
            | SwingbotError::ConfigInvalid { .. } => 2,
            SwingbotError::ModelLoad { .. } | SwingbotError::FeatureShape { .. } => 3,
            SwingbotError::PriceFetch { .. }
            | SwingbotError::NoData
            | SwingbotError::History { .. } => 4,
            SwingbotError::Ledger { .. } => 5,
            SwingbotError::Notify { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
