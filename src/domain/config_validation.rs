//! Configuration validation.
//!
//! Every field is checked before any side effect so a bad config aborts the
//! run with a precise diagnostic instead of failing halfway through.

use crate::domain::error::SwingbotError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_run_config(config: &dyn ConfigPort) -> Result<(), SwingbotError> {
    validate_history_path(config)?;
    validate_fetch_start(config)?;
    validate_timeout(config)?;
    validate_model_path(config)?;
    validate_ledger_path(config)?;
    validate_top_k(config)?;
    validate_pct(config, "stop_loss_pct")?;
    validate_pct(config, "target_pct")?;
    validate_telegram(config)?;
    Ok(())
}

fn require_string(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, SwingbotError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s),
        Some(_) => Err(SwingbotError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{key} must not be empty"),
        }),
        None => Err(SwingbotError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn validate_history_path(config: &dyn ConfigPort) -> Result<(), SwingbotError> {
    require_string(config, "data", "history_path").map(|_| ())
}

fn validate_fetch_start(config: &dyn ConfigPort) -> Result<(), SwingbotError> {
    let value = require_string(config, "data", "fetch_start")?;
    NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| SwingbotError::ConfigInvalid {
        section: "data".to_string(),
        key: "fetch_start".to_string(),
        reason: "invalid date format (expected YYYY-MM-DD)".to_string(),
    })?;
    Ok(())
}

fn validate_timeout(config: &dyn ConfigPort) -> Result<(), SwingbotError> {
    let value = config.get_int("data", "timeout_secs", 20);
    if value <= 0 {
        return Err(SwingbotError::ConfigInvalid {
            section: "data".to_string(),
            key: "timeout_secs".to_string(),
            reason: "timeout_secs must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_model_path(config: &dyn ConfigPort) -> Result<(), SwingbotError> {
    require_string(config, "model", "path").map(|_| ())
}

fn validate_ledger_path(config: &dyn ConfigPort) -> Result<(), SwingbotError> {
    require_string(config, "ledger", "path").map(|_| ())
}

fn validate_top_k(config: &dyn ConfigPort) -> Result<(), SwingbotError> {
    let value = config.get_int("strategy", "top_k", 0);
    if value < 1 {
        return Err(SwingbotError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "top_k".to_string(),
            reason: "top_k must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_pct(config: &dyn ConfigPort, key: &str) -> Result<(), SwingbotError> {
    let value = config.get_double("strategy", key, -1.0);
    if value <= 0.0 || value >= 1.0 {
        return Err(SwingbotError::ConfigInvalid {
            section: "strategy".to_string(),
            key: key.to_string(),
            reason: format!("{key} must be a fraction between 0 and 1"),
        });
    }
    Ok(())
}

// The telegram section is optional, but a half-configured one is a mistake.
fn validate_telegram(config: &dyn ConfigPort) -> Result<(), SwingbotError> {
    let token = config.get_string("telegram", "bot_token");
    let chat = config.get_string("telegram", "chat_id");
    match (token, chat) {
        (Some(_), None) => Err(SwingbotError::ConfigMissing {
            section: "telegram".to_string(),
            key: "chat_id".to_string(),
        }),
        (None, Some(_)) => Err(SwingbotError::ConfigMissing {
            section: "telegram".to_string(),
            key: "bot_token".to_string(),
        }),
        _ => Ok(()),
    }
}
