//! Universe handling: which symbols the daily pass considers.
//!
//! The universe is the set of symbols with seed history on disk, optionally
//! narrowed by a configured code list.

use std::collections::HashSet;

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in code list")]
    EmptyToken,

    #[error("duplicate code: {0}")]
    DuplicateCode(String),

    #[error("code {0} has no seed history")]
    UnknownCode(String),
}

/// Parse a comma-separated code list: trimmed, uppercased, duplicates
/// rejected.
pub fn parse_codes(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let code = trimmed.to_uppercase();
        if seen.contains(&code) {
            return Err(UniverseError::DuplicateCode(code));
        }
        seen.insert(code.clone());
        codes.push(code);
    }

    Ok(codes)
}

/// Restrict the available symbols to a configured code list, keeping the
/// requested order. Every requested code must have seed history.
pub fn restrict_universe(
    available: &[String],
    requested: &[String],
) -> Result<Vec<String>, UniverseError> {
    let known: HashSet<&str> = available.iter().map(|s| s.as_str()).collect();
    let mut out = Vec::with_capacity(requested.len());
    for code in requested {
        if !known.contains(code.as_str()) {
            return Err(UniverseError::UnknownCode(code.clone()));
        }
        out.push(code.clone());
    }
    Ok(out)
}
