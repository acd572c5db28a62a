//! Core domain types and decision logic.

pub mod price_series;
pub mod indicator;
pub mod feature;
pub mod position;
pub mod entry;
pub mod exit;
pub mod ledger;
pub mod engine;
pub mod report;
pub mod universe;
pub mod config_validation;
pub mod error;
