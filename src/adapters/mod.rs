//! Concrete implementations of the port traits.

pub mod file_config_adapter;
pub mod csv_history_adapter;
pub mod csv_ledger_adapter;
pub mod http_price_adapter;
pub mod json_model_adapter;
pub mod telegram_adapter;
