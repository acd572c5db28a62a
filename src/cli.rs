//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_history_adapter::CsvHistoryAdapter;
use crate::adapters::csv_ledger_adapter::CsvLedgerAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::http_price_adapter::HttpPriceAdapter;
use crate::adapters::json_model_adapter::JsonModelAdapter;
use crate::adapters::telegram_adapter::TelegramAdapter;
use crate::domain::config_validation::validate_run_config;
use crate::domain::engine::{run_daily, RunConfig};
use crate::domain::entry::EntryPolicy;
use crate::domain::error::SwingbotError;
use crate::domain::price_series::PricePoint;
use crate::domain::report::format_daily_message;
use crate::domain::universe::{parse_codes, restrict_universe};
use crate::ports::config_port::ConfigPort;
use crate::ports::notify_port::NotifyPort;

#[derive(Parser, Debug)]
#[command(name = "swingbot", about = "Daily swing-trading signal engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run today's decision pass
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Decide but neither persist the ledger nor notify
        #[arg(long)]
        dry_run: bool,
        /// Persist the ledger but skip the notification
        #[arg(long)]
        no_notify: bool,
    },
    /// Show the open-position ledger
    Positions {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate configuration and model artifact
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            dry_run,
            no_notify,
        } => run_daily_pass(&config, dry_run, no_notify),
        Command::Positions { config } => run_positions(&config),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SwingbotError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_run_config(adapter: &dyn ConfigPort) -> Result<RunConfig, SwingbotError> {
    let start_str = adapter
        .get_string("data", "fetch_start")
        .ok_or_else(|| SwingbotError::ConfigMissing {
            section: "data".into(),
            key: "fetch_start".into(),
        })?;
    let fetch_start = NaiveDate::parse_from_str(&start_str, "%Y-%m-%d").map_err(|_| {
        SwingbotError::ConfigInvalid {
            section: "data".into(),
            key: "fetch_start".into(),
            reason: "invalid date format (expected YYYY-MM-DD)".into(),
        }
    })?;

    Ok(RunConfig {
        policy: EntryPolicy {
            top_k: adapter.get_int("strategy", "top_k", 5) as usize,
            stop_loss_pct: adapter.get_double("strategy", "stop_loss_pct", 0.03),
            target_pct: adapter.get_double("strategy", "target_pct", 0.05),
        },
        fetch_start,
    })
}

pub fn resolve_universe(
    adapter: &dyn ConfigPort,
    history: &CsvHistoryAdapter,
) -> Result<Vec<String>, SwingbotError> {
    let available = history.list_symbols()?;

    match adapter.get_string("data", "codes") {
        None => Ok(available),
        Some(list) => {
            let requested = parse_codes(&list).map_err(|e| SwingbotError::ConfigInvalid {
                section: "data".into(),
                key: "codes".into(),
                reason: e.to_string(),
            })?;
            restrict_universe(&available, &requested).map_err(|e| SwingbotError::ConfigInvalid {
                section: "data".into(),
                key: "codes".into(),
                reason: e.to_string(),
            })
        }
    }
}

fn run_daily_pass(config_path: &PathBuf, dry_run: bool, no_notify: bool) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_run_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let run_config = match build_run_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 2: Load the pretrained model (shape-checked at load)
    let Some(model_path) = adapter.get_string("model", "path") else {
        return missing_key("model", "path");
    };
    eprintln!("Loading model from {model_path}");
    let model = match JsonModelAdapter::from_file(&model_path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 3: Universe and seed history
    let Some(history_path) = adapter.get_string("data", "history_path") else {
        return missing_key("data", "history_path");
    };
    let history = CsvHistoryAdapter::new(PathBuf::from(&history_path));
    let universe = match resolve_universe(&adapter, &history) {
        Ok(u) => u,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("Universe: {} symbols", universe.len());

    let mut seed_history: HashMap<String, Vec<PricePoint>> = HashMap::new();
    for symbol in &universe {
        match history.load_series(symbol) {
            Ok(points) => {
                seed_history.insert(symbol.clone(), points);
            }
            Err(e) => eprintln!("Warning: no seed history for {symbol} ({e})"),
        }
    }

    // Stage 4: Current ledger (missing or corrupt file starts empty)
    let Some(ledger_path) = adapter.get_string("ledger", "path") else {
        return missing_key("ledger", "path");
    };
    let ledger_store = CsvLedgerAdapter::new(PathBuf::from(&ledger_path));
    let ledger = ledger_store.load();
    eprintln!("Ledger: {} open positions", ledger.len());

    // Stage 5: Price source
    let price_port = match HttpPriceAdapter::from_config(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 6: Decide
    let today = chrono::Local::now().date_naive();
    let report = match run_daily(
        &universe,
        &seed_history,
        &price_port,
        &model,
        &ledger,
        &run_config,
        today,
    ) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "As of {}: {} entries, {} exits, {} skipped",
        report.as_of,
        report.entries.len(),
        report.exits.len(),
        report.skipped.len()
    );

    let message = format_daily_message(&report);
    println!("{message}");

    if dry_run {
        eprintln!("Dry run: ledger not written, notification skipped");
        return ExitCode::SUCCESS;
    }

    // Stage 7: Persist the ledger, then notify. A notification failure must
    // not roll back the completed decisions.
    if let Err(e) = ledger_store.save(&report.ledger) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!(
        "Ledger written to {} ({} open positions)",
        ledger_path,
        report.ledger.len()
    );

    if !no_notify {
        send_notification(&adapter, &message);
    }

    ExitCode::SUCCESS
}

fn missing_key(section: &str, key: &str) -> ExitCode {
    let err = SwingbotError::ConfigMissing {
        section: section.into(),
        key: key.into(),
    };
    eprintln!("error: {err}");
    (&err).into()
}

fn send_notification(adapter: &dyn ConfigPort, message: &str) {
    match TelegramAdapter::from_config(adapter) {
        Ok(Some(telegram)) => match telegram.send_message(message) {
            Ok(()) => eprintln!("Notification sent"),
            Err(e) => eprintln!("Warning: {e}"),
        },
        Ok(None) => eprintln!("No [telegram] section configured, skipping notification"),
        Err(e) => eprintln!("Warning: {e}"),
    }
}

fn run_positions(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let Some(ledger_path) = adapter.get_string("ledger", "path") else {
        let err = SwingbotError::ConfigMissing {
            section: "ledger".into(),
            key: "path".into(),
        };
        eprintln!("error: {err}");
        return (&err).into();
    };

    let ledger = CsvLedgerAdapter::new(PathBuf::from(ledger_path)).load();
    if ledger.is_empty() {
        println!("No open positions");
        return ExitCode::SUCCESS;
    }

    println!(
        "{:<8} {:>10} {:>10} {:>10} {:>12}",
        "Stock", "Buy", "SL", "Target", "Entry"
    );
    for pos in ledger.positions() {
        println!(
            "{:<8} {:>10.2} {:>10.2} {:>10.2} {:>12}",
            pos.stock, pos.buy, pos.stop_loss, pos.target, pos.entry
        );
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_run_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    if let Some(model_path) = adapter.get_string("model", "path") {
        if let Err(e) = JsonModelAdapter::from_file(&model_path) {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    println!("Configuration OK");
    ExitCode::SUCCESS
}
