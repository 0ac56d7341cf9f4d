//! Sentry Toggle - Entry Point
//!
//! Runs one invocation: reads the target Sentry Mode state, brings the
//! vehicle online, checks it is safe to act and sets the mode.

use std::collections::HashMap;
use std::env;
use std::process::ExitCode;

use anyhow::Context;
use colored::Colorize;
use tracing::error;

use sentry_toggle::app::options::AppOptions;
use sentry_toggle::app::run::run;
use sentry_toggle::logs::{init_logging, LogOptions};
use sentry_toggle::models::invocation::InvocationEvent;
use sentry_toggle::models::outcome::{Outcome, OutcomeStatus};
use sentry_toggle::storage::layout::StorageLayout;
use sentry_toggle::storage::settings::Settings;
use sentry_toggle::utils::version_info;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(version) => println!("{}", version),
            Err(e) => eprintln!("Failed to render version: {e}"),
        }
        return ExitCode::SUCCESS;
    }

    let layout = match cli_args.get("config-dir") {
        Some(dir) => StorageLayout::new(dir),
        None => StorageLayout::default(),
    };

    // Retrieve the settings file
    let settings = match Settings::load_or_default(&layout.settings_file()).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", format!("Unable to read settings: {e}").red());
            return report(&Outcome::error(e.to_string()));
        }
    };

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        log_dir: settings.log_dir.clone(),
        json_format: settings.log_json,
        ..Default::default()
    };
    if let Err(e) = init_logging(log_options) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let event = match parse_event(&cli_args) {
        Ok(event) => event,
        Err(e) => {
            error!("Invalid invocation event: {:#}", e);
            return report(&Outcome::error("invalid target state"));
        }
    };

    let options = AppOptions::from_settings(&settings, &layout);
    let outcome = run(options, event).await;
    report(&outcome)
}

/// Build the invocation event from `--event=<json>` and `--sentry=<state>`
fn parse_event(cli_args: &HashMap<String, String>) -> anyhow::Result<InvocationEvent> {
    let mut event = match cli_args.get("event") {
        Some(raw) => serde_json::from_str::<InvocationEvent>(raw)
            .with_context(|| format!("--event is not a valid event: {raw}"))?,
        None => InvocationEvent::default(),
    };
    if let Some(sentry) = cli_args.get("sentry") {
        event.sentry = Some(sentry.clone());
    }
    Ok(event)
}

/// Print the outcome to stdout and map it to the exit code
fn report(outcome: &Outcome) -> ExitCode {
    match serde_json::to_string(outcome) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to render outcome: {e}"),
    }

    let summary = format!("{:?}: {}", outcome.status, outcome.detail);
    match outcome.status {
        OutcomeStatus::Success => eprintln!("{}", summary.green()),
        OutcomeStatus::Skipped => eprintln!("{}", summary.yellow()),
        OutcomeStatus::Error => eprintln!("{}", summary.red()),
    }

    if outcome.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
