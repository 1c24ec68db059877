//! Forecast Desk - Main Entry Point
//!
//! Interactive terminal dashboard: fetches forecasting events, renders
//! cards, and drives the expert feedback flow from stdin commands.
//! Every failure path logs and returns to the prompt; nothing here is
//! fatal to the process.

use std::io::Write as _;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use forecast_desk::connectors::{ApiConfig, EventsApiClient};
use forecast_desk::experts::{ExpertProfile, JsonFileStorage, VerificationStore};
use forecast_desk::utils::init_telemetry;
use forecast_desk::view::{render, Dashboard};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file found or error loading it: {}", e);
    }

    init_telemetry();

    let config = ApiConfig::from_env();
    info!(base_url = %config.base_url, mode = ?config.mode, "Forecast Desk starting");

    let client = EventsApiClient::new(config);

    let storage_path = std::env::var("FORECAST_VERIFICATION_PATH")
        .unwrap_or_else(|_| "expert_verification.json".to_string());
    let store = VerificationStore::new(Box::new(JsonFileStorage::new(storage_path)))?;

    if store.current().is_expert() {
        info!("verified expert session restored");
    } else {
        info!("unverified session; feedback is disabled until an application is accepted");
    }

    let mut dashboard = Dashboard::new(client, store);

    match dashboard.refresh().await {
        Ok(()) => print_events(&dashboard),
        Err(e) => warn!(error = %e, "initial fetch failed; use `refresh` to retry"),
    }

    println!();
    println!("Commands: refresh | resolved | filter <category>|all | show <id>");
    println!("          predictions <id> | predict <id> | agree <id> | disagree <id>");
    println!("          confirm | cancel");
    println!("          apply <profile.json> | whoami | logout | quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if !handle_command(&mut dashboard, line.trim()).await {
            break;
        }
    }

    info!("Forecast Desk shutting down");
    Ok(())
}

/// Dispatches one command line. Returns false when the loop should end.
async fn handle_command(dashboard: &mut Dashboard, line: &str) -> bool {
    let (command, arg) = match line.split_once(' ') {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}

        "refresh" => match dashboard.refresh().await {
            Ok(()) => print_events(dashboard),
            Err(e) => println!("Fetch failed ({}). Try `refresh` again.", e),
        },

        "resolved" => match dashboard.load_resolved().await {
            Ok(events) => println!("{}", render::resolved_history(&events)),
            Err(e) => println!("Fetch failed ({}). Try `resolved` again.", e),
        },

        "filter" => {
            if arg.is_empty() || arg == "all" {
                dashboard.set_filter(None);
            } else {
                dashboard.set_filter(Some(arg.to_string()));
            }
            print_events(dashboard);
        }

        "show" => match dashboard.find_event(arg) {
            Some(event) => println!("{}", render::event_detail(event)),
            None => println!("Unknown event: {}", arg),
        },

        "predictions" => match dashboard.load_predictions(arg).await {
            Ok(predictions) => println!("{}", render::prediction_history(&predictions)),
            Err(e) => println!("Could not load predictions: {}", e),
        },

        "predict" => match dashboard.request_prediction(arg).await {
            Ok(event) => println!("{}", render::event_detail(&event)),
            Err(e) => println!("Prediction request failed: {}", e),
        },

        "agree" | "disagree" => {
            let agrees = command == "agree";
            match dashboard.begin_feedback(arg, agrees) {
                Ok(()) => println!(
                    "You chose to {} with event {}. Type `confirm` to submit or `cancel`.",
                    command, arg
                ),
                Err(e) => println!("Cannot submit feedback: {}", e),
            }
        }

        "confirm" => match dashboard.confirm_feedback().await {
            Ok(true) => {
                println!("Feedback submitted.");
                print_events(dashboard);
            }
            Ok(false) => println!("The service did not accept the feedback."),
            Err(e) => println!("Feedback failed: {}", e),
        },

        "cancel" => {
            if dashboard.cancel_feedback().is_some() {
                println!("Feedback canceled.");
            } else {
                println!("No feedback is awaiting confirmation.");
            }
        }

        "apply" => match read_profile(arg) {
            Ok(profile) => match dashboard.store().apply_profile(profile) {
                Ok(()) => println!("Application accepted. You can now submit feedback."),
                Err(e) => println!("Application rejected: {}", e),
            },
            Err(e) => println!("Could not read profile from {}: {}", arg, e),
        },

        "whoami" => {
            let verification = dashboard.store().current();
            match verification.profile() {
                Some(profile) => println!(
                    "Verified expert: {} <{}> ({})",
                    profile.name,
                    profile.email,
                    profile
                        .expertise
                        .iter()
                        .map(|e| e.label())
                        .collect::<Vec<_>>()
                        .join(", "),
                ),
                None => println!("Not a verified expert."),
            }
        }

        "logout" => match dashboard.store().logout() {
            Ok(()) => println!("Logged out. Feedback is disabled."),
            Err(e) => println!("Logout failed: {}", e),
        },

        "quit" | "exit" => return false,

        other => println!("Unknown command: {}", other),
    }

    true
}

fn read_profile(path: &str) -> anyhow::Result<ExpertProfile> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn print_events(dashboard: &Dashboard) {
    let events = dashboard.filtered_events();
    match dashboard.selected_category() {
        Some(category) => println!("{} event(s) in {}:", events.len(), category),
        None => println!("{} event(s):", events.len()),
    }
    for event in events {
        println!("{}", render::event_card(event));
    }
    let categories = dashboard.categories();
    if !categories.is_empty() {
        println!("Categories: {}", categories.join(", "));
    }
}
