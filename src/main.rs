//! Command-line entry point for the documentation QA backend.
//!
//! `docs-qa-backend "<question>"` answers one question; `--check` runs the
//! lightweight index connectivity probe. Configuration comes from the
//! environment (optionally a `.env` file) and is validated before any
//! client is built.

use std::{env, error::Error, process};

use doc_index::SearchIndexClient;
use qa_gateway::{Pipeline, QaConfig};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A .env file is a local-development convenience only.
    let _ = dotenvy::dotenv();

    let filter = llm_service::telemetry::env_filter_with_level("info", Level::INFO);
    tracing_subscriber::registry()
        .with(filter)
        .with(llm_service::telemetry::fmt_layer())
        .init();

    let argument = env::args().nth(1);

    let cfg = match QaConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("configuration error: {err}");
            process::exit(2);
        }
    };

    match argument.as_deref() {
        Some("--check") => {
            let client = SearchIndexClient::new(cfg.search.clone())?;
            match client.total_count().await {
                Ok(0) => println!("index reachable, but it contains no documents"),
                Ok(total) => println!("index reachable; {total} searchable documents"),
                Err(err) => {
                    eprintln!("index check failed: {err}");
                    process::exit(1);
                }
            }
        }
        Some(question) if !question.trim().is_empty() => {
            let pipeline = Pipeline::from_config(&cfg)?;
            let answer = pipeline.ask(question).await;
            println!("{answer}");
        }
        _ => {
            eprintln!("usage: docs-qa-backend \"<question>\" | --check");
            process::exit(2);
        }
    }

    Ok(())
}
