//! Pattern discovery command line tool.
//!
//! Reads a JSON document of sequences, runs discovery with element
//! equality and prints the resulting corpus as JSON.
//!
//! ## Input
//!
//! ```json
//! { "sequences": [[1, 2, 3, 4], [1, 2, 3, 4]], "policy": { ... } }
//! ```
//!
//! `policy` is optional and defaults to [`DiscoveryPolicy::default`].
//! Elements may be any JSON value.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (default: prnet=info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: json)
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin prnet_discover -- sequences.json
//! cat sequences.json | cargo run --bin prnet_discover
//! ```

use std::fs;
use std::io::{self, Read};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use prnet::{equality, find_patterns_with, DiscoveryPolicy, PatternRecord};

#[derive(Debug, Deserialize)]
struct DiscoveryInput {
    sequences: Vec<Vec<Value>>,
    #[serde(default)]
    policy: DiscoveryPolicy,
}

#[derive(Debug, Serialize)]
struct DiscoveryOutput {
    policy_id: String,
    params_hash: String,
    fingerprint: String,
    patterns: Vec<PatternRecord<Value>>,
}

/// Initialize the tracing subscriber with JSON or pretty format.
/// Logs go to stderr so stdout carries only the corpus.
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "prnet=info".into());

    if log_format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_current_span(true)
                    .flatten_event(true),
            )
            .init();
    }
}

fn read_input(path: Option<String>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let path = std::env::args().nth(1);
    let raw = read_input(path)?;
    let input: DiscoveryInput = serde_json::from_str(&raw)?;

    info!(
        sequences = input.sequences.len(),
        policy = input.policy.policy_id(),
        "starting discovery"
    );

    let corpus = find_patterns_with(&input.policy, equality::<Value>(), &input.sequences);

    let output = DiscoveryOutput {
        policy_id: input.policy.policy_id().to_string(),
        params_hash: input.policy.params_hash(),
        fingerprint: corpus.fingerprint(),
        patterns: corpus.records(),
    };

    info!(
        patterns = output.patterns.len(),
        fingerprint = %output.fingerprint,
        "discovery complete"
    );

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
