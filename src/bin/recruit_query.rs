// ABOUTME: recruit-query CLI - run one orchestrated request against the backend
// ABOUTME: Prints the decoded envelope as JSON on stdout and alerts on stderr
//
// SPDX-License-Identifier: MIT OR Apache-2.0
//!
//! Usage:
//! ```bash
//! # Read a page of athletes, composing a filter with the shared one
//! recruit-query get /athletes --filter "sport;baseball" --page 2 --limit 20
//!
//! # Create a record and show a success alert
//! recruit-query create /events --body '{"name": "Spring Showcase"}' --success-message "Event created"
//!
//! # Delete with a reason in the request body
//! recruit-query delete /posts/17 --body '{"reason": "dup"}'
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use recruit_query::config::ClientConfig;
use recruit_query::logging::LoggingConfig;
use recruit_query::notifications::AlertQueue;
use recruit_query::orchestrator::{MutationConfig, MutationInput, ReadConfig, RequestOrchestrator};
use recruit_query::query::QueryDefaults;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "recruit-query",
    about = "Run orchestrated requests against the recruiting backend",
    long_about = "Runs one read or mutation through the request orchestrator: layered query defaults, payload decryption, alerts and cache invalidation."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Backend base URL override
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Payload key override (base64 encoded)
    #[arg(long, global = true)]
    payload_key: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Read a resource with query parameters
    Get {
        /// Resource path or absolute URL
        resource: String,
        /// Search keyword
        #[arg(long)]
        keyword: Option<String>,
        /// Page number
        #[arg(long)]
        page: Option<u32>,
        /// Page size
        #[arg(long)]
        limit: Option<u32>,
        /// Filter expression, e.g. `isActive;true`
        #[arg(long)]
        filter: Option<String>,
        /// Sort expression, e.g. `createdAt;desc`
        #[arg(long)]
        sort: Option<String>,
        /// Related entities to include
        #[arg(long)]
        include: Option<String>,
    },
    /// Create a record (POST)
    Create(MutationArgs),
    /// Update a record (PUT)
    Update(MutationArgs),
    /// Delete a record (DELETE, body in the request body)
    Delete(MutationArgs),
}

#[derive(Args)]
struct MutationArgs {
    /// Resource path or absolute URL
    resource: String,
    /// JSON request body
    #[arg(long)]
    body: Option<String>,
    /// Alert shown on success
    #[arg(long)]
    success_message: Option<String>,
}

impl MutationArgs {
    fn config(&self) -> MutationConfig {
        let config = MutationConfig::for_resource(&self.resource);
        match &self.success_message {
            Some(message) => config.success_message(message),
            None => config,
        }
    }

    fn input(&self) -> Result<MutationInput> {
        let Some(raw) = &self.body else {
            return Ok(MutationInput::default());
        };
        let body: Value = serde_json::from_str(raw).context("--body must be valid JSON")?;
        Ok(MutationInput::with_body(body))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging.level = "debug".into();
    }
    logging.init()?;

    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.http.base_url = base_url;
    }
    if let Some(key) = cli.payload_key {
        config.payload_key = Some(key);
    }
    info!(base_url = %config.http.base_url, "Using backend");

    let alerts = Arc::new(AlertQueue::new());
    let orchestrator = RequestOrchestrator::configured(&config)?
        .alerts(alerts.clone())
        .build()?;

    let result = match cli.command {
        Command::Get {
            resource,
            keyword,
            page,
            limit,
            filter,
            sort,
            include,
        } => {
            let defaults = QueryDefaults {
                keyword,
                page_number: page,
                page_limit: limit,
                filter,
                sort,
                include,
            };
            let read = ReadConfig::new(resource.clone(), resource).defaults(defaults);
            orchestrator.read(&read, None).await
        }
        Command::Create(args) => orchestrator.create(&args.config(), args.input()?, None).await,
        Command::Update(args) => orchestrator.update(&args.config(), args.input()?, None).await,
        Command::Delete(args) => orchestrator.delete(&args.config(), args.input()?, None).await,
    };

    for alert in alerts.drain() {
        eprintln!("[{:?}] {}", alert.kind, alert.message);
    }

    let envelope = result?;
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}
