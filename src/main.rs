mod analyzer;
mod config;
mod dashboard;
mod domain;
mod error;
mod etherscan;
mod gemini;
mod logger;
mod render;
mod time;
mod units;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::{info, warn};

use crate::analyzer::NarrativeAnalyzer;
use crate::dashboard::{Dashboard, Workflow};
use crate::etherscan::EtherscanClient;
use crate::gemini::GeminiClient;

/// Look up an Ethereum wallet and summarize its recent activity.
#[derive(Debug, Parser)]
#[command(name = "ethersight", version)]
struct Cli {
    /// Wallet address (0x...)
    address: String,

    /// Etherscan API key; falls back to ETHERSCAN_API_KEY
    #[arg(long)]
    api_key: Option<String>,

    /// Print the final dashboard state as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load local .env if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let cfg = config::Config::from_env()?;
    logger::init_tracing(cfg.log_json);
    info!(?cfg, "boot");

    let ledger = EtherscanClient::new(cfg.etherscan_base_url.clone());
    let analyzer = NarrativeAnalyzer::new(GeminiClient::new(
        cfg.gemini_base_url.clone(),
        cfg.gemini_model.clone(),
        cfg.gemini_api_key.clone(),
    ));
    let dashboard = Dashboard::new(ledger, analyzer);

    let mut rx = dashboard.subscribe();
    let watcher = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let view = rx.borrow_and_update().clone();
            info!(
                generation = view.generation,
                state = view.workflow.label(),
                analyzing = view.workflow.is_analyzing(),
                "dashboard.view"
            );
        }
    });

    let credential = cli.api_key.or_else(|| cfg.etherscan_api_key.clone()).unwrap_or_default();
    dashboard.submit(&cli.address, &credential).await?;

    let view = dashboard.view();
    drop(dashboard);
    if let Err(e) = watcher.await {
        warn!(error = %e, "dashboard.watcher_failed");
    }

    if let Some(snapshot) = view.workflow.snapshot() {
        info!(address = %snapshot.address, transactions = snapshot.transactions.len(), "lookup.done");
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render::render_view(&view, cfg.tz));
    }

    if let Workflow::Error { message } = &view.workflow {
        bail!("lookup failed: {message}");
    }
    Ok(())
}
