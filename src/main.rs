use anyhow::Result;
use clap::Parser;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use statement_scope::models::Config;
use statement_scope::ui;

/// Interactive terminal viewer for financial statement data.
#[derive(Debug, Parser)]
#[command(name = "statement-scope", version)]
struct Cli {
    /// Override the statement API base URL (STATEMENT_API_BASE).
    #[arg(long)]
    base_url: Option<String>,

    /// Symbol to fetch on startup, e.g. AAPL.
    #[arg(long)]
    symbol: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Suppress most logs so stray output does not tear the TUI.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::ERROR)
        .with_env_filter("statement_scope=error")
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let cli = Cli::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(base_url) = cli.base_url {
        config.api_base = base_url;
    }

    if let Err(e) = ui::app::run(config, cli.symbol).await {
        eprintln!("TUI error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
