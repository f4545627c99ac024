//! Tallybook main entry point

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tallybook_api::start_server;
use tallybook_config::Config;
use tallybook_core::{MemoryStore, ReportService};
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "tallybook")]
#[command(author = "Tallybook Contributors")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight personal finance tracker with recurring-balance projection", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let rt = Runtime::new()?;

    rt.block_on(async {
        let config = Config::load(args.config.clone()).expect("Failed to load configuration");

        log::info!(
            "Config loaded: data path={}, ledger_file={}",
            config.data.path.to_string_lossy(),
            config.data.ledger_file
        );

        let store = Arc::new(MemoryStore::new());

        let data_path = config.data.path.join(&config.data.ledger_file);
        if data_path.exists() {
            match store.load_file(&data_path).await {
                Ok(count) => log::info!("Loaded {} user ledgers from {}", count, data_path.display()),
                Err(e) => log::error!("Failed to load ledger data: {}", e),
            }
        } else {
            log::warn!("Ledger data file not found: {}", data_path.display());
        }

        let service = ReportService::new(store, config.reports.max_concurrent_months);

        start_server(config, service).await
    })?;

    Ok(())
}
