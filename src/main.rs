use anyhow::Result;
use std::sync::Arc;

use nft_order_sync::api::ReqwestTransport;
use nft_order_sync::core::{logging, Config};
use nft_order_sync::sync::{StopReason, SyncDriver};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    logging::init_logging(&config.monitoring.log_level);

    tracing::info!("🚀 NFT order sync starting...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Contract: {} → backend {}",
        config.marketplace.nft_contract_address,
        config.backend.base_url
    );

    if let Err(e) = run(&config).await {
        tracing::error!("💀 FATAL ERROR: {:#}", e);
        return Err(e);
    }

    Ok(())
}

async fn run(config: &Config) -> Result<()> {
    let transport = Arc::new(ReqwestTransport::new(config.retry.request_timeout())?);
    let mut driver = SyncDriver::new(config, transport);

    let report = driver.run().await;
    if report.stop_reason == StopReason::FetchFailed {
        tracing::warn!(
            "Sync ended on a failed page request after {} pages; later pages were not scanned",
            report.counters.pages
        );
    }
    tracing::info!(
        "Forward results: {} accepted, {} rejected, {} malformed, {} dropped, {} duplicates skipped",
        report.counters.accepted,
        report.counters.rejected,
        report.counters.malformed,
        report.counters.dropped,
        report.counters.skipped_duplicates
    );

    Ok(())
}
