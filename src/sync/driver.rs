use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::normalizer::{Normalized, OrderNormalizer};
use crate::api::{
    Asset, AssetPageReader, ForwardOutcome, HttpTransport, OrderForwarder, PageOutcome,
    ResilientFetcher, RetryPolicy,
};
use crate::core::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Running,
    DrainingPage { offset: usize },
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A page came back with no assets.
    Exhausted,
    /// A page request failed or returned unreadable JSON.
    FetchFailed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncCounters {
    pub total_nft: u64,
    pub total_orders: u64,
    pub pages: u64,
    pub skipped_duplicates: u64,
    pub skipped_ineligible: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub malformed: u64,
    pub dropped: u64,
}

impl SyncCounters {
    fn record_forward(&mut self, outcome: &ForwardOutcome) {
        match outcome {
            ForwardOutcome::Accepted => self.accepted += 1,
            ForwardOutcome::Rejected(_) => self.rejected += 1,
            ForwardOutcome::Malformed => self.malformed += 1,
            ForwardOutcome::Dropped => self.dropped += 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyncReport {
    pub counters: SyncCounters,
    pub stop_reason: StopReason,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

/// Walks the marketplace page by page and forwards every new sell order.
/// Everything is awaited in order; there is never more than one request in flight.
pub struct SyncDriver {
    reader: AssetPageReader,
    normalizer: OrderNormalizer,
    forwarder: OrderForwarder,
    state: SyncState,
    counters: SyncCounters,
}

impl SyncDriver {
    pub fn new(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        let fetcher = Arc::new(ResilientFetcher::new(
            transport,
            RetryPolicy::from(&config.retry),
        ));

        Self {
            reader: AssetPageReader::new(fetcher.clone(), config.marketplace.clone()),
            normalizer: OrderNormalizer::new(config.backend.marketplace_contract.clone()),
            forwarder: OrderForwarder::new(fetcher, &config.backend.base_url),
            state: SyncState::Running,
            counters: SyncCounters::default(),
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn counters(&self) -> &SyncCounters {
        &self.counters
    }

    pub async fn run(&mut self) -> SyncReport {
        tracing::info!("🚀 Order sync started");
        let started_at = Utc::now();
        let start = Instant::now();
        let page_size = self.reader.page_size();
        let mut offset = 0;

        self.state = SyncState::Running;
        self.counters = SyncCounters::default();
        self.normalizer.reset();

        let stop_reason = loop {
            self.state = SyncState::DrainingPage { offset };
            tracing::info!("📦 Loading assets... offset={}", offset);
            let batch_start = Instant::now();

            let assets = match self.reader.fetch_page(offset).await {
                PageOutcome::Assets(assets) => assets,
                PageOutcome::Empty => {
                    tracing::info!("⏹ No more assets.");
                    break StopReason::Exhausted;
                }
                PageOutcome::Failed(reason) => {
                    tracing::warn!("⏹ Stopping at offset={} after failed page: {}", offset, reason);
                    break StopReason::FetchFailed;
                }
            };

            self.process_page(&assets).await;
            self.counters.pages += 1;

            tracing::info!(
                "⏳ Batch completed in {:.1}s.",
                batch_start.elapsed().as_secs_f64()
            );
            offset += page_size;
        };

        self.state = SyncState::Finished;
        let elapsed = start.elapsed();

        tracing::info!("🎉 SYNC FINISHED");
        tracing::info!("📌 Total NFT scanned: {}", self.counters.total_nft);
        tracing::info!("📌 Total orders sent: {}", self.counters.total_orders);
        tracing::info!(
            "⏱ Total time: {:.2}s (started {})",
            elapsed.as_secs_f64(),
            started_at.to_rfc3339()
        );

        SyncReport {
            counters: self.counters.clone(),
            stop_reason,
            started_at,
            elapsed,
        }
    }

    async fn process_page(&mut self, assets: &[Asset]) {
        for asset in assets {
            self.counters.total_nft += 1;

            for order in asset.sell_orders() {
                let payload = match self.normalizer.normalize(asset, order) {
                    Normalized::Payload(payload) => payload,
                    Normalized::Ineligible => {
                        self.counters.skipped_ineligible += 1;
                        continue;
                    }
                    Normalized::Duplicate(_) => {
                        self.counters.skipped_duplicates += 1;
                        continue;
                    }
                };

                self.counters.total_orders += 1;
                let outcome = self.forwarder.forward(&payload).await;
                self.counters.record_forward(&outcome);
            }
        }
    }
}
