use std::sync::Arc;

use super::fetcher::ResilientFetcher;
use super::transport::HttpRequest;
use super::types::{Asset, AssetPage};
use crate::core::config::MarketplaceConfig;

/// Result of reading one page. `Empty` and `Failed` both end a sync; they are
/// kept apart so the caller can tell end-of-data from a failed request.
#[derive(Debug, Clone)]
pub enum PageOutcome {
    Assets(Vec<Asset>),
    Empty,
    Failed(String),
}

impl PageOutcome {
    pub fn into_assets(self) -> Vec<Asset> {
        match self {
            PageOutcome::Assets(assets) => assets,
            PageOutcome::Empty | PageOutcome::Failed(_) => Vec::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PageOutcome::Failed(_))
    }
}

pub struct AssetPageReader {
    fetcher: Arc<ResilientFetcher>,
    config: MarketplaceConfig,
}

impl AssetPageReader {
    pub fn new(fetcher: Arc<ResilientFetcher>, config: MarketplaceConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn page_size(&self) -> usize {
        self.config.page_size
    }

    pub fn page_url(&self, offset: usize) -> String {
        format!(
            "{}/assets?asset_contract_address={}&order_direction=desc&offset={}&limit={}",
            self.config.base_url, self.config.nft_contract_address, offset, self.config.page_size
        )
    }

    pub async fn fetch_page(&self, offset: usize) -> PageOutcome {
        let mut request = HttpRequest::get(self.page_url(offset)).header("Accept", "application/json");
        if let Some(api_key) = &self.config.api_key {
            request = request.header("X-API-KEY", api_key);
        }

        let response = match self.fetcher.fetch(&request).await {
            Ok(response) => response,
            Err(e) => return PageOutcome::Failed(e.to_string()),
        };

        match AssetPage::from_json(&response.body) {
            Ok(page) if page.assets.is_empty() => PageOutcome::Empty,
            Ok(page) => PageOutcome::Assets(page.assets),
            Err(e) => {
                tracing::error!("❌ JSON parse error on assets page offset={}: {}", offset, e);
                PageOutcome::Failed(format!("invalid JSON: {}", e))
            }
        }
    }
}
