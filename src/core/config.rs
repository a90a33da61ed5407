use anyhow::{bail, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_MARKETPLACE_URL: &str = "https://api.opensea.io/api/v1";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";
pub const DEFAULT_NFT_CONTRACT: &str = "0x54a88333F6e7540eA982261301309048aC431eD5";
pub const DEFAULT_MARKETPLACE_CONTRACT: &str = "0x9656448941C76B79A39BC4ad68f6fb9F01181EC7";
pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const DEFAULT_RETRY_LIMIT: u32 = 3;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct Config {
    pub marketplace: MarketplaceConfig,
    pub backend: BackendConfig,
    pub retry: RetryConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone)]
pub struct MarketplaceConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub nft_contract_address: String,
    pub page_size: usize,
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    /// Sent verbatim as `marketplaceContract` on every forwarded order.
    pub marketplace_contract: String,
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub retry_limit: u32,
    pub base_delay_ms: u64,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct MonitoringConfig {
    pub log_level: String,
}

impl RetryConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            marketplace: MarketplaceConfig {
                base_url: DEFAULT_MARKETPLACE_URL.to_string(),
                api_key: None,
                nft_contract_address: DEFAULT_NFT_CONTRACT.to_string(),
                page_size: DEFAULT_PAGE_SIZE,
            },
            backend: BackendConfig {
                base_url: DEFAULT_BACKEND_URL.to_string(),
                marketplace_contract: DEFAULT_MARKETPLACE_CONTRACT.to_string(),
            },
            retry: RetryConfig {
                retry_limit: DEFAULT_RETRY_LIMIT,
                base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
                request_timeout_secs: None,
            },
            monitoring: MonitoringConfig {
                log_level: "info".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let config = Config {
            marketplace: MarketplaceConfig {
                base_url: trim_url(
                    env::var("MARKETPLACE_BASE_URL")
                        .unwrap_or_else(|_| DEFAULT_MARKETPLACE_URL.to_string()),
                ),
                api_key: env::var("OPENSEA_API_KEY")
                    .ok()
                    .filter(|key| !key.trim().is_empty()),
                nft_contract_address: env::var("NFT_CONTRACT_ADDRESS")
                    .unwrap_or_else(|_| DEFAULT_NFT_CONTRACT.to_string()),
                page_size: env::var("PAGE_SIZE")
                    .unwrap_or_else(|_| DEFAULT_PAGE_SIZE.to_string())
                    .parse()
                    .unwrap_or(DEFAULT_PAGE_SIZE),
            },
            backend: BackendConfig {
                base_url: trim_url(
                    env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string()),
                ),
                marketplace_contract: env::var("MARKETPLACE_CONTRACT")
                    .unwrap_or_else(|_| DEFAULT_MARKETPLACE_CONTRACT.to_string()),
            },
            retry: RetryConfig {
                retry_limit: env::var("RETRY_LIMIT")
                    .unwrap_or_else(|_| DEFAULT_RETRY_LIMIT.to_string())
                    .parse()
                    .unwrap_or(DEFAULT_RETRY_LIMIT),
                base_delay_ms: env::var("RETRY_BASE_DELAY_MS")
                    .unwrap_or_else(|_| DEFAULT_RETRY_BASE_DELAY_MS.to_string())
                    .parse()
                    .unwrap_or(DEFAULT_RETRY_BASE_DELAY_MS),
                request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|secs| secs.parse().ok()),
            },
            monitoring: MonitoringConfig {
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// A zero page size would request the same offset forever.
    pub fn validate(&self) -> Result<()> {
        if self.marketplace.page_size == 0 {
            bail!("PAGE_SIZE must be greater than zero");
        }
        if self.marketplace.base_url.is_empty() || self.backend.base_url.is_empty() {
            bail!("marketplace and backend base URLs must not be empty");
        }
        Ok(())
    }
}

fn trim_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
