use serde_json::Value;

use super::dedup::DedupStore;
use crate::api::types::{Asset, CanonicalOrderPayload, SellOrder};

/// Prices arrive in wei-style base units; 18 decimals is assumed for every order.
pub const BASE_UNITS_PER_TOKEN: f64 = 1e18;

pub const UNKNOWN_SELLER: &str = "unknown";

#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Payload(CanonicalOrderPayload),
    /// No usable `protocol_data.parameters`.
    Ineligible,
    Duplicate(String),
}

pub struct OrderNormalizer {
    dedup: DedupStore,
    marketplace_contract: String,
}

impl OrderNormalizer {
    pub fn new(marketplace_contract: impl Into<String>) -> Self {
        Self {
            dedup: DedupStore::new(),
            marketplace_contract: marketplace_contract.into(),
        }
    }

    pub fn dedup(&self) -> &DedupStore {
        &self.dedup
    }

    /// Forget every recorded key; called at the start of each run.
    pub fn reset(&mut self) {
        self.dedup = DedupStore::new();
    }

    /// The key is recorded before the payload is handed back, so a failed
    /// forward is never retried within the same run.
    pub fn normalize(&mut self, asset: &Asset, order: &SellOrder) -> Normalized {
        if order.parameters().is_none() {
            return Normalized::Ineligible;
        }

        let key = dedup_key(asset, order);
        if self.dedup.has(&key) {
            tracing::info!("⏭ Skipped duplicate order {}", key);
            return Normalized::Duplicate(key);
        }
        self.dedup.record(key.clone());

        Normalized::Payload(CanonicalOrderPayload {
            token_id: asset.token_id.clone(),
            price: price_from_base_units(order.current_price.as_ref()),
            seller_address: seller_address(order),
            seaport_order: order.protocol_data.clone().unwrap_or(Value::Null),
            order_hash: key,
            image: asset.image(),
            marketplace_contract: self.marketplace_contract.clone(),
        })
    }
}

pub fn dedup_key(asset: &Asset, order: &SellOrder) -> String {
    match order.order_hash() {
        Some(hash) => hash.to_string(),
        None => format!(
            "{}-{}",
            asset.token_id,
            order.maker_address().unwrap_or(UNKNOWN_SELLER)
        ),
    }
}

pub fn seller_address(order: &SellOrder) -> String {
    order
        .maker_address()
        .or_else(|| order.offerer())
        .unwrap_or(UNKNOWN_SELLER)
        .to_string()
}

pub fn price_from_base_units(raw: Option<&Value>) -> f64 {
    let base_units = match raw {
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    };

    match base_units {
        Some(units) if units.is_finite() => units / BASE_UNITS_PER_TOKEN,
        _ => 0.0,
    }
}
