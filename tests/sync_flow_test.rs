use async_trait::async_trait;
use nft_order_sync::api::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use nft_order_sync::core::Config;
use nft_order_sync::sync::{StopReason, SyncDriver};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Serves queued asset pages in order, then empty pages, and answers every
/// backend POST with a fixed acknowledgment. Records everything posted.
struct ScriptedMarket {
    pages: Mutex<VecDeque<Value>>,
    ack: Value,
    posted: Mutex<Vec<Value>>,
    page_requests: Mutex<Vec<String>>,
}

impl ScriptedMarket {
    fn new(pages: Vec<Value>, ack: Value) -> Arc<Self> {
        Arc::new(Self {
            pages: Mutex::new(pages.into()),
            ack,
            posted: Mutex::new(Vec::new()),
            page_requests: Mutex::new(Vec::new()),
        })
    }

    fn posted(&self) -> Vec<Value> {
        self.posted.lock().unwrap().clone()
    }

    fn page_requests(&self) -> Vec<String> {
        self.page_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedMarket {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        if request.method == Method::POST {
            self.posted
                .lock()
                .unwrap()
                .push(request.body.clone().unwrap_or(Value::Null));
            return Ok(HttpResponse::new(StatusCode::OK, self.ack.to_string()));
        }

        self.page_requests.lock().unwrap().push(request.url.clone());
        let page = self
            .pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| json!({ "assets": [] }));
        Ok(HttpResponse::new(StatusCode::OK, page.to_string()))
    }
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.marketplace.base_url = "http://market.test/api/v1".to_string();
    config.backend.base_url = "http://backend.test".to_string();
    config.backend.marketplace_contract = "0xproxy".to_string();
    config
}

fn valid_order(hash: &str, maker: &str) -> Value {
    json!({
        "order_hash": hash,
        "current_price": "1000000000000000000",
        "maker": { "address": maker },
        "protocol_data": {
            "parameters": { "offerer": maker, "zone": "0x0" },
            "signature": "0xsig"
        }
    })
}

#[tokio::test]
async fn three_asset_page_forwards_only_eligible_orders() {
    let page = json!({
        "assets": [
            { "token_id": "A", "image_url": "https://img/a.png", "sell_orders": [valid_order("0xa1", "0xalice")] },
            { "token_id": "B", "sell_orders": null },
            {
                "token_id": "C",
                "metadata": { "image": "ipfs://c" },
                "sell_orders": [
                    valid_order("0xc1", "0xcarol"),
                    { "order_hash": "0xc2", "maker": { "address": "0xcarol" }, "protocol_data": {} }
                ]
            }
        ]
    });
    let market = ScriptedMarket::new(vec![page], json!({ "success": true }));

    let mut driver = SyncDriver::new(&test_config(), market.clone());
    let report = driver.run().await;

    assert_eq!(report.stop_reason, StopReason::Exhausted);
    assert_eq!(report.counters.total_nft, 3);
    assert_eq!(report.counters.total_orders, 2);
    assert_eq!(report.counters.skipped_ineligible, 1);
    assert_eq!(report.counters.accepted, 2);

    let posted = market.posted();
    assert_eq!(posted.len(), 2);
    assert_eq!(posted[0]["tokenId"], "A");
    assert_eq!(posted[0]["price"], 1.0);
    assert_eq!(posted[0]["sellerAddress"], "0xalice");
    assert_eq!(posted[0]["image"], "https://img/a.png");
    assert_eq!(posted[0]["marketplaceContract"], "0xproxy");
    assert_eq!(posted[0]["seaportOrder"]["signature"], "0xsig");
    assert_eq!(posted[1]["tokenId"], "C");
    assert_eq!(posted[1]["image"], "ipfs://c");
}

#[tokio::test]
async fn duplicate_orders_across_pages_are_forwarded_once() {
    let first = json!({ "assets": [{ "token_id": "1", "sell_orders": [valid_order("0xdup", "0xm")] }] });
    let second = json!({
        "assets": [
            { "token_id": "1", "sell_orders": [valid_order("0xdup", "0xm")] },
            { "token_id": "2", "sell_orders": [valid_order("", "0xm"), valid_order("", "0xm")] }
        ]
    });
    let market = ScriptedMarket::new(vec![first, second], json!({ "success": true }));

    let mut driver = SyncDriver::new(&test_config(), market.clone());
    let report = driver.run().await;

    assert_eq!(report.counters.pages, 2);
    assert_eq!(report.counters.total_nft, 3);
    assert_eq!(report.counters.total_orders, 2);
    assert_eq!(report.counters.skipped_duplicates, 2);

    let hashes: Vec<Value> = market.posted().iter().map(|p| p["orderHash"].clone()).collect();
    assert_eq!(hashes, vec![json!("0xdup"), json!("2-0xm")]);
}

#[tokio::test]
async fn backend_rejection_does_not_abort_sync() {
    let page = json!({
        "assets": [
            { "token_id": "1", "sell_orders": [valid_order("0x1", "0xm")] },
            { "token_id": "2", "sell_orders": [valid_order("0x2", "0xm")] }
        ]
    });
    let market = ScriptedMarket::new(vec![page], json!({ "success": false, "reason": "x" }));

    let mut driver = SyncDriver::new(&test_config(), market.clone());
    let report = driver.run().await;

    assert_eq!(report.stop_reason, StopReason::Exhausted);
    assert_eq!(report.counters.total_orders, 2);
    assert_eq!(report.counters.rejected, 2);
    assert_eq!(report.counters.accepted, 0);
}

#[tokio::test]
async fn pagination_advances_by_page_size_until_empty() {
    let pages = (0..3)
        .map(|i| json!({ "assets": [{ "token_id": i.to_string() }] }))
        .collect();
    let market = ScriptedMarket::new(pages, json!({ "success": true }));

    let mut driver = SyncDriver::new(&test_config(), market.clone());
    let report = driver.run().await;

    let requests = market.page_requests();
    assert_eq!(requests.len(), 4);
    assert!(requests[0].contains("offset=0&limit=50"));
    assert!(requests[1].contains("offset=50&limit=50"));
    assert!(requests[2].contains("offset=100&limit=50"));
    assert!(requests[3].contains("offset=150&limit=50"));
    assert!(requests[0].contains("order_direction=desc"));
    assert_eq!(report.counters.total_nft, 3);
    assert_eq!(report.counters.total_orders, 0);
}

#[tokio::test]
async fn wrong_typed_asset_fields_do_not_drop_the_page() {
    let mut odd = valid_order("0x2", "0xm");
    odd["maker"] = json!(42);
    let page = json!({
        "assets": [
            { "token_id": "1", "sell_orders": [valid_order("0x1", "0xm")] },
            { "token_id": "2", "image_url": 12345, "sell_orders": [odd] },
            "not an asset"
        ]
    });
    let market = ScriptedMarket::new(vec![page], json!({ "success": true }));

    let mut driver = SyncDriver::new(&test_config(), market.clone());
    let report = driver.run().await;

    assert_eq!(report.stop_reason, StopReason::Exhausted);
    assert_eq!(report.counters.total_nft, 2);
    assert_eq!(report.counters.total_orders, 2);

    let posted = market.posted();
    assert_eq!(posted[1]["orderHash"], "0x2");
    assert!(posted[1]["image"].is_null());
    // maker unreadable, seller comes from the offerer
    assert_eq!(posted[1]["sellerAddress"], "0xm");
    assert_eq!(market.page_requests().len(), 2);
}
