use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of `GET /assets`. Only a body that is not JSON at all is an error;
/// a missing `assets` field reads as an empty page.
#[derive(Debug, Clone, Default)]
pub struct AssetPage {
    pub assets: Vec<Asset>,
}

impl AssetPage {
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let page: Value = serde_json::from_str(body)?;
        let assets = match page.get("assets") {
            Some(Value::Array(items)) => items.iter().filter_map(lenient_element).collect(),
            _ => Vec::new(),
        };
        Ok(Self { assets })
    }
}

// Wrong-typed fields read as absent so one odd listing never sinks its page.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default, deserialize_with = "string_or_number")]
    pub token_id: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub sell_orders: Option<Vec<SellOrder>>,
    #[serde(default, deserialize_with = "lenient")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SellOrder {
    #[serde(default, deserialize_with = "lenient")]
    pub order_hash: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub maker: Option<Account>,
    /// Integer amount in base units, usually a string.
    #[serde(default)]
    pub current_price: Option<Value>,
    #[serde(default)]
    pub protocol_data: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Account {
    #[serde(default, deserialize_with = "lenient")]
    pub address: Option<String>,
}

/// Normalized order as accepted by the backend `POST /order` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalOrderPayload {
    pub token_id: String,
    pub price: f64,
    pub seller_address: String,
    pub seaport_order: Value,
    pub order_hash: String,
    pub image: Option<String>,
    pub marketplace_contract: String,
}

impl Asset {
    pub fn sell_orders(&self) -> &[SellOrder] {
        self.sell_orders.as_deref().unwrap_or(&[])
    }

    /// `image_url`, then `metadata.image`.
    pub fn image(&self) -> Option<String> {
        non_empty(self.image_url.as_deref())
            .or_else(|| {
                self.metadata
                    .as_ref()
                    .and_then(|metadata| metadata.get("image"))
                    .and_then(Value::as_str)
                    .and_then(|image| non_empty(Some(image)))
            })
            .map(str::to_string)
    }
}

impl SellOrder {
    pub fn order_hash(&self) -> Option<&str> {
        non_empty(self.order_hash.as_deref())
    }

    pub fn maker_address(&self) -> Option<&str> {
        non_empty(self.maker.as_ref().and_then(|maker| maker.address.as_deref()))
    }

    /// `protocol_data.parameters`, only when present and non-empty.
    pub fn parameters(&self) -> Option<&Value> {
        let parameters = self.protocol_data.as_ref()?.get("parameters")?;
        let empty = match parameters {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::String(s) => s.is_empty(),
            Value::Bool(b) => !b,
            Value::Number(_) => false,
        };
        (!empty).then_some(parameters)
    }

    pub fn offerer(&self) -> Option<&str> {
        non_empty(self.parameters()?.get("offerer")?.as_str())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

fn lenient_element<T: DeserializeOwned>(value: &Value) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(item) => Some(item),
        Err(e) => {
            tracing::debug!("Skipping unreadable listing entry: {}", e);
            None
        }
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(items.iter().filter_map(lenient_element).collect()),
        _ => None,
    })
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
