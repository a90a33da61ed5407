pub mod backend;
pub mod fetcher;
pub mod marketplace;
pub mod transport;
pub mod types;

pub use backend::{ForwardOutcome, OrderForwarder};
pub use fetcher::{FetchError, ResilientFetcher, RetryPolicy};
pub use marketplace::{AssetPageReader, PageOutcome};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use types::*;
