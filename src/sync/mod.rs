pub mod dedup;
pub mod driver;
pub mod normalizer;

pub use dedup::DedupStore;
pub use driver::{StopReason, SyncCounters, SyncDriver, SyncReport, SyncState};
pub use normalizer::{Normalized, OrderNormalizer};
