// Repository trait for backend metric access
use crate::domain::item::{ItemMetadata, ItemReference};
use crate::domain::sample::HistorySample;
use crate::error::FetchError;
use async_trait::async_trait;

/// Server-side page cap on history requests. A full page means more data
/// is almost certainly pending.
pub const HISTORY_PAGE_CAP: usize = 1000;

#[async_trait]
pub trait MetricRepository: Send + Sync {
    /// Resolve every backend item matching a reference. Callers enforce
    /// the exactly-one contract.
    async fn fetch_items(
        &self,
        reference: &ItemReference,
    ) -> Result<Vec<ItemMetadata>, FetchError>;

    /// Fetch history samples within `[begin_sec, end_sec]`, oldest first,
    /// at most `HISTORY_PAGE_CAP` per call.
    async fn fetch_history(
        &self,
        reference: &ItemReference,
        begin_sec: i64,
        end_sec: i64,
    ) -> Result<Vec<HistorySample>, FetchError>;
}
