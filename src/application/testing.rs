// Shared test doubles for the application layer
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::metric_repository::MetricRepository;
use crate::domain::item::{ItemMetadata, ItemReference, ValueType};
use crate::domain::sample::HistorySample;
use crate::error::FetchError;

/// Scripted in-memory backend: canned item matches plus a queue of history
/// pages consumed one per call. An exhausted queue serves empty pages.
pub(crate) struct ScriptedRepository {
    items: Vec<ItemMetadata>,
    pages: Mutex<Vec<Result<Vec<HistorySample>, FetchError>>>,
    history_calls: Mutex<Vec<(i64, i64)>>,
    item_calls: Mutex<usize>,
}

impl ScriptedRepository {
    pub(crate) fn new(items: Vec<ItemMetadata>) -> Self {
        Self {
            items,
            pages: Mutex::new(Vec::new()),
            history_calls: Mutex::new(Vec::new()),
            item_calls: Mutex::new(0),
        }
    }

    pub(crate) fn queue_page(&self, samples: Vec<HistorySample>) {
        self.pages.lock().unwrap().push(Ok(samples));
    }

    pub(crate) fn queue_error(&self, error: FetchError) {
        self.pages.lock().unwrap().push(Err(error));
    }

    pub(crate) fn history_calls(&self) -> Vec<(i64, i64)> {
        self.history_calls.lock().unwrap().clone()
    }

    pub(crate) fn item_calls(&self) -> usize {
        *self.item_calls.lock().unwrap()
    }
}

#[async_trait]
impl MetricRepository for ScriptedRepository {
    async fn fetch_items(
        &self,
        _reference: &ItemReference,
    ) -> Result<Vec<ItemMetadata>, FetchError> {
        *self.item_calls.lock().unwrap() += 1;
        Ok(self.items.clone())
    }

    async fn fetch_history(
        &self,
        _reference: &ItemReference,
        begin_sec: i64,
        end_sec: i64,
    ) -> Result<Vec<HistorySample>, FetchError> {
        self.history_calls.lock().unwrap().push((begin_sec, end_sec));
        let mut pages = self.pages.lock().unwrap();
        if pages.is_empty() {
            Ok(Vec::new())
        } else {
            pages.remove(0)
        }
    }
}

pub(crate) fn reference(item_id: &str) -> ItemReference {
    ItemReference::new(
        "server1".to_string(),
        "host1".to_string(),
        item_id.to_string(),
    )
}

pub(crate) fn metadata(brief: &str, unit: &str) -> ItemMetadata {
    metadata_on(brief, unit, "server1", "host1")
}

pub(crate) fn metadata_on(brief: &str, unit: &str, server: &str, host: &str) -> ItemMetadata {
    ItemMetadata {
        brief: brief.to_string(),
        unit: unit.to_string(),
        value_type: ValueType::Numeric,
        server: server.to_string(),
        host: host.to_string(),
    }
}

pub(crate) fn integer_metadata(brief: &str, unit: &str) -> ItemMetadata {
    ItemMetadata {
        value_type: ValueType::Integer,
        ..metadata(brief, unit)
    }
}

pub(crate) fn history(clock: i64, value: f64) -> HistorySample {
    HistorySample::new(clock, 0, value)
}
