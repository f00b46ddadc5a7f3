// Incremental series fetcher - owns one item's query state and retained samples
use std::sync::Arc;

use chrono::Utc;

use crate::application::metric_repository::{HISTORY_PAGE_CAP, MetricRepository};
use crate::domain::item::{ItemMetadata, ItemReference};
use crate::domain::sample::Sample;
use crate::domain::window::{DEFAULT_SPAN_SECS, TimeWindow};
use crate::error::FetchError;

/// Fetches one item's history incrementally and keeps a bounded,
/// time-windowed series of samples. The retained series is mutated only
/// here; composers get a read-only slice.
pub struct SeriesFetcher {
    repository: Arc<dyn MetricRepository>,
    reference: ItemReference,
    metadata: Option<ItemMetadata>,
    retained: Vec<Sample>,
    window: TimeWindow,
    span_secs: i64,
}

impl SeriesFetcher {
    pub fn new(repository: Arc<dyn MetricRepository>, reference: ItemReference) -> Self {
        Self {
            repository,
            reference,
            metadata: None,
            retained: Vec::new(),
            window: TimeWindow::default(),
            span_secs: DEFAULT_SPAN_SECS,
        }
    }

    pub fn reference(&self) -> &ItemReference {
        &self.reference
    }

    pub fn metadata(&self) -> Option<&ItemMetadata> {
        self.metadata.as_ref()
    }

    pub fn retained(&self) -> &[Sample] {
        &self.retained
    }

    /// Resolve and cache item metadata. A second call is a no-op. Fails
    /// with `AmbiguousOrMissingItem` unless the backend matches exactly
    /// one item.
    pub async fn load_metadata(&mut self) -> Result<(), FetchError> {
        if self.metadata.is_some() {
            return Ok(());
        }
        let mut matched = self.repository.fetch_items(&self.reference).await?;
        if matched.len() != 1 {
            return Err(FetchError::AmbiguousOrMissingItem {
                reference: self.reference.clone(),
                matched: matched.len(),
            });
        }
        self.metadata = Some(matched.remove(0));
        Ok(())
    }

    /// Replace the active window. Without `keep_history` the retained
    /// series is discarded, so the next cycle refills from scratch.
    pub fn set_window(&mut self, window: TimeWindow, keep_history: bool) {
        if let Some(span) = window.span() {
            self.span_secs = span;
        }
        self.window = window;
        if !keep_history {
            self.retained.clear();
        }
    }

    /// Active span in seconds: the window's own extent when fully bounded,
    /// otherwise the last fully-bounded extent seen.
    pub fn time_span(&self) -> i64 {
        self.window.span().unwrap_or(self.span_secs)
    }

    /// Bring the series up to date with the backend: one retention trim,
    /// then paginated fetches until a short page arrives.
    pub async fn run_fetch_cycle(&mut self) -> Result<(), FetchError> {
        self.load_metadata().await?;
        self.trim_to_window();
        while self.load_next_batch().await? {}
        Ok(())
    }

    /// Fetch one page of history and append it. Returns whether another
    /// page is likely pending. Resuming past the last retained clock keeps
    /// every timestamp exactly-once across cycles, regardless of the
    /// window's begin.
    pub async fn load_next_batch(&mut self) -> Result<bool, FetchError> {
        let end_sec = self.window.end_sec.unwrap_or_else(|| Utc::now().timestamp());
        let begin_sec = match self.retained.last() {
            Some(last) => last.clock() + 1,
            None => self.window.begin_sec.unwrap_or(end_sec - self.time_span()),
        };
        let batch = self
            .repository
            .fetch_history(&self.reference, begin_sec, end_sec)
            .await?;
        tracing::debug!(
            item = %self.reference,
            begin_sec,
            end_sec,
            samples = batch.len(),
            "fetched history page"
        );
        self.retained.extend(batch.iter().map(|h| h.to_sample()));
        Ok(batch.len() == HISTORY_PAGE_CAP)
    }

    /// Drop leading samples that fell out of the retention span. One sample
    /// below the window's left edge is kept as an anchor when nothing would
    /// otherwise remain at or before the edge, so a line entering the
    /// window starts outside it instead of mid-air.
    fn trim_to_window(&mut self) {
        let end_sec = self.window.end_sec.unwrap_or_else(|| Utc::now().timestamp());
        let edge_ms = (end_sec - self.time_span()) * 1000;
        let cut = self.retained.partition_point(|s| s.time_ms < edge_ms);
        if cut == 0 {
            return;
        }
        let upto = match self.retained.get(cut) {
            Some(first_kept) if first_kept.time_ms == edge_ms => cut,
            _ => cut - 1,
        };
        self.retained.drain(..upto);
    }
}

#[cfg(test)]
impl SeriesFetcher {
    pub(crate) fn seeded(
        reference: ItemReference,
        metadata: Option<ItemMetadata>,
        retained: Vec<Sample>,
    ) -> Self {
        Self {
            repository: Arc::new(crate::application::testing::ScriptedRepository::new(
                Vec::new(),
            )),
            reference,
            metadata,
            retained,
            window: TimeWindow::default(),
            span_secs: DEFAULT_SPAN_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{history, metadata, reference, ScriptedRepository};

    fn fetcher(repository: Arc<ScriptedRepository>) -> SeriesFetcher {
        SeriesFetcher::new(repository, reference("1"))
    }

    #[tokio::test]
    async fn test_two_cycle_scenario() {
        let repository = Arc::new(ScriptedRepository::new(vec![metadata("CPU", "%")]));
        repository.queue_page(vec![history(10, 1.0), history(20, 2.0), history(30, 3.0)]);
        let mut fetcher = fetcher(repository.clone());
        fetcher.set_window(TimeWindow::absolute(0, 100), false);

        fetcher.run_fetch_cycle().await.unwrap();
        let expected = vec![
            Sample::new(10_000, 1.0),
            Sample::new(20_000, 2.0),
            Sample::new(30_000, 3.0),
        ];
        assert_eq!(fetcher.retained(), expected.as_slice());

        // Second cycle finds nothing new and leaves the series content-equal.
        fetcher.run_fetch_cycle().await.unwrap();
        assert_eq!(fetcher.retained(), expected.as_slice());

        let calls = repository.history_calls();
        assert_eq!(calls, vec![(0, 100), (31, 100)]);
    }

    #[tokio::test]
    async fn test_full_page_triggers_followup_fetch() {
        let repository = Arc::new(ScriptedRepository::new(vec![metadata("CPU", "%")]));
        repository.queue_page((0..1000).map(|c| history(c, 0.5)).collect());
        repository.queue_page(vec![history(1000, 0.5), history(1001, 0.5)]);
        let mut fetcher = fetcher(repository.clone());
        fetcher.set_window(TimeWindow::absolute(0, 2000), false);

        fetcher.run_fetch_cycle().await.unwrap();
        assert_eq!(fetcher.retained().len(), 1002);
        let calls = repository.history_calls();
        assert_eq!(calls, vec![(0, 2000), (1000, 2000)]);
    }

    #[tokio::test]
    async fn test_retained_timestamps_monotonic() {
        let repository = Arc::new(ScriptedRepository::new(vec![metadata("CPU", "%")]));
        repository.queue_page(vec![history(10, 1.0), history(20, 2.0)]);
        repository.queue_page(vec![history(25, 3.0)]);
        let mut fetcher = fetcher(repository);
        fetcher.set_window(TimeWindow::absolute(0, 100), false);

        fetcher.run_fetch_cycle().await.unwrap();
        fetcher.run_fetch_cycle().await.unwrap();
        let stamps: Vec<i64> = fetcher.retained().iter().map(|s| s.time_ms).collect();
        let mut sorted = stamps.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(stamps, sorted);
    }

    #[tokio::test]
    async fn test_metadata_resolution_must_be_unique() {
        let repository = Arc::new(ScriptedRepository::new(Vec::new()));
        let mut missing = fetcher(repository);
        match missing.load_metadata().await {
            Err(FetchError::AmbiguousOrMissingItem { matched, .. }) => assert_eq!(matched, 0),
            other => panic!("expected resolution failure, got {other:?}"),
        }

        let repository = Arc::new(ScriptedRepository::new(vec![
            metadata("CPU", "%"),
            metadata("CPU", "%"),
        ]));
        let mut ambiguous = fetcher(repository);
        match ambiguous.load_metadata().await {
            Err(FetchError::AmbiguousOrMissingItem { matched, .. }) => assert_eq!(matched, 2),
            other => panic!("expected resolution failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_metadata_load_is_idempotent() {
        let repository = Arc::new(ScriptedRepository::new(vec![metadata("CPU", "%")]));
        let mut fetcher = fetcher(repository.clone());
        fetcher.load_metadata().await.unwrap();
        fetcher.load_metadata().await.unwrap();
        assert_eq!(repository.item_calls(), 1);
        assert_eq!(fetcher.metadata().unwrap().brief, "CPU");
    }

    #[tokio::test]
    async fn test_transport_failure_leaves_retained_untouched() {
        let repository = Arc::new(ScriptedRepository::new(vec![metadata("CPU", "%")]));
        repository.queue_page(vec![history(10, 1.0)]);
        repository.queue_error(FetchError::Transport(anyhow::anyhow!("backend down")));
        let mut fetcher = fetcher(repository);
        fetcher.set_window(TimeWindow::absolute(0, 100), false);

        fetcher.run_fetch_cycle().await.unwrap();
        let before = fetcher.retained().to_vec();
        let result = fetcher.run_fetch_cycle().await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
        assert_eq!(fetcher.retained(), before.as_slice());
    }

    #[test]
    fn test_trim_keeps_boundary_anchor() {
        let mut fetcher = SeriesFetcher::seeded(
            reference("1"),
            Some(metadata("CPU", "%")),
            vec![
                Sample::new(10_000, 1.0),
                Sample::new(50_000, 2.0),
                Sample::new(150_000, 3.0),
            ],
        );
        fetcher.set_window(TimeWindow::absolute(100, 200), true);
        fetcher.trim_to_window();
        // One point below the 100s edge survives as the line's anchor.
        assert_eq!(
            fetcher.retained(),
            &[Sample::new(50_000, 2.0), Sample::new(150_000, 3.0)]
        );
    }

    #[test]
    fn test_trim_drops_anchor_when_point_sits_on_edge() {
        let mut fetcher = SeriesFetcher::seeded(
            reference("1"),
            Some(metadata("CPU", "%")),
            vec![
                Sample::new(10_000, 1.0),
                Sample::new(100_000, 2.0),
                Sample::new(150_000, 3.0),
            ],
        );
        fetcher.set_window(TimeWindow::absolute(100, 200), true);
        fetcher.trim_to_window();
        assert_eq!(
            fetcher.retained(),
            &[Sample::new(100_000, 2.0), Sample::new(150_000, 3.0)]
        );
    }

    #[test]
    fn test_trim_never_empties_the_series() {
        let mut fetcher = SeriesFetcher::seeded(
            reference("1"),
            Some(metadata("CPU", "%")),
            vec![Sample::new(10_000, 1.0), Sample::new(20_000, 2.0)],
        );
        fetcher.set_window(TimeWindow::absolute(100, 200), true);
        fetcher.trim_to_window();
        assert_eq!(fetcher.retained(), &[Sample::new(20_000, 2.0)]);
    }

    #[test]
    fn test_set_window_discards_history_unless_kept() {
        let mut fetcher = SeriesFetcher::seeded(
            reference("1"),
            Some(metadata("CPU", "%")),
            vec![Sample::new(10_000, 1.0)],
        );
        fetcher.set_window(TimeWindow::absolute(0, 7200), true);
        assert_eq!(fetcher.retained().len(), 1);
        fetcher.set_window(TimeWindow::absolute(0, 7200), false);
        assert!(fetcher.retained().is_empty());
    }

    #[test]
    fn test_time_span_memoizes_last_bounded_window() {
        let mut fetcher = SeriesFetcher::seeded(reference("1"), None, Vec::new());
        assert_eq!(fetcher.time_span(), DEFAULT_SPAN_SECS);
        fetcher.set_window(TimeWindow::absolute(0, 7200), true);
        assert_eq!(fetcher.time_span(), 7200);
        fetcher.set_window(
            TimeWindow {
                begin_sec: None,
                end_sec: None,
            },
            true,
        );
        assert_eq!(fetcher.time_span(), 7200);
    }
}
