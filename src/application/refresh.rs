// Refresh scheduling - periodic fetch-then-compose cycles while following
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;

use crate::application::chart_composer::SeriesId;
use crate::application::zoom::ZoomController;
use crate::domain::chart::ChartDescription;
use crate::error::FetchError;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Result of one refresh or reload cycle: the chart to draw (absent when
/// the cycle went stale or the chart is pinned) and the per-series
/// failures to report, one entry per occurrence.
#[derive(Debug)]
pub struct TickOutcome {
    pub chart: Option<ChartDescription>,
    pub failures: Vec<(SeriesId, FetchError)>,
}

impl TickOutcome {
    fn skipped() -> Self {
        Self {
            chart: None,
            failures: Vec::new(),
        }
    }
}

/// Cooperative refresh driver. It owns no timer itself; the event loop
/// invokes `tick` on the configured interval while the chart follows.
pub struct RefreshScheduler {
    interval: Duration,
}

impl RefreshScheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// One scheduled refresh: no-op while pinned, otherwise re-anchor the
    /// window to "now" and run a full cycle.
    pub async fn tick(&self, zoom: &mut ZoomController) -> TickOutcome {
        if !zoom.is_following() {
            return TickOutcome::skipped();
        }
        self.tick_at(zoom, Utc::now().timestamp()).await
    }

    pub async fn tick_at(&self, zoom: &mut ZoomController, now_sec: i64) -> TickOutcome {
        zoom.follow_to(now_sec);
        let issued = zoom.generation();
        self.run_cycle(zoom, issued).await
    }

    /// Fetch the current window for every series regardless of mode, e.g.
    /// after the user picked a window or added an item while pinned.
    pub async fn reload(&self, zoom: &mut ZoomController) -> TickOutcome {
        let issued = zoom.generation();
        self.run_cycle(zoom, issued).await
    }

    /// Run all fetch cycles concurrently and wait for every one to settle
    /// before composing; composing against a half-updated set would render
    /// time-misaligned series. Series whose metadata cannot be resolved
    /// are removed from the chart. The cycle yields no chart when `issued`
    /// has been superseded by a pinning gesture.
    pub async fn run_cycle(&self, zoom: &mut ZoomController, issued: u64) -> TickOutcome {
        let results = join_all(
            zoom.composer_mut()
                .slots_mut()
                .map(|(id, fetcher)| async move { (id, fetcher.run_fetch_cycle().await) }),
        )
        .await;

        let mut failures = Vec::new();
        for (id, result) in results {
            if let Err(error) = result {
                tracing::warn!(series = ?id, error = %error, "fetch cycle failed");
                if error.is_fatal() {
                    zoom.composer_mut().remove_series(id);
                }
                failures.push((id, error));
            }
        }

        let chart = (zoom.generation() == issued).then(|| zoom.compose());
        TickOutcome { chart, failures }
    }
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_INTERVAL)
    }
}
