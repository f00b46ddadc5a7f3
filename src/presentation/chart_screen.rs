// Chart screen facade - wires picker, gestures, and the refresh loop
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::application::metric_repository::MetricRepository;
use crate::application::refresh::{RefreshScheduler, TickOutcome};
use crate::application::series_fetcher::SeriesFetcher;
use crate::application::zoom::ZoomController;
use crate::domain::item::ItemReference;
use crate::domain::window::TimeWindow;
use crate::presentation::surfaces::{FailureNotifier, RenderSurface, WindowWidget};

/// Inbound events from the item picker, the drawn chart, and the
/// window-selection widget.
#[derive(Debug)]
pub enum ChartEvent {
    ItemAppended(ItemReference),
    ItemRemoved(ItemReference),
    SelectionDrag { from_sec: i64, to_sec: i64 },
    ResetGesture,
    WindowSelected { window: TimeWindow, keep_history: bool },
    Pause,
    Resume,
}

/// Ties the chart engine to its collaborators: a rendering surface, a
/// window widget to keep in sync, and a failure notifier. All state
/// mutation happens on the single task driving `handle`/`run`.
pub struct ChartScreen<R, W, N> {
    repository: Arc<dyn MetricRepository>,
    zoom: ZoomController,
    scheduler: RefreshScheduler,
    surface: R,
    widget: W,
    notifier: N,
}

impl<R, W, N> ChartScreen<R, W, N>
where
    R: RenderSurface,
    W: WindowWidget,
    N: FailureNotifier,
{
    pub fn new(
        repository: Arc<dyn MetricRepository>,
        home: TimeWindow,
        interval: Duration,
        surface: R,
        widget: W,
        notifier: N,
    ) -> Self {
        Self {
            repository,
            zoom: ZoomController::new(home),
            scheduler: RefreshScheduler::new(interval),
            surface,
            widget,
            notifier,
        }
    }

    pub fn zoom(&self) -> &ZoomController {
        &self.zoom
    }

    pub async fn handle(&mut self, event: ChartEvent) {
        match event {
            ChartEvent::ItemAppended(reference) => {
                let mut fetcher = SeriesFetcher::new(self.repository.clone(), reference);
                fetcher.set_window(self.zoom.window(), false);
                self.zoom.composer_mut().add_series(fetcher);
                self.reload().await;
            }
            ChartEvent::ItemRemoved(reference) => {
                self.zoom.composer_mut().remove_series_for(&reference);
                self.redraw();
            }
            ChartEvent::SelectionDrag { from_sec, to_sec } => {
                let (begin, end) = self.zoom.on_selection_drag(from_sec, to_sec);
                self.redraw();
                self.widget.draw(begin, end);
            }
            ChartEvent::ResetGesture => {
                let (begin, end) = self.zoom.on_reset_gesture();
                self.redraw();
                self.widget.draw(begin, end);
            }
            ChartEvent::WindowSelected {
                window,
                keep_history,
            } => {
                self.zoom.on_external_window_set(window, keep_history);
                self.reload().await;
            }
            ChartEvent::Pause => self.zoom.pause(),
            ChartEvent::Resume => {
                self.zoom.resume();
                self.refresh_tick().await;
            }
        }
    }

    /// Fetch the current window for every series, then redraw. Works
    /// regardless of mode; used when items are added and when the user
    /// picks a window explicitly.
    pub async fn reload(&mut self) {
        let outcome = self.scheduler.reload(&mut self.zoom).await;
        self.apply(outcome);
    }

    /// One scheduled refresh cycle; a no-op while pinned.
    pub async fn refresh_tick(&mut self) {
        let outcome = self.scheduler.tick(&mut self.zoom).await;
        self.apply(outcome);
    }

    /// Event loop: multiplexes UI events with the refresh timer. Returns
    /// when the event channel closes. Gestures that arrive while a tick is
    /// fetching are queued by the channel and processed right after it.
    pub async fn run(&mut self, mut events: mpsc::Receiver<ChartEvent>) {
        let mut next_tick = Instant::now() + self.scheduler.interval();
        loop {
            tokio::select! {
                maybe = events.recv() => match maybe {
                    Some(event) => {
                        let was_following = self.zoom.is_following();
                        self.handle(event).await;
                        if !was_following && self.zoom.is_following() {
                            next_tick = Instant::now() + self.scheduler.interval();
                        }
                    }
                    None => break,
                },
                _ = tokio::time::sleep_until(next_tick), if self.zoom.is_following() => {
                    self.refresh_tick().await;
                    next_tick = Instant::now() + self.scheduler.interval();
                }
            }
        }
    }

    fn apply(&mut self, outcome: TickOutcome) {
        for (_, error) in &outcome.failures {
            self.notifier.notify(error);
        }
        if let Some(chart) = outcome.chart {
            self.widget.draw(chart.window.0, chart.window.1);
            self.surface.draw(&chart);
        }
    }

    fn redraw(&mut self) {
        let chart = self.zoom.compose();
        self.surface.draw(&chart);
    }
}
