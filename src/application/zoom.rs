// Zoom state machine - window ownership and gesture interpretation
use chrono::Utc;

use crate::application::chart_composer::ChartComposer;
use crate::domain::chart::ChartDescription;
use crate::domain::window::{DEFAULT_SPAN_SECS, TimeWindow};

/// Narrowest window a drag-selection may produce.
pub const MIN_ZOOM_SPAN_SECS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowMode {
    /// Auto-refresh active; the window re-anchors to "now" on every tick.
    Following,
    /// The user zoomed or paused; the window stays fixed until they act.
    Pinned,
}

/// Owns the visible window and the composer beneath it, and translates
/// user gestures into window changes. Every change that pins the chart
/// advances a generation counter; in-flight refresh cycles carry the
/// generation they were issued against so superseded results get dropped.
pub struct ZoomController {
    composer: ChartComposer,
    window: TimeWindow,
    home: TimeWindow,
    mode: FollowMode,
    span_secs: i64,
    generation: u64,
}

impl ZoomController {
    /// `home` is the chart's original full-range window, restored by the
    /// reset gesture.
    pub fn new(home: TimeWindow) -> Self {
        Self {
            composer: ChartComposer::new(),
            window: home,
            home,
            mode: FollowMode::Following,
            span_secs: home.span().unwrap_or(DEFAULT_SPAN_SECS),
            generation: 0,
        }
    }

    pub fn composer(&self) -> &ChartComposer {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut ChartComposer {
        &mut self.composer
    }

    pub fn mode(&self) -> FollowMode {
        self.mode
    }

    pub fn is_following(&self) -> bool {
        self.mode == FollowMode::Following
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Span used when re-anchoring the follow window.
    pub fn span_secs(&self) -> i64 {
        self.window.span().unwrap_or(self.span_secs)
    }

    /// Concrete bounds of the active window, anchored to "now" when open.
    pub fn resolved_bounds(&self) -> (i64, i64) {
        self.window.resolve(Utc::now().timestamp(), self.span_secs())
    }

    /// Translate a drag-selection into a pinned window of at least
    /// `MIN_ZOOM_SPAN_SECS`, keeping the drag's start.
    pub fn on_selection_drag(&mut self, from_sec: i64, to_sec: i64) -> (i64, i64) {
        let to_sec = to_sec.max(from_sec + MIN_ZOOM_SPAN_SECS);
        self.pin(TimeWindow::absolute(from_sec, to_sec));
        (from_sec, to_sec)
    }

    /// Restore the pre-zoom window. Does not resume following on its own.
    pub fn on_reset_gesture(&mut self) -> (i64, i64) {
        self.window = self.home;
        self.generation += 1;
        self.resolved_bounds()
    }

    /// Window pushed from the selection widget: forwarded to every fetcher,
    /// then pinned, which disables auto-refresh.
    pub fn on_external_window_set(&mut self, window: TimeWindow, keep_history: bool) -> (i64, i64) {
        for fetcher in self.composer.fetchers_mut() {
            fetcher.set_window(window, keep_history);
        }
        self.pin(window);
        self.resolved_bounds()
    }

    /// Re-anchor the follow window to `[now - span, now]` and push it down
    /// with history retention. Leaves mode and generation untouched.
    pub fn follow_to(&mut self, now_sec: i64) -> (i64, i64) {
        let span = self.span_secs();
        let window = TimeWindow::absolute(now_sec - span, now_sec);
        for fetcher in self.composer.fetchers_mut() {
            fetcher.set_window(window, true);
        }
        self.window = window;
        (now_sec - span, now_sec)
    }

    pub fn pause(&mut self) {
        self.mode = FollowMode::Pinned;
        self.generation += 1;
    }

    pub fn resume(&mut self) {
        self.mode = FollowMode::Following;
    }

    pub fn compose(&self) -> ChartDescription {
        self.composer.compose(self.resolved_bounds())
    }

    fn pin(&mut self, window: TimeWindow) {
        if let Some(span) = window.span() {
            self.span_secs = span;
        }
        self.window = window;
        self.mode = FollowMode::Pinned;
        self.generation += 1;
    }
}
