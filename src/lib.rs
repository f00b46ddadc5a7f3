// Chart engine for monitoring dashboards - module wiring and re-exports
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

pub use application::chart_composer::{ChartComposer, SeriesId};
pub use application::metric_repository::{HISTORY_PAGE_CAP, MetricRepository};
pub use application::refresh::{DEFAULT_REFRESH_INTERVAL, RefreshScheduler, TickOutcome};
pub use application::series_fetcher::SeriesFetcher;
pub use application::zoom::{FollowMode, MIN_ZOOM_SPAN_SECS, ZoomController};
pub use domain::chart::{AxisGroup, AxisSide, ChartDescription, SeriesLine};
pub use domain::item::{ItemMetadata, ItemReference, ValueType};
pub use domain::sample::{HistorySample, Sample};
pub use domain::window::{DEFAULT_SPAN_SECS, TimeWindow};
pub use error::FetchError;
pub use infrastructure::http_repository::HttpMetricRepository;
pub use presentation::chart_screen::{ChartEvent, ChartScreen};
pub use presentation::surfaces::{FailureNotifier, RenderSurface, WindowWidget};
