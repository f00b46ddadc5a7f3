// Collaborator seams for the rendering stack
use crate::domain::chart::ChartDescription;
use crate::error::FetchError;

/// Pixel-level chart renderer. The engine hands it a complete description
/// on every redraw and assumes nothing about how it draws.
pub trait RenderSurface {
    fn draw(&mut self, chart: &ChartDescription);
}

/// Window-selection widget (a slider or similar) kept in sync with the
/// chart's visible bounds.
pub trait WindowWidget {
    fn draw(&mut self, begin_sec: i64, end_sec: i64);
}

/// Receives one notification per fetch failure occurrence.
pub trait FailureNotifier {
    fn notify(&mut self, error: &FetchError);
}
