// Renderable chart description domain models
use super::sample::Sample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSide {
    Left,
    Right,
}

/// One y-axis, shared by every series reporting the same unit. Derived on
/// each composition pass and never stored between renders.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisGroup {
    pub unit: String,
    pub integer_only: bool,
    pub side: AxisSide,
}

/// One renderable line. `axis` is the 1-based index into
/// `ChartDescription::axes`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesLine {
    pub label: String,
    pub points: Vec<Sample>,
    pub axis: usize,
    pub point_markers: bool,
}

/// Everything the rendering surface needs for one draw: title, series,
/// axes, and the resolved window bounds in unix seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDescription {
    pub title: String,
    pub series: Vec<SeriesLine>,
    pub axes: Vec<AxisGroup>,
    pub window: (i64, i64),
}
