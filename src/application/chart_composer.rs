// Chart composition - derives axes, titles, and legends from the fetcher set
use crate::application::series_fetcher::SeriesFetcher;
use crate::domain::chart::{AxisGroup, AxisSide, ChartDescription, SeriesLine};
use crate::domain::item::{ItemMetadata, ItemReference, ValueType};

/// Stable identity of one series on the chart. Survives reordering and
/// removal of siblings, so removal never has to compare series content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeriesId(u64);

struct SeriesSlot {
    id: SeriesId,
    fetcher: SeriesFetcher,
}

/// Ordered collection of series fetchers plus the pure composition pass
/// that turns them into one renderable multi-axis chart.
#[derive(Default)]
pub struct ChartComposer {
    slots: Vec<SeriesSlot>,
    next_id: u64,
}

impl ChartComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn add_series(&mut self, fetcher: SeriesFetcher) -> SeriesId {
        let id = SeriesId(self.next_id);
        self.next_id += 1;
        self.slots.push(SeriesSlot { id, fetcher });
        id
    }

    pub fn remove_series(&mut self, id: SeriesId) -> Option<SeriesFetcher> {
        let at = self.slots.iter().position(|s| s.id == id)?;
        Some(self.slots.remove(at).fetcher)
    }

    /// Remove the first series created for a picker reference.
    pub fn remove_series_for(&mut self, reference: &ItemReference) -> Option<SeriesFetcher> {
        let at = self
            .slots
            .iter()
            .position(|s| s.fetcher.reference() == reference)?;
        Some(self.slots.remove(at).fetcher)
    }

    pub fn fetchers_mut(&mut self) -> impl Iterator<Item = &mut SeriesFetcher> {
        self.slots.iter_mut().map(|s| &mut s.fetcher)
    }

    pub(crate) fn slots_mut(&mut self) -> impl Iterator<Item = (SeriesId, &mut SeriesFetcher)> {
        self.slots.iter_mut().map(|s| (s.id, &mut s.fetcher))
    }

    /// Pure composition pass over the current fetcher set for the given
    /// resolved window bounds. Never mutates fetcher state; axes and labels
    /// are rederived in full every time.
    pub fn compose(&self, window: (i64, i64)) -> ChartDescription {
        let axes = self.derive_axes();
        let (title, labels) = self.derive_labeling();
        let series = self
            .slots
            .iter()
            .zip(labels)
            .map(|(slot, label)| {
                let axis = slot
                    .fetcher
                    .metadata()
                    .and_then(|m| axes.iter().position(|a| a.unit == m.unit))
                    .map(|at| at + 1)
                    .unwrap_or(1);
                SeriesLine {
                    label,
                    points: slot.fetcher.retained().to_vec(),
                    axis,
                    // A lone sample draws no line segment; it needs a marker
                    // to be visible at all.
                    point_markers: slot.fetcher.retained().len() == 1,
                }
            })
            .collect();
        ChartDescription {
            title,
            series,
            axes,
            window,
        }
    }

    /// One axis per distinct unit, in insertion order, alternating screen
    /// sides. A single non-integer series on an axis clears its
    /// integer-only tick hint.
    fn derive_axes(&self) -> Vec<AxisGroup> {
        let mut axes: Vec<AxisGroup> = Vec::new();
        for slot in &self.slots {
            let Some(meta) = slot.fetcher.metadata() else {
                continue;
            };
            match axes.iter_mut().find(|a| a.unit == meta.unit) {
                Some(axis) => {
                    if meta.value_type != ValueType::Integer {
                        axis.integer_only = false;
                    }
                }
                None => {
                    let side = if axes.len() % 2 == 0 {
                        AxisSide::Left
                    } else {
                        AxisSide::Right
                    };
                    axes.push(AxisGroup {
                        unit: meta.unit.clone(),
                        integer_only: meta.value_type == ValueType::Integer,
                        side,
                    });
                }
            }
        }
        axes
    }

    /// Title and per-series legend labels, by priority: single series gets
    /// a full title and no legend; one shared host moves the host into the
    /// title; one shared item name moves the name into the title; anything
    /// else gets fully-qualified legend labels and no title.
    fn derive_labeling(&self) -> (String, Vec<String>) {
        if self.slots.is_empty() {
            return (String::new(), Vec::new());
        }
        if self.slots.len() == 1 {
            return (self.full_label(&self.slots[0]), vec![String::new()]);
        }

        let metas: Option<Vec<&ItemMetadata>> = self
            .slots
            .iter()
            .map(|s| s.fetcher.metadata())
            .collect();
        if let Some(metas) = metas {
            let same_host = metas
                .windows(2)
                .all(|w| w[0].server == w[1].server && w[0].host == w[1].host);
            if same_host {
                let title = format!("{}: {}", metas[0].server, metas[0].host);
                let labels = metas.iter().map(|m| brief_with_unit(m)).collect();
                return (title, labels);
            }
            let same_brief = metas.windows(2).all(|w| w[0].brief == w[1].brief);
            if same_brief {
                let labels = metas
                    .iter()
                    .map(|m| format!("{}: {}", m.server, m.host))
                    .collect();
                return (brief_with_unit(metas[0]), labels);
            }
        }
        let labels = self.slots.iter().map(|s| self.full_label(s)).collect();
        (String::new(), labels)
    }

    fn full_label(&self, slot: &SeriesSlot) -> String {
        match slot.fetcher.metadata() {
            Some(meta) => format!(
                "{} ({}: {}){}",
                meta.brief,
                meta.server,
                meta.host,
                unit_suffix(&meta.unit)
            ),
            None => format!("item {}", slot.fetcher.reference().item_id),
        }
    }
}

fn brief_with_unit(meta: &ItemMetadata) -> String {
    format!("{}{}", meta.brief, unit_suffix(&meta.unit))
}

fn unit_suffix(unit: &str) -> String {
    if unit.is_empty() {
        String::new()
    } else {
        format!(" [{unit}]")
    }
}
