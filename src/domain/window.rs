// Visible time window domain model

/// Span used before the user ever picks a range.
pub const DEFAULT_SPAN_SECS: i64 = 6 * 60 * 60;

/// The visible time range in unix seconds. An unset end means "now"; an
/// unset begin means "end minus the active span".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeWindow {
    pub begin_sec: Option<i64>,
    pub end_sec: Option<i64>,
}

impl TimeWindow {
    pub fn absolute(begin_sec: i64, end_sec: i64) -> Self {
        Self {
            begin_sec: Some(begin_sec),
            end_sec: Some(end_sec),
        }
    }

    /// Extent in seconds, only when both bounds are set.
    pub fn span(&self) -> Option<i64> {
        match (self.begin_sec, self.end_sec) {
            (Some(begin), Some(end)) => Some(end - begin),
            _ => None,
        }
    }

    /// Concrete bounds, anchoring open ends to `now_sec` and
    /// `fallback_span`.
    pub fn resolve(&self, now_sec: i64, fallback_span: i64) -> (i64, i64) {
        let end = self.end_sec.unwrap_or(now_sec);
        let begin = self.begin_sec.unwrap_or(end - fallback_span);
        (begin, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_requires_both_bounds() {
        assert_eq!(TimeWindow::absolute(100, 400).span(), Some(300));
        assert_eq!(TimeWindow::default().span(), None);
        let half_open = TimeWindow {
            begin_sec: None,
            end_sec: Some(400),
        };
        assert_eq!(half_open.span(), None);
    }

    #[test]
    fn test_resolve_anchors_open_ends() {
        let open = TimeWindow::default();
        assert_eq!(open.resolve(1_000, 600), (400, 1_000));

        let until = TimeWindow {
            begin_sec: None,
            end_sec: Some(800),
        };
        assert_eq!(until.resolve(1_000, 600), (200, 800));

        let fixed = TimeWindow::absolute(100, 400);
        assert_eq!(fixed.resolve(1_000, 600), (100, 400));
    }
}
