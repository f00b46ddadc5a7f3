// Fetch error taxonomy
use crate::domain::item::ItemReference;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The backend matched zero or more than one item for a reference; the
    /// series cannot be rendered.
    #[error("item {reference} resolved to {matched} backend entries")]
    AmbiguousOrMissingItem {
        reference: ItemReference,
        matched: usize,
    },

    #[error("transport failure")]
    Transport(#[source] anyhow::Error),

    #[error("malformed backend response: {detail}")]
    MalformedResponse { detail: String },
}

impl FetchError {
    /// Fatal errors remove the series from the chart; everything else is
    /// retried on the next refresh cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FetchError::AmbiguousOrMissingItem { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_item_resolution_is_fatal() {
        let resolution = FetchError::AmbiguousOrMissingItem {
            reference: ItemReference::new("s1".to_string(), "h1".to_string(), "1".to_string()),
            matched: 0,
        };
        assert!(resolution.is_fatal());
        assert!(!FetchError::Transport(anyhow::anyhow!("timeout")).is_fatal());
        let malformed = FetchError::MalformedResponse {
            detail: "missing history".to_string(),
        };
        assert!(!malformed.is_fatal());
    }
}
