// Monitored item domain models
use std::fmt;

/// Identity of one monitored metric on one backend server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemReference {
    pub server_id: String,
    pub host_id: String,
    pub item_id: String,
}

impl ItemReference {
    pub fn new(server_id: String, host_id: String, item_id: String) -> Self {
        Self {
            server_id,
            host_id,
            item_id,
        }
    }
}

impl fmt::Display for ItemReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.server_id, self.host_id, self.item_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Numeric,
    Integer,
}

impl ValueType {
    /// Parse the backend's wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "numeric" => Some(ValueType::Numeric),
            "integer" => Some(ValueType::Integer),
            _ => None,
        }
    }
}

/// Resolved item details, cached for the lifetime of its fetcher.
/// `server` and `host` are display names; they also key the same-host
/// grouping used for chart titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemMetadata {
    pub brief: String,
    pub unit: String,
    pub value_type: ValueType,
    pub server: String,
    pub host: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_parse() {
        assert_eq!(ValueType::parse("numeric"), Some(ValueType::Numeric));
        assert_eq!(ValueType::parse("integer"), Some(ValueType::Integer));
        assert_eq!(ValueType::parse("text"), None);
    }

    #[test]
    fn test_reference_display() {
        let reference = ItemReference::new("s1".to_string(), "h7".to_string(), "42".to_string());
        assert_eq!(reference.to_string(), "s1/h7/42");
    }
}
