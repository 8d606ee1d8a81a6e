use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A persisted association between an original URL and its short code.
///
/// Mappings are immutable once created; the store exposes create and read
/// operations only. `original_url` and `short_code` are each unique across
/// all mappings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlMapping {
    /// Server-assigned identifier, strictly increasing in commit order,
    /// never reused.
    pub id: i64,
    /// The original URL, byte-exact as supplied by the caller. The store
    /// performs no normalization.
    pub original_url: String,
    /// The short code clients use in place of the original URL.
    pub short_code: ShortCode,
    /// When the mapping was created. Assigned by the store, set once.
    pub created_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_round_trip() {
        let mapping = UrlMapping {
            id: 1,
            original_url: "https://example.com/a".to_string(),
            short_code: ShortCode::new("b7K2").unwrap(),
            created_at: "2026-01-01T00:00:00Z".parse().unwrap(),
        };

        let json = serde_json::to_string(&mapping).unwrap();
        let back: UrlMapping = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mapping);
    }
}
