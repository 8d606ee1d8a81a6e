use crate::base62;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::Display;

/// A validated short code identifier for a shortened URL.
///
/// Short codes are 1-10 characters drawn from the base62 alphabet
/// (`[0-9A-Za-z]`). The alphabet mixes case, so comparison is byte-exact:
/// `"b7K2"` and `"B7k2"` are different codes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ShortCode(SmolStr);

pub const MIN_LENGTH: usize = 1;
pub const MAX_LENGTH: usize = 10;

impl ShortCode {
    /// Creates a new `ShortCode` after validating the input.
    pub fn new(code: impl Into<SmolStr>) -> Result<Self, CoreError> {
        let code = code.into();
        Self::validate(&code)?;
        Ok(Self(code))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// (generators that are guaranteed to stay within the alphabet and
    /// length bounds).
    pub fn new_unchecked(code: impl Into<SmolStr>) -> Self {
        Self(code.into())
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    fn validate(code: &str) -> Result<(), CoreError> {
        if code.len() < MIN_LENGTH || code.len() > MAX_LENGTH {
            return Err(CoreError::InvalidShortCode(format!(
                "length must be between {} and {}, got {}",
                MIN_LENGTH,
                MAX_LENGTH,
                code.len()
            )));
        }

        if !code.bytes().all(base62::is_alphabet_byte) {
            return Err(CoreError::InvalidShortCode(format!(
                "must contain only characters from the base62 alphabet: '{}'",
                code
            )));
        }

        Ok(())
    }
}

impl std::fmt::Debug for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ShortCode").field(&self.0).finish()
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ShortCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ShortCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = SmolStr::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_codes() {
        assert!(ShortCode::new("a").is_ok());
        assert!(ShortCode::new("b7K2").is_ok());
        assert!(ShortCode::new("0123456789").is_ok());
    }

    #[test]
    fn empty_code_rejected() {
        assert!(ShortCode::new("").is_err());
    }

    #[test]
    fn too_long_rejected() {
        assert!(ShortCode::new("a".repeat(11).as_str()).is_err());
    }

    #[test]
    fn invalid_characters_rejected() {
        assert!(ShortCode::new("abc def").is_err());
        assert!(ShortCode::new("abc/def").is_err());
        assert!(ShortCode::new("abc-def").is_err());
        assert!(ShortCode::new("abc_def").is_err());
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let lower = ShortCode::new("b7k2").unwrap();
        let upper = ShortCode::new("B7K2").unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn display_round_trips() {
        let code = ShortCode::new("qT9z").unwrap();
        assert_eq!(code.to_string(), "qT9z");
        assert_eq!(code.as_str(), "qT9z");
    }

    #[test]
    fn to_url_joins_with_base() {
        let code = ShortCode::new("abc123").unwrap();
        assert_eq!(code.to_url("https://curt.ail"), "https://curt.ail/abc123");
        assert_eq!(code.to_url("https://curt.ail/"), "https://curt.ail/abc123");
    }

    #[test]
    fn serde_round_trip() {
        let code = ShortCode::new("b7K2").unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"b7K2\"");
        let back: ShortCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);
    }

    #[test]
    fn deserialize_rejects_invalid_code() {
        assert!(serde_json::from_str::<ShortCode>("\"not a code!\"").is_err());
        assert!(serde_json::from_str::<ShortCode>("\"\"").is_err());
    }
}
