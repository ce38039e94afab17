use crate::error::ShortCodeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const MIN_CODE_LEN: usize = 6;
pub const MAX_CODE_LEN: usize = 8;

/// Human-typed secret printed on the product card. Always uppercase.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShortCode(String);

impl ShortCode {
    /// Normalizes (trim + uppercase) and validates a code.
    pub fn parse(raw: &str) -> Result<Self, ShortCodeError> {
        let code = normalize_code(raw);
        if !(MIN_CODE_LEN..=MAX_CODE_LEN).contains(&code.len()) {
            return Err(ShortCodeError::BadLength(code.chars().count()));
        }
        if !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(ShortCodeError::BadCharacter);
        }
        Ok(Self(code))
    }

    /// For codes produced by a validated `CodePolicy`.
    pub(crate) fn from_minted(code: String) -> Self {
        debug_assert!(Self::parse(&code).is_ok(), "minted invalid code {}", code);
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Trim and uppercase a presented code without validating it.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

impl fmt::Display for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ShortCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ShortCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ShortCode::parse(&s).map_err(serde::de::Error::custom)
    }
}
