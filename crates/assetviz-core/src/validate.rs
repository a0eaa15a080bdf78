//! Asset identifier validation.
//!
//! Every identifier that arrives from outside the process passes through
//! [`AssetId::parse`] before it is bound into any query.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::ValidationError;

static ASSET_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^A[0-9]{4,5}$").expect("asset id pattern is valid"));

/// A validated asset identifier: `A` followed by 4 or 5 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Validate `raw` and wrap it.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        validate(raw).map(|id| Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Check `id` against the asset identifier format, returning it unchanged on success.
pub fn validate(id: &str) -> Result<&str, ValidationError> {
    if ASSET_ID_RE.is_match(id) {
        Ok(id)
    } else {
        Err(ValidationError::InvalidFormat {
            value: id.to_string(),
        })
    }
}

impl FromStr for AssetId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AssetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_four_and_five_digits() {
        assert_eq!(AssetId::parse("A0001").unwrap().as_str(), "A0001");
        assert_eq!(AssetId::parse("A00001").unwrap().as_str(), "A00001");
        assert_eq!(AssetId::parse("A99999").unwrap().as_str(), "A99999");
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in [
            "",
            "A",
            "A1",
            "A123",
            "A123456",
            "a00001",
            "B00001",
            "A0000x",
            " A00001",
            "A00001 ",
            "A00001\n",
            "A00001\" OR 1=1",
            "00001",
        ] {
            let err = AssetId::parse(bad).unwrap_err();
            assert_eq!(
                err,
                ValidationError::InvalidFormat {
                    value: bad.to_string()
                }
            );
        }
    }

    #[test]
    fn test_rejects_non_ascii_digits() {
        // Arabic-Indic digits are Unicode \d but not part of the format.
        assert!(AssetId::parse("A\u{0661}\u{0662}\u{0663}\u{0664}").is_err());
    }

    #[test]
    fn test_error_message_names_value() {
        let err = validate("A1").unwrap_err();
        assert!(err.to_string().contains("\"A1\""));
    }

    #[test]
    fn test_from_str_and_display() {
        let id: AssetId = "A12345".parse().unwrap();
        assert_eq!(id.to_string(), "A12345");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"A12345\"");
    }
}
