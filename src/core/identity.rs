//! Test case identifiers
//!
//! Case ids are assigned sequentially at creation as `TC-<n>`, where `n` is a
//! 1-based counter kept by the store. Ids are never reused after deletion.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Prefix shared by every case id
pub const CASE_PREFIX: &str = "TC";

/// Sequential test case identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaseId(u32);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    #[error("Missing 'TC-' prefix in '{0}'")]
    MissingPrefix(String),

    #[error("Invalid case number in '{0}'")]
    InvalidNumber(String),

    #[error("Case numbers start at 1, got '{0}'")]
    Zero(String),
}

impl CaseId {
    /// Create an id from its 1-based creation number
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    /// The creation counter value
    pub fn number(&self) -> u32 {
        self.0
    }

    /// Parse a user-supplied id; bare numbers and lowercase prefixes are accepted
    pub fn parse_loose(raw: &str) -> Result<Self, IdParseError> {
        let trimmed = raw.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Self::from_number_str(trimmed, raw);
        }
        trimmed.to_uppercase().parse()
    }

    fn from_number_str(digits: &str, raw: &str) -> Result<Self, IdParseError> {
        let n: u32 = digits
            .parse()
            .map_err(|_| IdParseError::InvalidNumber(raw.to_string()))?;
        if n == 0 {
            return Err(IdParseError::Zero(raw.to_string()));
        }
        Ok(Self(n))
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", CASE_PREFIX, self.0)
    }
}

impl FromStr for CaseId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(CASE_PREFIX)
            .and_then(|rest| rest.strip_prefix('-'))
            .ok_or_else(|| IdParseError::MissingPrefix(s.to_string()))?;
        Self::from_number_str(digits, s)
    }
}

impl Serialize for CaseId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CaseId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(CaseId::new(1).to_string(), "TC-1");
        assert_eq!(CaseId::new(42).to_string(), "TC-42");
    }

    #[test]
    fn test_parse_strict() {
        assert_eq!("TC-7".parse::<CaseId>().unwrap(), CaseId::new(7));
        assert!(matches!(
            "7".parse::<CaseId>(),
            Err(IdParseError::MissingPrefix(_))
        ));
        assert!(matches!(
            "TC-x".parse::<CaseId>(),
            Err(IdParseError::InvalidNumber(_))
        ));
        assert!(matches!("TC-0".parse::<CaseId>(), Err(IdParseError::Zero(_))));
    }

    #[test]
    fn test_parse_loose() {
        assert_eq!(CaseId::parse_loose("tc-3").unwrap(), CaseId::new(3));
        assert_eq!(CaseId::parse_loose(" 12 ").unwrap(), CaseId::new(12));
        assert!(CaseId::parse_loose("REQ-1").is_err());
        assert!(CaseId::parse_loose("").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let yaml = serde_yml::to_string(&CaseId::new(5)).unwrap();
        assert_eq!(yaml.trim(), "TC-5");
        let parsed: CaseId = serde_yml::from_str("TC-5").unwrap();
        assert_eq!(parsed.number(), 5);
    }
}
