#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a retryable event.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RetryStatus {
    /// Retryable; eligible for future scheduler passes.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "OPEN"))]
    Open,
    /// Terminal success; never retried again.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "CLOSED"))]
    Closed,
    /// Terminal failure; non-retryable rejection or attempts exhausted.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "FAILED"))]
    Failed,
}

impl RetryStatus {
    /// Returns true if no further transitions can leave this state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Open)
    }

    /// All possible status values.
    pub const ALL: &'static [RetryStatus] = &[Self::Open, Self::Closed, Self::Failed];

    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for RetryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    invalid: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid status '{}'. Valid values: {}",
            self.invalid,
            RetryStatus::ALL
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for RetryStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(Self::Open),
            "CLOSED" => Ok(Self::Closed),
            "FAILED" => Ok(Self::Failed),
            _ => Err(ParseStatusError {
                invalid: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_roundtrip() {
        for status in RetryStatus::ALL {
            let json = serde_json::to_string(status).unwrap();
            let parsed: RetryStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(*status, parsed);
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("OPEN".parse::<RetryStatus>().unwrap(), RetryStatus::Open);
        assert!("Open".parse::<RetryStatus>().is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!RetryStatus::Open.is_terminal());
        assert!(RetryStatus::Closed.is_terminal());
        assert!(RetryStatus::Failed.is_terminal());
    }
}
