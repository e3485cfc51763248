use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModeError {
    #[error("unknown pagination mode '{0}'")]
    UnknownMode(String),
}

/// Navigation strategy for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "RawMode")]
pub enum Mode {
    /// Skip/limit paging with a total count.
    #[default]
    Offset,
    /// Seek-by-value paging, no total count.
    Cursor,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Offset => write!(f, "offset"),
            Mode::Cursor => write!(f, "cursor"),
        }
    }
}

impl FromStr for Mode {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "offset" => Ok(Mode::Offset),
            "cursor" => Ok(Mode::Cursor),
            _ => Err(ModeError::UnknownMode(s.to_string())),
        }
    }
}

impl TryFrom<i64> for Mode {
    type Error = ModeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Mode::Offset),
            1 => Ok(Mode::Cursor),
            other => Err(ModeError::UnknownMode(other.to_string())),
        }
    }
}

/// Wire shapes accepted for a mode: its name or its numeric discriminant.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawMode {
    Name(String),
    Index(i64),
}

impl TryFrom<RawMode> for Mode {
    type Error = ModeError;

    fn try_from(raw: RawMode) -> Result<Self, Self::Error> {
        match raw {
            RawMode::Name(name) => name.parse(),
            RawMode::Index(index) => Mode::try_from(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("offset".parse::<Mode>(), Ok(Mode::Offset));
        assert_eq!(" Cursor ".parse::<Mode>(), Ok(Mode::Cursor));
        assert_eq!(
            "keyset".parse::<Mode>(),
            Err(ModeError::UnknownMode("keyset".into()))
        );
    }

    #[test]
    fn test_numeric_discriminants() {
        assert_eq!(Mode::try_from(0), Ok(Mode::Offset));
        assert_eq!(Mode::try_from(1), Ok(Mode::Cursor));
        assert!(Mode::try_from(7).is_err());
    }

    #[test]
    fn test_serde_accepts_name_or_index() {
        let m: Mode = serde_json::from_str(r#""cursor""#).unwrap();
        assert_eq!(m, Mode::Cursor);
        let m: Mode = serde_json::from_str("0").unwrap();
        assert_eq!(m, Mode::Offset);
        assert!(serde_json::from_str::<Mode>("2").is_err());
        assert_eq!(serde_json::to_string(&Mode::Cursor).unwrap(), r#""cursor""#);
    }
}
