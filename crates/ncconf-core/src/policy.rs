//! Run-wide state policy

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Whether declared entries should exist or be removed
///
/// Applies uniformly to every key of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Create or update declared entries
    #[default]
    Present,
    /// Delete declared entries that exist
    Absent,
}

impl Policy {
    /// Lowercase name as accepted on the command line
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown policy name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid state '{0}': expected 'present' or 'absent'")]
pub struct ParsePolicyError(pub String);

impl FromStr for Policy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("present".parse::<Policy>().unwrap(), Policy::Present);
        assert_eq!("ABSENT".parse::<Policy>().unwrap(), Policy::Absent);
        assert_eq!(" Absent ".parse::<Policy>().unwrap(), Policy::Absent);
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "latest".parse::<Policy>().unwrap_err();
        assert!(err.to_string().contains("latest"));
    }

    #[test]
    fn default_is_present() {
        assert_eq!(Policy::default(), Policy::Present);
        assert_eq!(Policy::Absent.to_string(), "absent");
    }
}
