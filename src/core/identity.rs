//! Proposal identity using prefixed ULIDs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

/// Prefix of every proposal draft ID
pub const PROPOSAL_PREFIX: &str = "PRP";

/// A unique proposal identifier, `PRP-<ULID>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProposalId {
    ulid: Ulid,
}

impl ProposalId {
    /// Create a fresh ID
    pub fn new() -> Self {
        Self { ulid: Ulid::new() }
    }

    /// Parse a ProposalId from a string
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }

    /// Human proposal number, `PR-` and the last eight ULID characters
    pub fn proposal_number(&self) -> String {
        let ulid = self.ulid.to_string();
        format!("PR-{}", &ulid[ulid.len() - 8..])
    }
}

impl Default for ProposalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", PROPOSAL_PREFIX, self.ulid)
    }
}

impl FromStr for ProposalId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, ulid_str) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::MissingDelimiter(s.to_string()))?;

        if !prefix.eq_ignore_ascii_case(PROPOSAL_PREFIX) {
            return Err(IdParseError::InvalidPrefix(prefix.to_string()));
        }

        let ulid = Ulid::from_string(ulid_str)
            .map_err(|e| IdParseError::InvalidUlid(ulid_str.to_string(), e.to_string()))?;

        Ok(Self { ulid })
    }
}

impl Serialize for ProposalId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ProposalId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when parsing proposal IDs
#[derive(Debug, Error)]
pub enum IdParseError {
    #[error("invalid proposal prefix: '{0}' (expected PRP)")]
    InvalidPrefix(String),

    #[error("missing '-' delimiter in proposal ID: '{0}'")]
    MissingDelimiter(String),

    #[error("invalid ULID '{0}': {1}")]
    InvalidUlid(String, String),
}
