//! Core engine types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a synthetic zone
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneId(pub String);

impl ZoneId {
    /// Length of the zone name, in bytes. Feeds the trend term of the
    /// signal formula, so it is part of the deterministic contract.
    pub fn name_len(&self) -> usize {
        self.0.len()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ZoneId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ZoneId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
