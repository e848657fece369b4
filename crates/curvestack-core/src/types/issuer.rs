//! Legal entities keying issuer-specific curves.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An issuer (legal entity) identified by its short name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegalEntity(String);

impl LegalEntity {
    /// Creates a legal entity.
    #[must_use]
    pub fn new(short_name: impl Into<String>) -> Self {
        Self(short_name.into())
    }

    /// Returns the short name.
    #[must_use]
    pub fn short_name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LegalEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LegalEntity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
