//! Case-insensitive location names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named stop, compared case-insensitively.
///
/// Names are trimmed and lowercased on construction, so `"Main Gate"` and
/// `" main gate"` are the same location.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Location(String);

impl Location {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_lowercase())
    }

    /// The normalized name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<String> for Location {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&str> for Location {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        location.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
