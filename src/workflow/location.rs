//! Named base locations for `resolve_path`

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A base directory a workflow can resolve names against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// Volatile per-workflow cache directory
    Cache,
    /// Persistent per-workflow data directory
    Data,
    /// Working directory at startup (the workflow's own folder)
    Path,
    /// The user's home directory
    Home,
}

impl Location {
    pub const ALL: [Location; 4] = [
        Location::Cache,
        Location::Data,
        Location::Path,
        Location::Home,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Cache => "cache",
            Location::Data => "data",
            Location::Path => "path",
            Location::Home => "home",
        }
    }
}

impl FromStr for Location {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cache" => Ok(Location::Cache),
            "data" => Ok(Location::Data),
            "path" => Ok(Location::Path),
            "home" => Ok(Location::Home),
            other => Err(Error::InvalidBase(other.to_string())),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
