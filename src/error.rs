//! Error type shared by every workflow operation

use std::io;
use std::path::PathBuf;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Everything a workflow operation can report back to its caller
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// None of the known host application bundles is installed
    #[error("Could not determine the installed Alfred version")]
    UnknownHostVersion,

    /// `resolve_path` was given a base outside cache/data/path/home
    #[error("Invalid base location: '{0}' (expected cache, data, path or home)")]
    InvalidBase(String),

    /// `resolve_path` was given an empty file name
    #[error("File name must not be empty")]
    EmptyName,

    /// A storage directory could not be resolved or created
    #[error("The {0} directory is not available")]
    LocationUnavailable(&'static str),

    /// The settings store produced no output for the key
    #[error("Key '{key}' not found in {}", .file.display())]
    KeyNotFound { file: PathBuf, key: String },

    #[error("Failed to read: {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write: {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to rename {} to {}", .from.display(), .to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// There is nothing to render
    #[error("No results to render")]
    NoResults,

    /// An override result list was not a list of objects
    #[error("Invalid result list: {0}")]
    InvalidResults(String),

    #[error("Failed to parse JSON")]
    Json(#[from] serde_json::Error),

    /// The request method is not a valid HTTP token
    #[error("Invalid HTTP method: '{0}'")]
    InvalidMethod(String),

    #[error("Request failed")]
    Http(#[from] reqwest::Error),
}
