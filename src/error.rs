//! Error types for pleat operations.

use thiserror::Error;

/// Errors that can occur while retrofitting a document.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("Region not found: {0}")]
    RegionUnresolved(String),

    /// The region exists but its content does not match the expected
    /// section-group shape (no separator anywhere in the subtree).
    /// Inside the detector loop this is the ordinary "not loaded yet"
    /// signal rather than a failure.
    #[error("Region content not recognized: no section separators present")]
    StructureNotRecognized,
}

pub type Result<T> = std::result::Result<T, Error>;
