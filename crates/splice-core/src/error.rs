//! Error types for Splice.

use thiserror::Error;

/// Main error type for operations that are not plain timeline edits.
///
/// Timeline edits report their rejections through `splice_timeline::EditError`;
/// this type covers loading, configuration and media intake.
#[derive(Error, Debug)]
pub enum SpliceError {
    #[error("Invalid project: {0}")]
    InvalidProject(String),

    #[error("Unsupported media: {0}")]
    UnsupportedMedia(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for Splice operations.
pub type Result<T> = std::result::Result<T, SpliceError>;
