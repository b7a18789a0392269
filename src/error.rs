//! Error types for slotring.

/// Errors reported by ring buffer construction and handle resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Construction input was malformed: a capacity that is not a
    /// positive integer, or an empty sequence handed to `from_list`.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The handle does not refer to a live ring buffer.
    #[error("Invalid handle")]
    InvalidHandle,
}

impl Error {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
