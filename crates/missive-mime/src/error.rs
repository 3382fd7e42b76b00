//! Error types for MIME operations.

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// MIME error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A token or one of its delimiters was not found in a header fragment.
    #[error("Malformed header fragment: `{target}` not found")]
    MalformedHeaderFragment {
        /// The token that was searched for.
        target: String,
    },

    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),
}

impl Error {
    /// Creates a `MalformedHeaderFragment` error for the given token.
    #[must_use]
    pub fn malformed(target: impl Into<String>) -> Self {
        Self::MalformedHeaderFragment {
            target: target.into(),
        }
    }

    /// Returns true if the error only means "token not present".
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::MalformedHeaderFragment { .. })
    }
}
