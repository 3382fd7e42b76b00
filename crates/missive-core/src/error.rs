//! Error types for the core library.

use thiserror::Error;

use crate::transport::TransportError;

/// Errors that abort a composition or a send.
#[derive(Debug, Error)]
pub enum Error {
    /// No sender address could be resolved from the message or configuration.
    #[error("There is no submitted from address")]
    MissingSenderAddress,

    /// The sender address is neither a valid address nor `Name <address>`.
    #[error("The submitted from address ({0}) is not valid")]
    InvalidSenderAddress(String),

    /// A declared multipart body could not be decomposed.
    #[error("MIME error: {0}")]
    Mime(#[from] missive_mime::Error),

    /// The transport refused or failed to deliver the envelope.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Conditions the composer recovers from.
///
/// Each one is logged once and reported alongside the envelope; the message
/// is still sent in degraded form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    /// The `Content-Type` header named a type that is sent as `text/plain`
    /// instead.
    #[error("The Content-Type: {0} of your message is not supported and will be sent as text/plain instead")]
    UnsupportedContentType(String),

    /// An attachment was skipped.
    #[error("Attachment {name} could not be found or accessed: {reason}")]
    AttachmentUnavailable {
        /// File name or path of the attachment.
        name: String,
        /// Why it was skipped.
        reason: String,
    },
}
