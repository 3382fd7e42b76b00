//! # missive-core
//!
//! Outbound mail composition for applications that build their own message
//! bodies.
//!
//! This crate provides:
//! - **Composer** - turns an [`OutboundMessageRequest`] into a [`MailEnvelope`]:
//!   sender resolution, recipient parsing, header processing, `Content-Type`
//!   dispatch with recursive multipart decomposition, attachment resolution
//! - **Configuration** - the [`MailerConfig`] model (sender defaults, SMTP
//!   server settings)
//! - **Collaborators** - temp-file storage, filesystem and mime lookup seams
//!   with local default implementations
//! - **Transport seam** - the [`Transport`] trait and the [`Mailer`] that
//!   composes, then hands the envelope over
//!
//! ## Example
//!
//! ```ignore
//! use missive_core::{Composer, MailerConfig, OutboundMessageRequest};
//!
//! let config = MailerConfig {
//!     site_name: "Example".into(),
//!     site_mail: "noreply@example.com".into(),
//!     ..Default::default()
//! };
//! let request = OutboundMessageRequest::new("user@example.org", "Welcome", "Hello!")
//!     .with_header("Content-Type", "text/plain; charset=UTF-8");
//!
//! let composed = Composer::new(config).compose(&request)?;
//! assert_eq!(composed.envelope.body, "Hello!");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod collaborators;
pub mod compose;
pub mod config;
pub mod envelope;
mod error;
pub mod format;
pub mod request;
pub mod transport;

pub use collaborators::{
    Collaborators, ExtensionGuesser, FileSystem, LocalFileSystem, MimeGuesser, Storage,
    TempDirStorage,
};
pub use compose::Composer;
pub use config::{MailerConfig, Security, SmtpSettings};
pub use envelope::{Attachment, AttachmentSource, Composed, MailEnvelope};
pub use error::{Error, Result, Warning};
pub use format::format_body;
pub use request::{AttachmentParam, OutboundMessageRequest};
pub use transport::{Credentials, Mailer, Transport, TransportError, TransportSettings};

pub use missive_mime::{ContentType, Headers, Mailbox, TransferEncoding};
