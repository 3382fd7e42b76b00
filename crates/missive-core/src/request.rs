//! Outbound message requests.

use std::path::PathBuf;

use missive_mime::Headers;
use serde::{Deserialize, Serialize};

/// A message handed to the composer by the application.
///
/// `body` is already joined text. It may be a pre-formatted multipart body
/// whose boundaries are declared by the `Content-Type` header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutboundMessageRequest {
    /// Sender, either `address` or `Name <address>`. May be empty.
    pub from: String,
    /// Comma-separated recipients.
    pub to: String,
    /// Comma-separated CC recipients.
    pub cc: String,
    /// Comma-separated BCC recipients.
    pub bcc: String,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
    /// Message headers, keys matched case-insensitively.
    pub headers: Headers,
    /// Explicit attachments.
    pub attachments: Vec<AttachmentParam>,
}

impl OutboundMessageRequest {
    /// Creates a request with recipients, subject and body.
    #[must_use]
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    /// Sets the sender.
    #[must_use]
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    /// Sets the CC recipients.
    #[must_use]
    pub fn with_cc(mut self, cc: impl Into<String>) -> Self {
        self.cc = cc.into();
        self
    }

    /// Sets the BCC recipients.
    #[must_use]
    pub fn with_bcc(mut self, bcc: impl Into<String>) -> Self {
        self.bcc = bcc.into();
        self
    }

    /// Adds or replaces a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Adds an explicit attachment.
    #[must_use]
    pub fn with_attachment(mut self, attachment: AttachmentParam) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// An attachment supplied alongside the request.
///
/// A parameter with both `filepath` and `filecontent` registers two
/// attachments, the content first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentParam {
    /// File on the local filesystem.
    pub filepath: Option<PathBuf>,
    /// In-memory content.
    pub filecontent: Option<Vec<u8>>,
    /// Name presented to the recipient.
    pub filename: Option<String>,
    /// Declared MIME type.
    pub filemime: Option<String>,
}

impl AttachmentParam {
    /// Attaches a file by path.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            filepath: Some(path.into()),
            ..Self::default()
        }
    }

    /// Attaches in-memory content under a file name.
    #[must_use]
    pub fn from_content(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filecontent: Some(content.into()),
            filename: Some(filename.into()),
            ..Self::default()
        }
    }

    /// Sets the presented file name.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Sets the MIME type.
    #[must_use]
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.filemime = Some(mime.into());
        self
    }
}
