//! The composed envelope handed to a transport.

use std::io;
use std::path::{Path, PathBuf};

use missive_mime::encoding::encode_base64;
use missive_mime::{ContentType, Mailbox, TransferEncoding};
use tracing::warn;

use crate::error::Warning;

/// Charset used when the `Content-Type` header names none.
pub const DEFAULT_CHARSET: &str = "UTF-8";

/// Everything a transport needs to deliver one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailEnvelope {
    /// Sender address.
    pub from: String,
    /// Sender display name.
    pub from_name: String,
    /// Envelope sender (`MAIL FROM`).
    pub sender: String,
    /// Reply-to addresses.
    pub reply_to: Vec<Mailbox>,
    /// Primary recipients.
    pub recipients: Vec<Mailbox>,
    /// CC recipients.
    pub cc: Vec<Mailbox>,
    /// BCC recipients.
    pub bcc: Vec<Mailbox>,
    /// Subject line.
    pub subject: String,
    /// Primary body.
    pub body: String,
    /// Plain-text rendering paired with an HTML body.
    pub alt_body: Option<String>,
    /// Content type of the message.
    pub content_type: ContentType,
    /// Body charset.
    pub charset: String,
    /// Body transfer encoding.
    pub transfer_encoding: TransferEncoding,
    /// Whether `body` is HTML.
    pub is_html: bool,
    /// Raw `Key: Value` header lines passed through verbatim.
    pub custom_headers: Vec<String>,
    /// Attachments in registration order.
    pub attachments: Vec<Attachment>,
}

impl Default for MailEnvelope {
    fn default() -> Self {
        Self {
            from: String::new(),
            from_name: String::new(),
            sender: String::new(),
            reply_to: Vec::new(),
            recipients: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            subject: String::new(),
            body: String::new(),
            alt_body: None,
            content_type: ContentType::text_plain(),
            charset: DEFAULT_CHARSET.to_string(),
            transfer_encoding: TransferEncoding::default(),
            is_html: false,
            custom_headers: Vec::new(),
            attachments: Vec::new(),
        }
    }
}

impl MailEnvelope {
    /// Every recipient address (to, cc, bcc), in that order.
    #[must_use]
    pub fn all_recipients(&self) -> impl Iterator<Item = &str> {
        self.recipients
            .iter()
            .chain(&self.cc)
            .chain(&self.bcc)
            .map(|mailbox| mailbox.address.as_str())
    }
}

/// Where an attachment's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentSource {
    /// A file read at send time.
    Path(PathBuf),
    /// Decoded bytes owned by the envelope.
    Content(Vec<u8>),
}

/// A file attached to the envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Byte source.
    pub source: AttachmentSource,
    /// Name presented to the recipient.
    pub filename: String,
    /// MIME type.
    pub mime_type: String,
    /// Encoding used on the wire.
    pub transfer_encoding: TransferEncoding,
}

impl Attachment {
    /// Attaches a file by path.
    #[must_use]
    pub fn from_path(
        path: impl Into<PathBuf>,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            source: AttachmentSource::Path(path.into()),
            filename: filename.into(),
            mime_type: mime_type.into(),
            transfer_encoding: TransferEncoding::Base64,
        }
    }

    /// Attaches owned bytes.
    #[must_use]
    pub fn from_content(
        content: Vec<u8>,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            source: AttachmentSource::Content(content),
            filename: filename.into(),
            mime_type: mime_type.into(),
            transfer_encoding: TransferEncoding::Base64,
        }
    }

    /// The path reference, if the attachment is file-backed.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            AttachmentSource::Path(path) => Some(path),
            AttachmentSource::Content(_) => None,
        }
    }

    /// Renders the attachment body in its transfer encoding.
    ///
    /// File-backed attachments are read here.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing file cannot be read.
    pub fn encoded(&self) -> io::Result<String> {
        let bytes = match &self.source {
            AttachmentSource::Path(path) => std::fs::read(path)?,
            AttachmentSource::Content(content) => content.clone(),
        };

        Ok(match self.transfer_encoding {
            TransferEncoding::Base64 => encode_base64(&bytes),
            _ => String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/// An envelope together with the conditions recovered while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composed {
    /// The finished envelope.
    pub envelope: MailEnvelope,
    /// Recovered conditions, in the order they occurred.
    pub warnings: Vec<Warning>,
}

/// Envelope under construction, threaded through one composition.
#[derive(Debug, Default)]
pub(crate) struct EnvelopeBuilder {
    pub(crate) envelope: MailEnvelope,
    warnings: Vec<Warning>,
}

impl EnvelopeBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Logs and records a recovered condition.
    pub(crate) fn warn(&mut self, warning: Warning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Sets the body and whether it is HTML.
    pub(crate) fn set_body(&mut self, body: impl Into<String>, is_html: bool) {
        self.envelope.body = body.into();
        self.envelope.is_html = is_html;
    }

    pub(crate) fn set_alt_body(&mut self, alt_body: impl Into<String>) {
        self.envelope.alt_body = Some(alt_body.into());
    }

    pub(crate) fn set_content_type(&mut self, content_type: ContentType) {
        self.envelope.content_type = content_type;
    }

    pub(crate) fn finish(self) -> Composed {
        Composed {
            envelope: self.envelope,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_defaults() {
        let envelope = MailEnvelope::default();
        assert_eq!(envelope.charset, "UTF-8");
        assert_eq!(envelope.content_type.essence(), "text/plain");
        assert_eq!(envelope.transfer_encoding, TransferEncoding::EightBit);
        assert!(envelope.alt_body.is_none());
        assert!(envelope.attachments.is_empty());
    }

    #[test]
    fn test_all_recipients_order() {
        let envelope = MailEnvelope {
            recipients: vec![Mailbox::new("to@example.com")],
            cc: vec![Mailbox::new("cc@example.com")],
            bcc: vec![Mailbox::new("bcc@example.com")],
            ..Default::default()
        };
        let all: Vec<&str> = envelope.all_recipients().collect();
        assert_eq!(all, ["to@example.com", "cc@example.com", "bcc@example.com"]);
    }

    #[test]
    fn test_attachment_encoded_content() {
        let attachment = Attachment::from_content(b"Hello".to_vec(), "hello.txt", "text/plain");
        assert_eq!(attachment.encoded().unwrap(), "SGVsbG8=");
        assert!(attachment.path().is_none());
    }

    #[test]
    fn test_attachment_encoded_missing_file() {
        let attachment = Attachment::from_path(
            "/nonexistent/missive/file.bin",
            "file.bin",
            "application/octet-stream",
        );
        assert!(attachment.encoded().is_err());
        assert!(attachment.path().is_some());
    }

    #[test]
    fn test_builder_records_warnings() {
        let mut builder = EnvelopeBuilder::new();
        builder.set_body("<b>x</b>", true);
        builder.warn(Warning::UnsupportedContentType("application/unknown".into()));

        let composed = builder.finish();
        assert!(composed.envelope.is_html);
        assert_eq!(composed.warnings.len(), 1);
    }
}
