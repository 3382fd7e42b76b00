//! `Content-Type` dispatch.
//!
//! Single-part types set the body directly. `multipart/alternative` and
//! `multipart/mixed` bodies are decomposed into a [`BodyPart`] tree and folded
//! into the envelope.

use missive_mime::{BodyPart, ContentKind, ContentType, PartKind, TransferEncoding, decompose};
use tracing::{debug, warn};

use super::{Context, attachments};
use crate::envelope::{DEFAULT_CHARSET, EnvelopeBuilder};
use crate::error::{Result, Warning};

/// Where in the body tree a fold runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    /// Parts of a top-level `multipart/alternative`.
    Alternative,
    /// Parts of a top-level `multipart/mixed`.
    Mixed {
        /// Whether the body carries an HTML rendering.
        has_html: bool,
    },
    /// Parts of an alternative nested inside a mixed body.
    Nested,
}

/// Applies a `Content-Type` header value to the envelope.
///
/// # Errors
///
/// Returns [`crate::Error::Mime`] if a multipart type declares no boundary.
pub(super) fn apply(ctx: &Context<'_>, value: &str, builder: &mut EnvelopeBuilder) -> Result<()> {
    let content_type = ContentType::parse_header(value);
    builder.envelope.charset = content_type.charset().unwrap_or(DEFAULT_CHARSET).to_string();
    let body = &ctx.request.body;

    match content_type.kind() {
        ContentKind::PlainText => {
            builder.set_content_type(ContentType::text_plain());
            builder.set_body(body.as_str(), false);
        }
        ContentKind::Html => {
            builder.set_content_type(ContentType::text_html());
            builder.set_body(body.as_str(), true);
        }
        ContentKind::Related => {
            let boundary = content_type.boundary()?;
            builder.set_content_type(ContentType::multipart_related(boundary));
            builder.envelope.body.clone_from(body);
        }
        ContentKind::Alternative => {
            let boundary = content_type.boundary()?;
            builder.set_content_type(ContentType::multipart_alternative());
            let parts = decompose(body, &boundary, 0)?;
            fold(ctx, &parts, Level::Alternative, builder);
        }
        ContentKind::Mixed => {
            let boundary = content_type.boundary()?;
            builder.set_content_type(ContentType::multipart_mixed());
            let parts = decompose(body, &boundary, 0)?;
            let has_html = parts
                .iter()
                .any(|part| part.is_html() || part.children.iter().any(BodyPart::is_html));
            fold(ctx, &parts, Level::Mixed { has_html }, builder);
        }
        ContentKind::Unsupported(token) => {
            debug!(%token, "Falling back to text/plain");
            builder.warn(Warning::UnsupportedContentType(value.trim().to_string()));
            builder.set_content_type(ContentType::text_plain());
            builder.set_body(body.as_str(), false);
        }
    }

    Ok(())
}

/// Folds decomposed parts into the envelope.
fn fold(ctx: &Context<'_>, parts: &[BodyPart], level: Level, builder: &mut EnvelopeBuilder) {
    for part in parts {
        match (&part.kind, level) {
            (PartKind::Alternative { .. }, Level::Mixed { .. } | Level::Nested) => {
                fold(ctx, &part.children, Level::Nested, builder);
            }
            (PartKind::Plain, Level::Alternative) => builder.set_alt_body(part.payload.as_str()),
            (PartKind::Plain, Level::Nested) => {
                builder.set_alt_body(part.payload.as_str());
                builder.set_content_type(ContentType::multipart_mixed());
            }
            (PartKind::Plain, Level::Mixed { has_html: true }) => {
                builder.set_alt_body(part.payload.as_str());
                builder.envelope.is_html = true;
                builder.set_content_type(ContentType::multipart_mixed());
            }
            (PartKind::Plain, Level::Mixed { has_html: false }) => {
                builder.set_body(part.payload.as_str(), false);
                builder.set_content_type(ContentType::multipart_mixed());
            }
            (PartKind::Html, Level::Alternative) => builder.set_body(part.payload.as_str(), true),
            (PartKind::Html, Level::Nested) => {
                let html = nested_html(part, builder);
                builder.set_body(html, true);
                builder.set_content_type(ContentType::multipart_mixed());
            }
            (PartKind::Html, Level::Mixed { .. }) => {
                builder.set_body(part.payload.as_str(), true);
                builder.set_content_type(ContentType::multipart_mixed());
            }
            (PartKind::Attachment, Level::Mixed { .. }) => {
                if ctx.request.attachments.is_empty() {
                    attachments::attach_inline(ctx, part, builder);
                } else {
                    debug!("Explicit attachments supplied, skipping inline attachment");
                }
            }
            (PartKind::Alternative { .. } | PartKind::Attachment, Level::Alternative)
            | (PartKind::Attachment, Level::Nested)
            | (PartKind::Other, _) => {
                debug!(?level, "Ignoring unclassified body part");
            }
        }
    }
}

/// The HTML rendering of a nested alternative, decoded if base64.
fn nested_html(part: &BodyPart, builder: &mut EnvelopeBuilder) -> String {
    if part.transfer_encoding != Some(TransferEncoding::Base64) {
        return part.payload.clone();
    }

    match part.decoded_payload() {
        Ok(bytes) => {
            builder.envelope.transfer_encoding = TransferEncoding::Base64;
            String::from_utf8_lossy(&bytes).into_owned()
        }
        Err(e) => {
            warn!(error = %e, "Could not decode base64 HTML part, keeping it as-is");
            part.payload.clone()
        }
    }
}
