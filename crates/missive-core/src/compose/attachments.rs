//! Attachment resolution.
//!
//! Explicit attachments come from the request. Inline attachments are parts of
//! a `multipart/mixed` body marked `Content-Disposition: attachment`; they are
//! only used when the request carries no explicit attachments.

use std::path::Path;

use missive_mime::substring::extract_between;
use missive_mime::{BodyPart, TransferEncoding};
use tracing::debug;

use super::Context;
use crate::envelope::{Attachment, EnvelopeBuilder};
use crate::error::Warning;

/// Prefix of temporary files holding decoded inline attachments.
const TEMP_PREFIX: &str = "smtp";

/// Name given to in-memory content supplied without one.
const DEFAULT_FILENAME: &str = "attachment";

/// Registers the request's explicit attachments.
pub(super) fn attach_explicit(ctx: &Context<'_>, builder: &mut EnvelopeBuilder) {
    let collaborators = ctx.collaborators;

    for param in &ctx.request.attachments {
        if let Some(content) = &param.filecontent {
            let filename = param.filename.as_deref().unwrap_or(DEFAULT_FILENAME);
            let mime_type = param
                .filemime
                .clone()
                .unwrap_or_else(|| collaborators.mime.guess_mime(Path::new(filename)));
            builder
                .envelope
                .attachments
                .push(Attachment::from_content(content.clone(), filename, mime_type));
        }

        if let Some(path) = &param.filepath {
            if !collaborators.filesystem.exists(path) {
                builder.warn(Warning::AttachmentUnavailable {
                    name: path.display().to_string(),
                    reason: "file not found".to_string(),
                });
                continue;
            }

            let filename = param.filename.clone().unwrap_or_else(|| base_name(path));
            let mime_type = param
                .filemime
                .clone()
                .unwrap_or_else(|| collaborators.mime.guess_mime(path));
            builder
                .envelope
                .attachments
                .push(Attachment::from_path(path.as_path(), filename, mime_type));
        }
    }
}

/// Registers an attachment found inside a `multipart/mixed` body.
///
/// A filename naming an existing file is attached by reference. Otherwise the
/// payload is decoded and written to a temporary file.
pub(super) fn attach_inline(ctx: &Context<'_>, part: &BodyPart, builder: &mut EnvelopeBuilder) {
    let collaborators = ctx.collaborators;
    let raw = part.raw.as_str();

    let filename = extract_between(raw, "filename=", "\"", "\"")
        .or_else(|_| extract_between(raw, " name=", "\"", "\""))
        .ok()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    let declared_type = extract_between(raw, "Content-Type", " ", ";")
        .ok()
        .and_then(|value| value.lines().next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let mime_for = |path: &Path| {
        declared_type.map_or_else(|| collaborators.mime.guess_mime(path), str::to_string)
    };

    if let Some(name) = filename {
        let path = Path::new(name);
        if collaborators.filesystem.exists(path) {
            debug!(path = %path.display(), "Attaching existing file by reference");
            builder
                .envelope
                .attachments
                .push(Attachment::from_path(path, base_name(path), mime_for(path)));
            return;
        }
    }

    let display_name = filename.unwrap_or(DEFAULT_FILENAME);
    let unavailable = |reason: String| Warning::AttachmentUnavailable {
        name: display_name.to_string(),
        reason,
    };

    let bytes = match part
        .transfer_encoding
        .unwrap_or(TransferEncoding::SevenBit)
        .decode(&part.payload)
    {
        Ok(bytes) => bytes,
        Err(e) => {
            builder.warn(unavailable(e.to_string()));
            return;
        }
    };

    let stored = collaborators
        .storage
        .create_temp_file(TEMP_PREFIX)
        .and_then(|path| collaborators.storage.write(&path, &bytes));

    match stored {
        Ok(path) => {
            let filename =
                filename.map_or_else(|| base_name(&path), |name| base_name(Path::new(name)));
            let mime_type = mime_for(Path::new(&filename));
            debug!(path = %path.display(), %filename, "Stored inline attachment");
            builder
                .envelope
                .attachments
                .push(Attachment::from_path(path, filename, mime_type));
        }
        Err(e) => builder.warn(unavailable(e.to_string())),
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
