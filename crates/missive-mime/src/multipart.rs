//! Multipart body decomposition.

use crate::content_type::boundary_in;
use crate::encoding::{decode_base64, decode_quoted_printable};
use crate::error::Result;
use crate::strip::split_headers;
use crate::substring::extract_between;
use std::fmt;

/// Deepest nesting level at which an inner `multipart/alternative` is still
/// decomposed. Parts below it are kept as leaves.
pub const MAX_NESTING_DEPTH: usize = 4;

/// Transfer encoding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    SevenBit,
    /// 8-bit text.
    #[default]
    EightBit,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
    /// Binary (no encoding).
    Binary,
}

impl TransferEncoding {
    /// Parses transfer encoding from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "8bit" => Self::EightBit,
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            "binary" => Self::Binary,
            _ => Self::SevenBit, // Default (includes "7bit")
        }
    }

    /// Decodes a payload written in this encoding.
    ///
    /// Encodings other than Base64 and Quoted-Printable carry the payload
    /// as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if a Base64 payload is malformed.
    pub fn decode(self, payload: &str) -> Result<Vec<u8>> {
        match self {
            Self::Base64 => decode_base64(payload),
            Self::QuotedPrintable => Ok(decode_quoted_printable(payload)),
            Self::SevenBit | Self::EightBit | Self::Binary => Ok(payload.as_bytes().to_vec()),
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::EightBit => write!(f, "8bit"),
            Self::Base64 => write!(f, "base64"),
            Self::QuotedPrintable => write!(f, "quoted-printable"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

/// What a decomposed segment contains, inferred from its part headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartKind {
    /// A nested `multipart/alternative` with its own boundary.
    Alternative {
        /// Boundary of the nested part.
        boundary: String,
    },
    /// A `text/plain` rendering.
    Plain,
    /// A `text/html` rendering.
    Html,
    /// A `Content-Disposition: attachment` file.
    Attachment,
    /// Anything else.
    Other,
}

/// One boundary-delimited segment of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyPart {
    /// The segment as it appeared between boundaries, trimmed.
    pub raw: String,
    /// The leading part-header block.
    pub headers: String,
    /// Inferred content marker.
    pub kind: PartKind,
    /// Declared `Content-Transfer-Encoding`, if any.
    pub transfer_encoding: Option<TransferEncoding>,
    /// The segment with its part headers removed.
    pub payload: String,
    /// Parts of a nested `multipart/alternative`.
    pub children: Vec<BodyPart>,
}

impl BodyPart {
    /// Classifies a segment and, for a nested `multipart/alternative`,
    /// decomposes it along its own boundary.
    ///
    /// Markers are looked up in the part-header block in this order:
    /// `multipart/alternative`, `text/plain`, `text/html`, then an
    /// attachment disposition.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MalformedHeaderFragment`] if a nested
    /// `multipart/alternative` declares no boundary.
    pub fn parse(segment: &str, depth: usize) -> Result<Self> {
        let raw = segment.trim().to_string();
        let (headers, payload) = split_headers(&raw);
        let markers = headers.to_ascii_lowercase();

        let transfer_encoding =
            extract_between(&format!("{markers}\n"), "content-transfer-encoding", " ", "\n")
                .ok()
                .map(TransferEncoding::parse);

        let mut children = Vec::new();
        let kind = if markers.contains("multipart/alternative") {
            let boundary = boundary_in(&raw)?;
            if depth < MAX_NESTING_DEPTH {
                children = decompose(&payload, &boundary, depth + 1)?;
            }
            PartKind::Alternative { boundary }
        } else if markers.contains("text/plain") {
            PartKind::Plain
        } else if markers.contains("text/html") {
            PartKind::Html
        } else if markers.contains("content-disposition: attachment") {
            PartKind::Attachment
        } else {
            PartKind::Other
        };

        Ok(Self {
            raw,
            headers,
            kind,
            transfer_encoding,
            payload,
            children,
        })
    }

    /// Returns true for a `text/plain` part.
    #[must_use]
    pub const fn is_plain(&self) -> bool {
        matches!(self.kind, PartKind::Plain)
    }

    /// Returns true for a `text/html` part.
    #[must_use]
    pub const fn is_html(&self) -> bool {
        matches!(self.kind, PartKind::Html)
    }

    /// Decodes the payload according to the declared transfer encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails.
    pub fn decoded_payload(&self) -> Result<Vec<u8>> {
        self.transfer_encoding
            .unwrap_or(TransferEncoding::SevenBit)
            .decode(&self.payload)
    }
}

/// Splits a body into trimmed, non-blank segments along a boundary.
///
/// A quoted boundary (`"token"`) is unquoted first. Text before the first
/// delimiter, blank fragments and the epilogue after the closing delimiter
/// are dropped.
///
/// ```
/// use missive_mime::split_boundary;
///
/// let body = "preamble--B\r\npart1\r\n--B\r\npart2\r\n--B--\r\n";
/// assert_eq!(split_boundary(body, "B"), vec!["part1", "part2"]);
/// ```
#[must_use]
pub fn split_boundary(body: &str, boundary: &str) -> Vec<String> {
    let boundary = unquote(boundary);
    if boundary.is_empty() {
        return Vec::new();
    }

    let delimiter = format!("--{boundary}");
    let mut fragments = Vec::new();
    let mut start = None;
    for (at, _) in body.match_indices(delimiter.as_str()) {
        let rest = &body[at + delimiter.len()..];
        let closing = rest.starts_with("--");
        // A longer boundary sharing this prefix is not a delimiter.
        if !closing && !rest.chars().next().is_none_or(char::is_whitespace) {
            continue;
        }
        if let Some(from) = start.take() {
            fragments.push(&body[from..at]);
        }
        if closing {
            break;
        }
        start = Some(at + delimiter.len());
    }
    // Unterminated body: the last fragment runs to the end.
    if let Some(from) = start {
        fragments.push(&body[from..]);
    }

    fragments
        .into_iter()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits a body along a boundary and classifies every segment.
///
/// # Errors
///
/// Returns an error if a nested multipart segment declares no boundary.
pub fn decompose(body: &str, boundary: &str, depth: usize) -> Result<Vec<BodyPart>> {
    split_boundary(body, boundary)
        .iter()
        .map(|segment| BodyPart::parse(segment, depth))
        .collect()
}

fn unquote(boundary: &str) -> &str {
    let boundary = boundary.trim();
    ["\\\"", "\""]
        .iter()
        .find_map(|quote| {
            boundary
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        })
        .unwrap_or(boundary)
}
