//! # missive-mime
//!
//! MIME text primitives used to turn an application-built message body into
//! the fields of an outbound envelope.
//!
//! ## Features
//!
//! - **Address lists**: Split `Name <addr>, addr` strings into mailboxes
//! - **Token extraction**: Pull delimited values (`boundary="…"`, `filename="…"`)
//!   out of header fragments
//! - **Header stripping**: Remove part headers, honouring RFC 2045 folding
//! - **Multipart decomposition**: Split bodies on boundaries into a recursive
//!   [`BodyPart`] tree
//! - **Content types**: Parse `Content-Type` values and classify them into a
//!   closed [`ContentKind`]
//! - **Encoding**: Base64 and Quoted-Printable payload decoding
//!
//! ## Quick Start
//!
//! ```ignore
//! use missive_mime::{ContentKind, ContentType, decompose};
//!
//! let header = "multipart/alternative; boundary=\"b1\"";
//! let content_type = ContentType::parse_header(header);
//! assert_eq!(content_type.kind(), ContentKind::Alternative);
//!
//! let boundary = content_type.boundary()?;
//! for part in decompose(body, &boundary, 0)? {
//!     println!("{:?}: {}", part.kind, part.payload);
//! }
//! ```
//!
//! ### Addresses
//!
//! ```ignore
//! use missive_mime::address::parse_address_list;
//!
//! let list = parse_address_list("John Doe <john@example.com>, jane@example.com");
//! assert_eq!(list[0].name, "John Doe");
//! assert_eq!(list[1].address, "jane@example.com");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content_type;
mod error;
mod header;
mod multipart;

pub mod address;
pub mod encoding;
pub mod strip;
pub mod substring;

pub use address::Mailbox;
pub use content_type::{ContentKind, ContentType};
pub use error::{Error, Result};
pub use header::Headers;
pub use multipart::{
    BodyPart, MAX_NESTING_DEPTH, PartKind, TransferEncoding, decompose, split_boundary,
};
