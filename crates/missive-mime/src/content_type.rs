//! MIME content type handling.

use crate::error::{Error, Result};
use crate::substring::extract_between;
use std::fmt;

/// How a message body must be treated, decided once per `Content-Type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentKind {
    /// `text/plain`: body used as-is.
    PlainText,
    /// `text/html`: body used as-is, flagged as HTML.
    Html,
    /// `multipart/related`: body used as-is, boundary kept on the type.
    Related,
    /// `multipart/alternative`: plain and HTML renderings of one message.
    Alternative,
    /// `multipart/mixed`: message text plus attachments.
    Mixed,
    /// Anything else, carrying the primary token that was seen.
    Unsupported(String),
}

/// MIME content type with parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Main type (e.g., "text", "multipart").
    pub main_type: String,
    /// Subtype (e.g., "plain", "mixed").
    pub sub_type: String,
    /// Parameters in header order, keys and values trimmed, unquoted and
    /// lowercased.
    pub parameters: Vec<(String, String)>,
    raw_parameters: Vec<(String, String)>,
    raw: String,
}

impl ContentType {
    /// Creates a new content type.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        let main_type = main_type.into();
        let sub_type = sub_type.into();
        let raw = format!("{main_type}/{sub_type}");
        Self {
            main_type,
            sub_type,
            parameters: Vec::new(),
            raw_parameters: Vec::new(),
            raw,
        }
    }

    /// Creates a text/plain content type.
    #[must_use]
    pub fn text_plain() -> Self {
        Self::new("text", "plain")
    }

    /// Creates a text/html content type.
    #[must_use]
    pub fn text_html() -> Self {
        Self::new("text", "html")
    }

    /// Creates a multipart/mixed content type.
    #[must_use]
    pub fn multipart_mixed() -> Self {
        Self::new("multipart", "mixed")
    }

    /// Creates a multipart/alternative content type.
    #[must_use]
    pub fn multipart_alternative() -> Self {
        Self::new("multipart", "alternative")
    }

    /// Creates a multipart/related content type with boundary.
    #[must_use]
    pub fn multipart_related(boundary: impl Into<String>) -> Self {
        Self::new("multipart", "related").with_parameter("boundary", boundary)
    }

    /// Adds a parameter, replacing an existing one with the same key.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        insert(&mut self.raw_parameters, key.clone(), value.clone());
        insert(&mut self.parameters, key, value);
        self
    }

    /// Returns a normalized (lowercased) parameter value.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&str> {
        lookup(&self.parameters, key)
    }

    /// Returns the charset parameter if present.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.parameter("charset")
    }

    /// Returns the `type/subtype` essence without parameters.
    #[must_use]
    pub fn essence(&self) -> String {
        format!("{}/{}", self.main_type, self.sub_type)
    }

    /// Classifies this content type.
    #[must_use]
    pub fn kind(&self) -> ContentKind {
        match (self.main_type.as_str(), self.sub_type.as_str()) {
            ("text", "plain") => ContentKind::PlainText,
            ("text", "html") => ContentKind::Html,
            ("multipart", "related") => ContentKind::Related,
            ("multipart", "alternative") => ContentKind::Alternative,
            ("multipart", "mixed") => ContentKind::Mixed,
            _ if self.sub_type.is_empty() => ContentKind::Unsupported(self.main_type.clone()),
            _ => ContentKind::Unsupported(self.essence()),
        }
    }

    /// Finds the multipart boundary declared by this header.
    ///
    /// An unquoted `boundary=` parameter is used as written (case preserved).
    /// Otherwise the quoted token after `boundary` is extracted from the raw
    /// header text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MalformedHeaderFragment`] if no boundary can be
    /// found.
    pub fn boundary(&self) -> Result<String> {
        match lookup(&self.raw_parameters, "boundary") {
            Some(value) if !value.is_empty() && !value.starts_with('"') => Ok(value.to_string()),
            _ => boundary_in(&self.raw),
        }
    }

    /// Parses a `Content-Type` header value.
    ///
    /// Format: `type/subtype; param1=value1; param2=value2`
    ///
    /// Parsing never fails: a value without a recognizable type yields a
    /// content type whose [`kind`](Self::kind) is
    /// [`ContentKind::Unsupported`].
    #[must_use]
    pub fn parse_header(value: &str) -> Self {
        let mut main_type = String::new();
        let mut sub_type = String::new();
        let mut parameters = Vec::new();
        let mut raw_parameters = Vec::new();

        for (index, segment) in value.split(';').enumerate() {
            match segment.find('=') {
                Some(cut) if cut > 0 => {
                    let key = segment[..cut].trim().to_lowercase();
                    let raw_value = segment[cut + 1..].trim();
                    insert(&mut raw_parameters, key.clone(), raw_value.to_string());
                    insert(&mut parameters, key, raw_value.trim_matches('"').to_lowercase());
                }
                _ if index == 0 => {
                    let essence = segment.trim().to_lowercase();
                    let (main, sub) = essence.split_once('/').unwrap_or((essence.as_str(), ""));
                    main_type = main.trim().to_string();
                    sub_type = sub.trim().to_string();
                }
                _ => {}
            }
        }

        Self {
            main_type,
            sub_type,
            parameters,
            raw_parameters,
            raw: value.to_string(),
        }
    }
}

/// Finds the boundary declared anywhere in a header fragment.
///
/// The quoted form `boundary="…"` goes through [`extract_between`]; a bare
/// `boundary=token` runs up to the next `;` or whitespace.
pub(crate) fn boundary_in(fragment: &str) -> Result<String> {
    let not_found = || Error::malformed("boundary");
    let at = fragment.find("boundary").ok_or_else(not_found)?;
    let rest = fragment[at + "boundary".len()..].trim_start();
    let value = rest.strip_prefix('=').ok_or_else(not_found)?.trim_start();

    if value.starts_with('"') {
        return extract_between(fragment, "boundary", "\"", "\"").map(str::to_string);
    }

    let token = value
        .split(|c: char| c == ';' || c.is_whitespace())
        .next()
        .unwrap_or_default();
    if token.is_empty() {
        Err(not_found())
    } else {
        Ok(token.to_string())
    }
}

fn insert(parameters: &mut Vec<(String, String)>, key: String, value: String) {
    if let Some(slot) = parameters.iter_mut().find(|(k, _)| *k == key) {
        slot.1 = value;
    } else {
        parameters.push((key, value));
    }
}

fn lookup<'a>(parameters: &'a [(String, String)], key: &str) -> Option<&'a str> {
    parameters
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.as_str())
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let main = &self.main_type;
        let sub = &self.sub_type;
        write!(f, "{main}/{sub}")?;

        for (key, value) in &self.raw_parameters {
            let value = value.trim_matches('"');
            // Quote value if it contains special characters
            if value.contains(|c: char| c.is_whitespace() || "()<>@,;:\\\"/[]?=".contains(c)) {
                write!(f, "; {key}=\"{value}\"")?;
            } else {
                write!(f, "; {key}={value}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_new() {
        let ct = ContentType::new("text", "plain");
        assert_eq!(ct.main_type, "text");
        assert_eq!(ct.sub_type, "plain");
        assert!(ct.parameters.is_empty());
        assert_eq!(ct.kind(), ContentKind::PlainText);
    }

    #[test]
    fn test_parse_charset_lowercased() {
        let ct = ContentType::parse_header("text/plain; charset=UTF-8; format=flowed");
        assert_eq!(ct.kind(), ContentKind::PlainText);
        assert_eq!(ct.charset(), Some("utf-8"));
        assert_eq!(ct.parameter("format"), Some("flowed"));
    }

    #[test]
    fn test_parse_quoted_charset_unquoted() {
        let ct = ContentType::parse_header("text/html; charset=\"UTF-8\"");
        assert_eq!(ct.charset(), Some("utf-8"));
    }

    #[test]
    fn test_parse_without_charset() {
        let ct = ContentType::parse_header("text/html");
        assert_eq!(ct.kind(), ContentKind::Html);
        assert_eq!(ct.charset(), None);
    }

    #[test]
    fn test_parse_classifies_multipart() {
        let related = ContentType::parse_header("multipart/related; boundary=\"r\"");
        let alternative = ContentType::parse_header("Multipart/Alternative; boundary=\"a\"");
        let mixed = ContentType::parse_header("multipart/mixed; boundary=\"m\"");
        assert_eq!(related.kind(), ContentKind::Related);
        assert_eq!(alternative.kind(), ContentKind::Alternative);
        assert_eq!(mixed.kind(), ContentKind::Mixed);
    }

    #[test]
    fn test_parse_unsupported() {
        let ct = ContentType::parse_header("application/unknown");
        assert_eq!(
            ct.kind(),
            ContentKind::Unsupported("application/unknown".to_string())
        );
    }

    #[test]
    fn test_parse_parameters_only() {
        let ct = ContentType::parse_header("charset=utf-8");
        assert_eq!(ct.kind(), ContentKind::Unsupported(String::new()));
        assert_eq!(ct.charset(), Some("utf-8"));
    }

    #[test]
    fn test_boundary_quoted_keeps_case() {
        let ct = ContentType::parse_header("multipart/mixed; boundary=\"----=_Part_ABC\"");
        assert_eq!(ct.boundary().unwrap(), "----=_Part_ABC");
    }

    #[test]
    fn test_boundary_unquoted() {
        let ct = ContentType::parse_header("multipart/mixed; boundary=Simple123; charset=\"x\"");
        assert_eq!(ct.boundary().unwrap(), "Simple123");
    }

    #[test]
    fn test_boundary_missing() {
        let ct = ContentType::parse_header("multipart/mixed");
        assert!(ct.boundary().unwrap_err().is_not_found());
    }

    #[test]
    fn test_boundary_in_folded_fragment() {
        let fragment = "Content-Type: multipart/alternative;\n    boundary=inner2\n\n--inner2";
        assert_eq!(boundary_in(fragment).unwrap(), "inner2");

        let fragment = "Content-Type: multipart/alternative; boundary = \"in ner\"";
        assert_eq!(boundary_in(fragment).unwrap(), "in ner");

        assert!(boundary_in("boundary;").is_err());
    }

    #[test]
    fn test_content_type_display() {
        let ct = ContentType::multipart_related("b1");
        assert_eq!(ct.to_string(), "multipart/related; boundary=b1");

        let ct = ContentType::multipart_related("==_x_==");
        assert_eq!(ct.to_string(), "multipart/related; boundary=\"==_x_==\"");
    }

    #[test]
    fn test_content_type_with_parameter() {
        let ct = ContentType::new("text", "plain")
            .with_parameter("charset", "iso-8859-1")
            .with_parameter("charset", "utf-8");

        assert_eq!(ct.charset(), Some("utf-8"));
        assert_eq!(ct.parameters.len(), 1);
    }
}
