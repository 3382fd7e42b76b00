//! Delimited token extraction from header fragments.

use crate::error::{Error, Result};

/// Extracts the text between two delimiters that follow a token.
///
/// Finds the first occurrence of `target`, then the first `begin` after it,
/// then the first `end` after that, and returns what lies strictly between
/// the two delimiters.
///
/// ```
/// use missive_mime::substring::extract_between;
///
/// let header = "multipart/mixed; boundary=\"b1\"";
/// assert_eq!(extract_between(header, "boundary", "\"", "\"").unwrap(), "b1");
/// ```
///
/// # Errors
///
/// Returns [`Error::MalformedHeaderFragment`] if the token or either
/// delimiter is absent.
pub fn extract_between<'a>(
    source: &'a str,
    target: &str,
    begin: &str,
    end: &str,
) -> Result<&'a str> {
    let not_found = || Error::malformed(target);

    let token = source.find(target).ok_or_else(not_found)?;
    let after_token = token + target.len();

    let open = source[after_token..].find(begin).ok_or_else(not_found)? + after_token;
    let start = open + begin.len();

    let close = source[start..].find(end).ok_or_else(not_found)? + start;

    Ok(&source[start..close])
}
