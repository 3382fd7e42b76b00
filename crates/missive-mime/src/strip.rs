//! Removal of embedded part headers from a decomposed segment.

/// Part headers removed from the top of a segment (RFC 2045).
pub const PART_HEADERS: [&str; 4] = [
    "Content-Type",
    "Content-Transfer-Encoding",
    "Content-ID",
    "Content-Disposition",
];

/// Indentation that marks a folded header continuation line.
const FOLD_INDENT: &str = "    ";

/// Splits a segment into its leading part-header block and its payload.
///
/// The segment is trimmed first. Leading lines naming one of
/// [`PART_HEADERS`] are moved into the header block, together with any
/// folded continuation lines: when a header line ends in `;` and the next
/// line starts with four spaces, that line belongs to the header. The first
/// other line starts the payload. Both halves are returned trimmed.
#[must_use]
pub fn split_headers(segment: &str) -> (String, String) {
    let lines: Vec<&str> = segment.trim().split('\n').collect();
    let mut cursor = 0;

    while cursor < lines.len() && is_part_header(lines[cursor].trim_end()) {
        let mut line = lines[cursor].trim_end();
        cursor += 1;

        while line.ends_with(';')
            && cursor < lines.len()
            && lines[cursor].starts_with(FOLD_INDENT)
        {
            line = lines[cursor].trim_end();
            cursor += 1;
        }
    }

    let headers = lines[..cursor].join("\n");
    let payload = lines[cursor..].join("\n");
    (headers.trim().to_string(), payload.trim().to_string())
}

/// Strips the part headers from a segment and returns its payload.
///
/// ```
/// use missive_mime::strip::strip_headers;
///
/// let part = "Content-Type: text/plain\nContent-Transfer-Encoding: base64\n\nSGVsbG8=";
/// assert_eq!(strip_headers(part), "SGVsbG8=");
/// ```
#[must_use]
pub fn strip_headers(segment: &str) -> String {
    split_headers(segment).1
}

fn is_part_header(line: &str) -> bool {
    PART_HEADERS.iter().any(|name| {
        line.len() > name.len()
            && line.is_char_boundary(name.len())
            && line[..name.len()].eq_ignore_ascii_case(name)
            && line[name.len()..].starts_with(':')
    })
}
