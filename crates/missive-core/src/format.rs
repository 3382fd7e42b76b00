//! Body formatting for sites that do not send HTML.

use tracing::warn;

/// Column at which plain-text bodies are wrapped.
pub const WRAP_WIDTH: usize = 77;

/// Joins body parts with a blank line.
///
/// When HTML is not allowed the result is converted to text and wrapped at
/// [`WRAP_WIDTH`] columns; otherwise it is returned as joined.
#[must_use]
pub fn format_body<S: AsRef<str>>(parts: &[S], allow_html: bool) -> String {
    let joined = parts.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("\n\n");
    if allow_html {
        return joined;
    }

    let text = match htmd::convert(&joined) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Could not convert HTML body to text");
            joined
        }
    };
    wrap_text(&text, WRAP_WIDTH)
}

/// Wraps every line at `width` characters on word boundaries.
///
/// Words longer than `width` are kept whole on their own line. Existing line
/// breaks, blank lines and leading indentation are preserved.
#[must_use]
pub fn wrap_text(text: &str, width: usize) -> String {
    text.lines()
        .map(|line| wrap_line(line.trim_end(), width))
        .collect::<Vec<_>>()
        .join("\n")
}

fn wrap_line(line: &str, width: usize) -> String {
    if line.chars().count() <= width {
        return line.to_string();
    }

    // Leading indentation carries over to every wrapped line.
    let body = line.trim_start();
    let indent = &line[..line.len() - body.len()];
    let indent_len = indent.chars().count();

    let mut wrapped = Vec::new();
    let mut current = indent.to_string();
    let mut current_len = indent_len;

    for word in body.split_whitespace() {
        let word_len = word.chars().count();
        if current_len > indent_len && current_len + 1 + word_len > width {
            wrapped.push(std::mem::replace(&mut current, indent.to_string()));
            current_len = indent_len;
        }
        if current_len > indent_len {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }
    if current_len > indent_len {
        wrapped.push(current);
    }

    wrapped.join("\n")
}
