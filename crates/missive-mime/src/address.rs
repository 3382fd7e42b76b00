//! Recipient and sender address handling.
//!
//! Recipient lists are parsed leniently: no syntax validation is applied and
//! malformed entries become best-effort address strings. Only the sender goes
//! through [`is_valid_address`].

use std::fmt;

/// Mailbox (display name + address).
///
/// An absent display name is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mailbox {
    /// Display name, empty when none was given.
    pub name: String,
    /// Email address.
    pub address: String,
}

impl Mailbox {
    /// Creates a mailbox with just an address.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            address: address.into(),
        }
    }

    /// Creates a mailbox with a display name and address.
    #[must_use]
    pub fn with_name(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    /// Parses a single `Name <address>` or bare `address` entry.
    ///
    /// The name is the text before `<` with surrounding quotes removed; the
    /// address is the text after it with the trailing `>` removed. A missing
    /// `>` still yields the text after `<` as the address.
    #[must_use]
    pub fn parse(entry: &str) -> Self {
        let entry = entry.trim();
        match entry.split_once('<') {
            Some((name, address)) => Self {
                name: name.trim().trim_matches('"').trim().to_string(),
                address: address.trim().trim_end_matches('>').trim().to_string(),
            },
            None => Self::new(entry),
        }
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.address)
        } else {
            write!(f, "{} <{}>", self.name, self.address)
        }
    }
}

/// Splits a comma-separated recipient string into mailboxes.
///
/// Order is preserved and duplicates are kept. Blank entries (for example a
/// trailing comma) are skipped.
///
/// ```
/// use missive_mime::address::parse_address_list;
///
/// let list = parse_address_list("John Doe <john@example.com>, jane@example.com");
/// assert_eq!(list[0].name, "John Doe");
/// assert_eq!(list[0].address, "john@example.com");
/// assert_eq!(list[1].name, "");
/// assert_eq!(list[1].address, "jane@example.com");
/// ```
#[must_use]
pub fn parse_address_list(list: &str) -> Vec<Mailbox> {
    list.split(',')
        .filter(|entry| !entry.trim().is_empty())
        .map(Mailbox::parse)
        .collect()
}

/// Recognizes the `"Name" <address>` form.
///
/// Returns the split mailbox when the value ends in `<…>`, with or without a
/// (quoted) display name before it.
#[must_use]
pub fn split_display_address(value: &str) -> Option<Mailbox> {
    let value = value.trim();
    let inner = value.strip_suffix('>')?;
    let open = inner.rfind('<')?;

    Some(Mailbox::with_name(
        inner[..open].trim().trim_matches('"').trim(),
        inner[open + 1..].trim(),
    ))
}

/// Checks that a string looks like a bare email address.
///
/// Requires exactly one `@`, a non-empty local part, and a domain made of
/// non-empty dot-separated labels. Whitespace, angle brackets and commas are
/// rejected.
#[must_use]
pub fn is_valid_address(addr: &str) -> bool {
    if addr.is_empty() || addr.contains(|c: char| c.is_whitespace() || "<>,".contains(c)) {
        return false;
    }

    let Some((local, domain)) = addr.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_list() {
        let list = parse_address_list("John Doe <john@example.com>, jane@example.com");
        assert_eq!(
            list,
            vec![
                Mailbox::with_name("John Doe", "john@example.com"),
                Mailbox::new("jane@example.com"),
            ]
        );
    }

    #[test]
    fn test_parse_list_keeps_duplicates_and_order() {
        let list = parse_address_list("b@x.org,a@x.org,b@x.org");
        let addresses: Vec<&str> = list.iter().map(|m| m.address.as_str()).collect();
        assert_eq!(addresses, ["b@x.org", "a@x.org", "b@x.org"]);
    }

    #[test]
    fn test_parse_list_skips_blank_entries() {
        assert_eq!(parse_address_list("a@x.org, ,").len(), 1);
        assert!(parse_address_list("").is_empty());
    }

    #[test]
    fn test_parse_quoted_name() {
        let mailbox = Mailbox::parse("\"Doe, Jane\" <jane@example.com>");
        assert_eq!(mailbox.name, "Doe, Jane");
        assert_eq!(mailbox.address, "jane@example.com");
    }

    #[test]
    fn test_parse_missing_close_bracket() {
        let mailbox = Mailbox::parse("Bob <bob@example.com");
        assert_eq!(mailbox.name, "Bob");
        assert_eq!(mailbox.address, "bob@example.com");
    }

    #[test]
    fn test_parse_no_space_before_bracket() {
        let mailbox = Mailbox::parse("Bob<bob@example.com>");
        assert_eq!(mailbox, Mailbox::with_name("Bob", "bob@example.com"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Mailbox::new("a@x.org").to_string(), "a@x.org");
        assert_eq!(Mailbox::with_name("A", "a@x.org").to_string(), "A <a@x.org>");
    }

    #[test]
    fn test_split_display_address() {
        assert_eq!(
            split_display_address("\"Site Admin\" <admin@example.com>"),
            Some(Mailbox::with_name("Site Admin", "admin@example.com"))
        );
        assert_eq!(
            split_display_address("<admin@example.com>"),
            Some(Mailbox::new("admin@example.com"))
        );
        assert_eq!(split_display_address("admin@example.com"), None);
        assert_eq!(split_display_address("admin@example.com>"), None);
    }

    #[test]
    fn test_valid_addresses() {
        assert!(is_valid_address("user@example.com"));
        assert!(is_valid_address("first.last+tag@mail.example.co.uk"));
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(!is_valid_address(""));
        assert!(!is_valid_address("userexample.com"));
        assert!(!is_valid_address("@example.com"));
        assert!(!is_valid_address("user@"));
        assert!(!is_valid_address("a@b@c.com"));
        assert!(!is_valid_address("user@example..com"));
        assert!(!is_valid_address("user name@example.com"));
        assert!(!is_valid_address("Name <user@example.com>"));
    }

    proptest! {
        #[test]
        fn one_mailbox_per_non_blank_entry(
            entries in proptest::collection::vec("[a-z]{1,8}(@[a-z]{1,8})?", 0..8),
        ) {
            let list = parse_address_list(&entries.join(", "));
            prop_assert_eq!(list.len(), entries.len());
            for (mailbox, entry) in list.iter().zip(&entries) {
                prop_assert_eq!(&mailbox.address, entry);
            }
        }
    }
}
