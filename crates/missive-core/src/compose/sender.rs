//! Sender resolution.

use missive_mime::Headers;
use missive_mime::address::{is_valid_address, split_display_address};
use tracing::error;

use super::Context;
use crate::config::non_empty;
use crate::envelope::EnvelopeBuilder;
use crate::error::{Error, Result};

/// Resolves `from`, `from_name` and `sender`, adjusting the working headers.
///
/// A configured site address replaces the `From` header. Without a
/// `Reply-To` header one is derived from the request's sender.
pub(super) fn resolve(
    ctx: &Context<'_>,
    headers: &mut Headers,
    builder: &mut EnvelopeBuilder,
) -> Result<()> {
    let config = ctx.config;
    let mut from_name = config.display_name().to_string();

    if let Some(site_mail) = non_empty(&config.site_mail) {
        headers.insert("From", site_mail);
    }

    if headers.get("Reply-To").and_then(non_empty).is_none()
        && let Some(reply_to) = derive_reply_to(&ctx.request.from)
    {
        headers.insert("Reply-To", reply_to);
    }

    let Some(from) = [&ctx.request.from, &config.default_from, &config.site_mail]
        .into_iter()
        .find_map(|candidate| non_empty(candidate))
    else {
        error!("There is no submitted from address");
        return Err(Error::MissingSenderAddress);
    };

    let address = if let Some(mailbox) = split_display_address(from) {
        if !mailbox.name.is_empty() {
            from_name = mailbox.name;
        }
        mailbox.address
    } else if is_valid_address(from) {
        from.to_string()
    } else {
        error!(from, "The submitted from address is not valid");
        return Err(Error::InvalidSenderAddress(from.to_string()));
    };

    let envelope = &mut builder.envelope;
    envelope.from_name = from_name;
    envelope.sender.clone_from(&address);
    envelope.from = address;
    Ok(())
}

/// The text inside `<...>` when present, else the whole value.
fn derive_reply_to(from: &str) -> Option<&str> {
    let inner = match from.rfind('<') {
        Some(open) => {
            let rest = &from[open + 1..];
            rest.find('>').map_or(rest, |close| &rest[..close])
        }
        None => from,
    };
    non_empty(inner)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::collaborators::Collaborators;
    use crate::config::MailerConfig;
    use crate::request::OutboundMessageRequest;

    fn run(
        config: &MailerConfig,
        request: &OutboundMessageRequest,
    ) -> (Result<()>, Headers, EnvelopeBuilder) {
        let collaborators = Collaborators::default();
        let ctx = Context {
            config,
            collaborators: &collaborators,
            request,
        };
        let mut headers = request.headers.clone();
        let mut builder = EnvelopeBuilder::new();
        let result = resolve(&ctx, &mut headers, &mut builder);
        (result, headers, builder)
    }

    #[test]
    fn test_derive_reply_to() {
        assert_eq!(derive_reply_to("Site <site@example.com>"), Some("site@example.com"));
        assert_eq!(derive_reply_to("site@example.com"), Some("site@example.com"));
        assert_eq!(derive_reply_to("  "), None);
        assert_eq!(derive_reply_to("Broken <"), None);
    }

    #[test]
    fn test_request_from_wins() {
        let config = MailerConfig {
            site_name: "Site".into(),
            default_from: "default@example.com".into(),
            ..Default::default()
        };
        let request = OutboundMessageRequest::default().with_from("user@example.com");

        let (result, headers, builder) = run(&config, &request);
        result.unwrap();
        assert_eq!(builder.envelope.from, "user@example.com");
        assert_eq!(builder.envelope.sender, "user@example.com");
        assert_eq!(builder.envelope.from_name, "Site");
        assert_eq!(headers.get("reply-to"), Some("user@example.com"));
    }

    #[test]
    fn test_display_form_splits_name() {
        let config = MailerConfig {
            from_name: "Configured".into(),
            ..Default::default()
        };
        let request =
            OutboundMessageRequest::default().with_from("\"Jane Roe\" <jane@example.com>");

        let (result, headers, builder) = run(&config, &request);
        result.unwrap();
        assert_eq!(builder.envelope.from, "jane@example.com");
        assert_eq!(builder.envelope.from_name, "Jane Roe");
        assert_eq!(headers.get("Reply-To"), Some("jane@example.com"));
    }

    #[test]
    fn test_fallback_to_default_then_site_mail() {
        let mut config = MailerConfig {
            default_from: "default@example.com".into(),
            site_mail: "site@example.com".into(),
            ..Default::default()
        };
        let request = OutboundMessageRequest::default();

        let (result, headers, builder) = run(&config, &request);
        result.unwrap();
        assert_eq!(builder.envelope.from, "default@example.com");
        assert_eq!(headers.get("From"), Some("site@example.com"));
        assert!(headers.get("Reply-To").is_none());

        config.default_from.clear();
        let (result, _, builder) = run(&config, &request);
        result.unwrap();
        assert_eq!(builder.envelope.from, "site@example.com");
    }

    #[test]
    fn test_existing_reply_to_kept() {
        let request = OutboundMessageRequest::default()
            .with_from("user@example.com")
            .with_header("reply-to", "replies@example.com");

        let (result, headers, _) = run(&MailerConfig::default(), &request);
        result.unwrap();
        assert_eq!(headers.get("Reply-To"), Some("replies@example.com"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_missing_sender() {
        let (result, _, _) = run(&MailerConfig::default(), &OutboundMessageRequest::default());
        assert!(matches!(result, Err(Error::MissingSenderAddress)));
    }

    #[test]
    fn test_invalid_sender() {
        let request = OutboundMessageRequest::default().with_from("not an address");
        let (result, _, _) = run(&MailerConfig::default(), &request);
        assert!(matches!(
            result,
            Err(Error::InvalidSenderAddress(from)) if from == "not an address"
        ));
    }
}
