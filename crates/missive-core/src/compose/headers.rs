//! Header processing.

use missive_mime::address::{parse_address_list, split_display_address};
use missive_mime::{Headers, Mailbox, TransferEncoding};
use tracing::debug;

use super::{Context, dispatch};
use crate::config::non_empty;
use crate::envelope::EnvelopeBuilder;
use crate::error::Result;

/// Applies every header to the envelope, in header order.
///
/// # Errors
///
/// Propagates `Content-Type` dispatch failures.
pub(super) fn process(
    ctx: &Context<'_>,
    headers: &Headers,
    builder: &mut EnvelopeBuilder,
) -> Result<()> {
    let return_path = headers.get("Return-Path");

    for (key, value) in headers.iter() {
        match key.to_ascii_lowercase().as_str() {
            "from" => {
                if non_empty(&ctx.request.from).is_none() {
                    let address = split_display_address(value)
                        .map_or_else(|| value.trim().to_string(), |mailbox| mailbox.address);
                    let envelope = &mut builder.envelope;
                    envelope.sender.clone_from(&address);
                    envelope.from = address;
                    envelope.from_name.clear();
                }
            }
            "content-type" => dispatch::apply(ctx, value, builder)?,
            "reply-to" => {
                if Some(value) == return_path || non_empty(value).is_none() {
                    debug!(value, "Skipping Reply-To header");
                } else {
                    builder.envelope.reply_to.push(Mailbox::parse(value));
                }
            }
            "content-transfer-encoding" => {
                builder.envelope.transfer_encoding = TransferEncoding::parse(value);
            }
            "return-path" | "mime-version" | "x-mailer" => {}
            "errors-to" => builder.envelope.custom_headers.push(format!("Errors-To: {value}")),
            "cc" => builder.envelope.cc.extend(parse_address_list(value)),
            "bcc" => builder.envelope.bcc.extend(parse_address_list(value)),
            _ => builder.envelope.custom_headers.push(format!("{key}: {value}")),
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::collaborators::Collaborators;
    use crate::config::MailerConfig;
    use crate::request::OutboundMessageRequest;

    fn run(request: &OutboundMessageRequest) -> EnvelopeBuilder {
        let config = MailerConfig::default();
        let collaborators = Collaborators::default();
        let ctx = Context {
            config: &config,
            collaborators: &collaborators,
            request,
        };
        let mut builder = EnvelopeBuilder::new();
        process(&ctx, &request.headers, &mut builder).unwrap();
        builder
    }

    #[test]
    fn test_passthrough_headers_keep_spelling() {
        let request = OutboundMessageRequest::default()
            .with_header("X-Campaign-Id", "42")
            .with_header("errors-to", "bounce@example.com")
            .with_header("MIME-Version", "1.0")
            .with_header("X-Mailer", "app");

        let builder = run(&request);
        assert_eq!(
            builder.envelope.custom_headers,
            ["X-Campaign-Id: 42", "Errors-To: bounce@example.com"]
        );
    }

    #[test]
    fn test_reply_to_equal_to_return_path_skipped() {
        let request = OutboundMessageRequest::default()
            .with_header("Return-Path", "bounce@example.com")
            .with_header("Reply-To", "bounce@example.com");
        assert!(run(&request).envelope.reply_to.is_empty());

        let request = OutboundMessageRequest::default()
            .with_header("Return-Path", "bounce@example.com")
            .with_header("Reply-To", "Support <help@example.com>");
        assert_eq!(
            run(&request).envelope.reply_to,
            [Mailbox::with_name("Support", "help@example.com")]
        );
    }

    #[test]
    fn test_cc_bcc_appended() {
        let request = OutboundMessageRequest::default()
            .with_header("Cc", "a@example.com, B <b@example.com>")
            .with_header("BCC", "c@example.com");

        let envelope = run(&request).envelope;
        assert_eq!(envelope.cc.len(), 2);
        assert_eq!(envelope.cc[1].name, "B");
        assert_eq!(envelope.bcc, [Mailbox::new("c@example.com")]);
    }

    #[test]
    fn test_transfer_encoding_header() {
        let request = OutboundMessageRequest::default()
            .with_header("Content-Transfer-Encoding", "quoted-printable");
        assert_eq!(
            run(&request).envelope.transfer_encoding,
            TransferEncoding::QuotedPrintable
        );
    }

    #[test]
    fn test_from_header_only_without_explicit_from() {
        let request =
            OutboundMessageRequest::default().with_header("From", "Site <site@example.com>");
        let envelope = run(&request).envelope;
        assert_eq!(envelope.from, "site@example.com");
        assert_eq!(envelope.sender, "site@example.com");
        assert!(envelope.from_name.is_empty());

        let request = OutboundMessageRequest::default()
            .with_from("user@example.com")
            .with_header("From", "site@example.com");
        assert!(run(&request).envelope.from.is_empty());
    }
}
