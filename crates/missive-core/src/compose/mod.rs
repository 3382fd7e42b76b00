//! Envelope composition.
//!
//! One pass over a request: sender resolution, recipients, header processing
//! (which runs `Content-Type` dispatch), subject, explicit attachments.

mod attachments;
mod dispatch;
mod headers;
mod sender;

use missive_mime::address::parse_address_list;
use tracing::debug;

use crate::collaborators::Collaborators;
use crate::config::MailerConfig;
use crate::envelope::{Composed, EnvelopeBuilder};
use crate::error::Result;
use crate::request::OutboundMessageRequest;

/// Builds envelopes from requests.
#[derive(Debug, Default)]
pub struct Composer {
    config: MailerConfig,
    collaborators: Collaborators,
}

/// What every composition step can see.
pub(crate) struct Context<'a> {
    pub(crate) config: &'a MailerConfig,
    pub(crate) collaborators: &'a Collaborators,
    pub(crate) request: &'a OutboundMessageRequest,
}

impl Composer {
    /// Creates a composer with the local default collaborators.
    #[must_use]
    pub fn new(config: MailerConfig) -> Self {
        Self {
            config,
            collaborators: Collaborators::default(),
        }
    }

    /// Replaces the collaborators.
    #[must_use]
    pub fn with_collaborators(mut self, collaborators: Collaborators) -> Self {
        self.collaborators = collaborators;
        self
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &MailerConfig {
        &self.config
    }

    /// Builds the envelope for one request.
    ///
    /// Recovered conditions (unsupported content type, unavailable
    /// attachments) are returned alongside the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MissingSenderAddress`] or
    /// [`crate::Error::InvalidSenderAddress`] if no usable sender exists, and
    /// [`crate::Error::Mime`] if a declared multipart body has no boundary.
    pub fn compose(&self, request: &OutboundMessageRequest) -> Result<Composed> {
        let ctx = Context {
            config: &self.config,
            collaborators: &self.collaborators,
            request,
        };
        let mut builder = EnvelopeBuilder::new();
        let mut headers = request.headers.clone();

        sender::resolve(&ctx, &mut headers, &mut builder)?;

        let envelope = &mut builder.envelope;
        envelope.recipients.extend(parse_address_list(&request.to));
        envelope.cc.extend(parse_address_list(&request.cc));
        envelope.bcc.extend(parse_address_list(&request.bcc));

        headers::process(&ctx, &headers, &mut builder)?;

        builder.envelope.subject.clone_from(&request.subject);

        attachments::attach_explicit(&ctx, &mut builder);

        let composed = builder.finish();
        debug!(
            recipients = composed.envelope.recipients.len(),
            attachments = composed.envelope.attachments.len(),
            warnings = composed.warnings.len(),
            "Composed envelope"
        );
        Ok(composed)
    }
}
