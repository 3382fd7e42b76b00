//! Hand-off of finished envelopes to a mail transport.
//!
//! The SMTP conversation itself lives behind [`Transport`]. This module
//! derives the settings such a transport needs and drives one send per
//! request through [`Mailer`].

use std::fmt;

use tracing::{debug, error, info};

use crate::collaborators::Collaborators;
use crate::compose::Composer;
use crate::config::{MailerConfig, Security, non_empty};
use crate::envelope::MailEnvelope;
use crate::error::{Error, Result, Warning};
use crate::request::OutboundMessageRequest;

/// A delivery failure reported by a transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{diagnostic}")]
pub struct TransportError {
    /// Diagnostic text from the transport.
    pub diagnostic: String,
}

impl TransportError {
    /// Creates a transport error from a diagnostic.
    #[must_use]
    pub fn new(diagnostic: impl Into<String>) -> Self {
        Self {
            diagnostic: diagnostic.into(),
        }
    }
}

/// Something that delivers envelopes.
pub trait Transport {
    /// Delivers one envelope.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] carrying the transport's diagnostic.
    fn send(&mut self, envelope: &MailEnvelope) -> std::result::Result<(), TransportError>;
}

/// SMTP login credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Connection settings for an SMTP transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportSettings {
    /// Hosts to try in order.
    pub hosts: Vec<String>,
    /// Server port.
    pub port: u16,
    /// Security mode.
    pub security: Security,
    /// Login, when both username and password are configured.
    pub credentials: Option<Credentials>,
    /// Transport-level debugging.
    pub debug: bool,
}

impl TransportSettings {
    /// Derives transport settings from the mailer configuration.
    ///
    /// The primary host is followed by the backup host; blank hosts are
    /// skipped. A port of `0` becomes the security mode's default.
    #[must_use]
    pub fn from_config(config: &MailerConfig) -> Self {
        let smtp = &config.smtp;
        let hosts = [&smtp.host, &smtp.backup_host]
            .into_iter()
            .filter_map(|host| non_empty(host))
            .map(str::to_string)
            .collect();

        let credentials = match (non_empty(&smtp.username), non_empty(&smtp.password)) {
            (Some(username), Some(_)) => Some(Credentials {
                username: username.to_string(),
                password: smtp.password.clone(),
            }),
            _ => None,
        };

        let port = if smtp.port == 0 {
            smtp.protocol.default_port()
        } else {
            smtp.port
        };

        Self {
            hosts,
            port,
            security: smtp.protocol,
            credentials,
            debug: config.debug,
        }
    }
}

/// Composes requests and hands the envelopes to a transport.
#[derive(Debug)]
pub struct Mailer<T> {
    composer: Composer,
    transport: T,
}

impl<T: Transport> Mailer<T> {
    /// Creates a mailer with the local default collaborators.
    #[must_use]
    pub fn new(config: MailerConfig, transport: T) -> Self {
        Self {
            composer: Composer::new(config),
            transport,
        }
    }

    /// Replaces the composer's collaborators.
    #[must_use]
    pub fn with_collaborators(mut self, collaborators: Collaborators) -> Self {
        self.composer = self.composer.with_collaborators(collaborators);
        self
    }

    /// The transport in use.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Composes and sends one message.
    ///
    /// Composition failures stop before the transport is called. There is no
    /// retry.
    ///
    /// # Errors
    ///
    /// Returns composition errors unchanged and transport failures as
    /// [`Error::Transport`].
    pub fn mail(&mut self, request: &OutboundMessageRequest) -> Result<Vec<Warning>> {
        let composed = self.composer.compose(request)?;
        let envelope = &composed.envelope;

        info!("Sending mail to: {}", request.to);
        if let Err(e) = self.transport.send(envelope) {
            error!(
                from = %envelope.from,
                to = %request.to,
                diagnostic = %e,
                "Error sending e-mail"
            );
            return Err(Error::Transport(e));
        }

        debug!(warnings = composed.warnings.len(), "Mail handed to transport");
        Ok(composed.warnings)
    }
}
