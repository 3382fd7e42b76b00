//! Mailer configuration model.
//!
//! Loading and storing configuration is left to the embedding application;
//! these types only describe it. Empty strings mean "not configured".

use serde::{Deserialize, Serialize};

/// Security/encryption mode for the SMTP connection.
///
/// Serialized under the configured protocol names: `ssl` for implicit TLS,
/// `tls` for STARTTLS, `standard` for none. Any other protocol name reads
/// as no encryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Security {
    /// No encryption.
    #[default]
    #[serde(rename = "standard")]
    None,
    /// Implicit TLS (connect directly with TLS).
    #[serde(rename = "ssl")]
    Tls,
    /// STARTTLS upgrade after plaintext connect.
    #[serde(rename = "tls")]
    StartTls,
}

impl Security {
    /// Maps a configured protocol name (`ssl`, `tls`, anything else).
    #[must_use]
    pub fn from_protocol(protocol: &str) -> Self {
        match protocol.trim().to_ascii_lowercase().as_str() {
            "ssl" => Self::Tls,
            "tls" => Self::StartTls,
            _ => Self::None,
        }
    }

    /// Get default port for the security mode.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::None => 25,
            Self::StartTls => 587,
            Self::Tls => 465,
        }
    }
}

impl From<String> for Security {
    fn from(protocol: String) -> Self {
        Self::from_protocol(&protocol)
    }
}

/// SMTP server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpSettings {
    /// Primary server hostname.
    pub host: String,
    /// Backup server hostname, tried after the primary.
    pub backup_host: String,
    /// Server port; `0` means the default for the security mode.
    pub port: u16,
    /// Security mode.
    pub protocol: Security,
    /// Username for authentication.
    pub username: String,
    /// Password for authentication.
    pub password: String,
}

/// Mailer configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailerConfig {
    /// Display name used for the sender.
    pub from_name: String,
    /// Site name, the display name when `from_name` is empty.
    pub site_name: String,
    /// Sender address used when a message carries none.
    pub default_from: String,
    /// Site address; overrides the message's `From` header when set.
    pub site_mail: String,
    /// Whether HTML bodies may be sent. When false, callers format bodies
    /// with [`crate::format_body`] before composing.
    pub allow_html: bool,
    /// Turns on transport-level debugging.
    pub debug: bool,
    /// SMTP server settings.
    pub smtp: SmtpSettings,
}

impl MailerConfig {
    /// The sender display name: `from_name`, else `site_name`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        non_empty(&self.from_name)
            .or_else(|| non_empty(&self.site_name))
            .unwrap_or_default()
    }
}

/// Returns the trimmed value, or `None` when it is blank.
pub(crate) fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_security_from_protocol() {
        assert_eq!(Security::from_protocol("ssl"), Security::Tls);
        assert_eq!(Security::from_protocol("TLS"), Security::StartTls);
        assert_eq!(Security::from_protocol("standard"), Security::None);
        assert_eq!(Security::from_protocol(""), Security::None);
    }

    #[test]
    fn test_security_default_port() {
        assert_eq!(Security::None.default_port(), 25);
        assert_eq!(Security::StartTls.default_port(), 587);
        assert_eq!(Security::Tls.default_port(), 465);
    }

    #[test]
    fn test_display_name_precedence() {
        let mut config = MailerConfig {
            site_name: "Example Site".into(),
            ..Default::default()
        };
        assert_eq!(config.display_name(), "Example Site");

        config.from_name = "Support".into();
        assert_eq!(config.display_name(), "Support");

        config.from_name = "   ".into();
        assert_eq!(config.display_name(), "Example Site");
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: MailerConfig = serde_json::from_str(
            r#"{
                "site_mail": "noreply@example.com",
                "allow_html": true,
                "smtp": { "host": "smtp.example.com", "port": 465, "protocol": "ssl" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.site_mail, "noreply@example.com");
        assert!(config.allow_html);
        assert!(config.default_from.is_empty());
        assert_eq!(config.smtp.protocol, Security::Tls);
        assert_eq!(config.smtp.port, 465);
        assert!(config.smtp.backup_host.is_empty());
    }

    #[test]
    fn test_deserialize_standard_protocol() {
        let settings: SmtpSettings = serde_json::from_str(r#"{ "protocol": "standard" }"#).unwrap();
        assert_eq!(settings.protocol, Security::None);
    }

    #[test]
    fn test_deserialize_protocol_leniently() {
        let settings: SmtpSettings = serde_json::from_str(r#"{ "protocol": "SSL" }"#).unwrap();
        assert_eq!(settings.protocol, Security::Tls);

        let settings: SmtpSettings = serde_json::from_str(r#"{ "protocol": " Tls " }"#).unwrap();
        assert_eq!(settings.protocol, Security::StartTls);

        let settings: SmtpSettings = serde_json::from_str(r#"{ "protocol": "plain" }"#).unwrap();
        assert_eq!(settings.protocol, Security::None);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = MailerConfig {
            from_name: "Support".into(),
            smtp: SmtpSettings {
                host: "smtp.example.com".into(),
                protocol: Security::StartTls,
                ..Default::default()
            },
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: MailerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
