//! Application configuration parsed from environment variables.

use crate::error::ConfigError;

pub const DEFAULT_ALIAS_DOMAIN: &str = "webhookmail.mmoat.io";
pub const DEFAULT_ATTACHMENTS_BUCKET: &str = "email-attachments";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Domain used to build inbound alias addresses.
    pub alias_domain: String,
    /// Storage bucket holding email attachments.
    pub attachments_bucket: String,
    pub port: u16,
    /// Whether issued cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `ALIAS_DOMAIN`: default `webhookmail.mmoat.io`
    /// - `ATTACHMENTS_BUCKET`: default `email-attachments`
    /// - `PORT`: default 3000
    /// - `COOKIE_SECURE`: boolean, default false
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but is not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let alias_domain = string_or(lookup("ALIAS_DOMAIN"), DEFAULT_ALIAS_DOMAIN);
        let attachments_bucket = string_or(lookup("ATTACHMENTS_BUCKET"), DEFAULT_ATTACHMENTS_BUCKET);
        let port = parse_port(lookup("PORT").as_deref())?;
        let cookie_secure = lookup("COOKIE_SECURE")
            .as_deref()
            .and_then(parse_bool)
            .unwrap_or(false);

        Ok(Self { alias_domain, attachments_bucket, port, cookie_secure })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            alias_domain: DEFAULT_ALIAS_DOMAIN.to_owned(),
            attachments_bucket: DEFAULT_ATTACHMENTS_BUCKET.to_owned(),
            port: DEFAULT_PORT,
            cookie_secure: false,
        }
    }
}

/// Parse a boolean flag. Unrecognised values yield `None`.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// Blank counts as unset.
fn string_or(raw: Option<String>, default: &str) -> String {
    raw.map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

fn parse_port(raw: Option<&str>) -> Result<u16, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_PORT),
        Some(value) => value
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(value.to_owned())),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
