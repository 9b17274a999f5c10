//! Credentials attached to every request as an `Authorization` header.

use crate::Error;
use base64::{Engine, engine::general_purpose::STANDARD as B64};
use http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use std::fmt;

/// A string that never shows up in `Debug` or `Display` output.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct SecretString(String);

impl SecretString {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Jenkins accepts a user + API token over basic auth, or a bearer token
/// when a reverse proxy or plugin handles authentication.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Auth {
    Basic { user: String, token: SecretString },
    Bearer { token: SecretString },
}

impl Auth {
    #[must_use]
    pub fn basic(user: impl Into<String>, token: impl Into<String>) -> Self {
        Self::Basic {
            user: user.into(),
            token: SecretString::new(token),
        }
    }

    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: SecretString::new(token),
        }
    }

    /// Values that must be scrubbed from error messages and body snippets.
    pub(crate) fn secret(&self) -> &str {
        match self {
            Self::Basic { token, .. } | Self::Bearer { token } => token.expose(),
        }
    }

    fn header_value(&self) -> Result<HeaderValue, Error> {
        let raw = match self {
            Self::Basic { user, token } => {
                format!("Basic {}", B64.encode(format!("{user}:{}", token.expose())))
            }
            Self::Bearer { token } => format!("Bearer {}", token.expose()),
        };
        let mut value = HeaderValue::from_str(&raw)
            .map_err(|err| Error::invalid_config("invalid Authorization header value", err))?;
        value.set_sensitive(true);
        Ok(value)
    }

    pub(crate) fn apply(&self, headers: &mut HeaderMap) -> Result<(), Error> {
        headers.insert(AUTHORIZATION, self.header_value()?);
        Ok(())
    }
}
