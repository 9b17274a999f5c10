use http::{Method, StatusCode};
use std::{error::Error as StdError, fmt};
use thiserror::Error;
use url::Url;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy)]
pub struct BodySnippetConfig {
    pub enabled: bool,
    pub max_bytes: usize,
}

impl Default for BodySnippetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_bytes: 4096,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    Transport,
    RequestFailed,
    MalformedResponse,
    NameCollision,
    InvalidConfig,
    ClientDropped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Other,
}

/// Details of a response whose status fell outside `200..=399`.
#[derive(Debug, Clone)]
pub struct HttpError {
    pub status: StatusCode,
    pub method: Method,
    /// Sanitized URL: no query/fragment/userinfo.
    pub url: Box<Url>,
    pub message: Option<Box<str>>,
    pub request_id: Option<Box<str>>,
    pub body_snippet: Option<Box<str>>,
}

impl HttpError {
    #[must_use]
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

/// The decoded body was valid JSON but not the object an entity needs.
#[derive(Debug, Error)]
#[error("expected a JSON object, found {found}")]
pub struct UnexpectedShape {
    pub found: &'static str,
}

/// All errors returned by the client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("Transport error during {method} {path}: {source}")]
    Transport {
        method: Method,
        path: Box<str>,
        kind: TransportErrorKind,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("{context}: {error}")]
    RequestFailed {
        context: Box<str>,
        error: HttpError,
    },

    #[error("{context}: malformed response (HTTP {status}) during {method} {path}: {source}")]
    MalformedResponse {
        context: Box<str>,
        status: StatusCode,
        method: Method,
        path: Box<str>,
        body_snippet: Option<Box<str>>,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("Job {name} already exists")]
    NameCollision { name: Box<str> },

    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        message: Box<str>,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    #[error("the Jenkins client backing this entity has been dropped")]
    ClientDropped,
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } => ErrorKind::Transport,
            Self::RequestFailed { .. } => ErrorKind::RequestFailed,
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::NameCollision { .. } => ErrorKind::NameCollision,
            Self::InvalidConfig { .. } => ErrorKind::InvalidConfig,
            Self::ClientDropped => ErrorKind::ClientDropped,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::RequestFailed { error, .. } => Some(error.status),
            Self::MalformedResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The operation-specific message attached by the validator or mapper.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::RequestFailed { context, .. } | Self::MalformedResponse { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::RequestFailed { error, .. } => error.request_id.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        )
    }

    pub(crate) fn invalid_config(
        message: impl Into<Box<str>>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::InvalidConfig {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {} ({} {})", self.status, self.method, self.path())?;
        if let Some(message) = self.message.as_deref() {
            write!(f, ": {message}")?;
        }
        if let Some(request_id) = self.request_id.as_deref() {
            write!(f, " [request-id: {request_id}]")?;
        }
        Ok(())
    }
}
