//! The HTTP seam.
//!
//! The client never touches sockets itself: every exchange goes through a
//! [`Transport`], which receives a fully resolved request (absolute URL,
//! headers including auth and crumb, body) and hands back the raw status,
//! headers and body. Status interpretation stays in the client, so a
//! transport must return 4xx/5xx responses as `Ok`.
//!
//! Redirects, timeouts, proxies and TLS are the transport's business.

pub(crate) mod hook;
#[cfg(feature = "metrics")]
pub(crate) mod metrics;
pub mod request;
#[cfg(feature = "ureq")]
pub mod ureq_transport;

use crate::Error;
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use std::sync::Arc;
use url::Url;

pub use request::{Request, RequestBody, Response};
#[cfg(feature = "ureq")]
pub use ureq_transport::UreqTransport;

/// Raw body handed to the transport.
#[derive(Clone, Debug)]
pub struct TransportBody {
    pub bytes: Vec<u8>,
    pub content_type: Option<HeaderValue>,
}

/// A request as it goes on the wire.
#[derive(Clone, Debug)]
pub struct TransportRequest {
    pub method: Method,
    /// Absolute URL without query string.
    pub url: Url,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    /// `application/x-www-form-urlencoded` pairs; never set together with `body`.
    pub form: Vec<(String, String)>,
    pub body: Option<TransportBody>,
}

#[derive(Clone, Debug)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Anything that can complete one HTTP exchange.
pub trait Transport: Send + Sync + 'static {
    fn send(&self, req: TransportRequest) -> Result<TransportResponse, Error>;
}

pub type DynTransport = Arc<dyn Transport>;

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, req: TransportRequest) -> Result<TransportResponse, Error> {
        (**self).send(req)
    }
}
