use crate::Error;
use http::{HeaderMap, HeaderValue, Method};
use std::sync::Arc;
use url::Url;

/// What a [`RequestHook`] sees of an outgoing request.
///
/// Only headers are mutable; the hook runs after auth, default headers and
/// the crumb have been applied, so it observes exactly what goes on the wire.
pub struct RequestHookContext<'a> {
    pub method: &'a Method,
    /// URL without query/fragment.
    pub url: &'a Url,
    pub headers: &'a mut HeaderMap,
    pub query: &'a [(String, String)],
    /// Form pairs, only populated by `buildWithParameters`.
    pub form: &'a [(String, String)],
    pub body: Option<&'a [u8]>,
    pub content_type: Option<&'a HeaderValue>,
}

pub type RequestHook =
    Arc<dyn for<'a> Fn(RequestHookContext<'a>) -> Result<(), Error> + Send + Sync + 'static>;
