//! The blocking Jenkins client.

mod builder;
mod handle;

pub use builder::ClientBuilder;
pub use handle::ClientHandle;

use crate::{
    Auth, BodySnippetConfig, Error, JobName, ServerRoot, ViewName,
    crumb::CrumbManager,
    endpoint,
    mapper::{DecodeContext, Mapped, decode_object},
    transport::{DynTransport, Request, Response, TransportBody, TransportRequest},
    validate::validate_with,
};
use http::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use url::Url;

#[cfg(feature = "tracing")]
use tracing::field;

/// Root metadata cache: fetched at most once per client.
enum RootState {
    Uninitialized,
    Initialized(Arc<ServerRoot>),
}

/// Handle to a Jenkins server.
///
/// Cheap to clone; clones share the crumb state and the root metadata
/// cache. Operations are defined in the `api` modules.
#[derive(Clone)]
pub struct JenkinsClient {
    pub(crate) inner: Arc<Inner>,
}

pub(crate) struct Inner {
    base: Url,
    auth: Option<Auth>,
    default_headers: HeaderMap,
    body_snippet: BodySnippetConfig,
    transport: DynTransport,
    pub(crate) crumbs: CrumbManager,
    root: Mutex<RootState>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl JenkinsClient {
    pub fn builder(base: impl AsRef<str>) -> Result<ClientBuilder, Error> {
        ClientBuilder::try_new(base)
    }

    /// Client with the default transport and no credentials.
    pub fn new(base: impl AsRef<str>) -> Result<Self, Error> {
        Self::builder(base)?.build()
    }

    pub(crate) fn from_parts(
        base: Url,
        auth: Option<Auth>,
        default_headers: HeaderMap,
        body_snippet: BodySnippetConfig,
        transport: DynTransport,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                base,
                auth,
                default_headers,
                body_snippet,
                transport,
                crumbs: CrumbManager::default(),
                root: Mutex::new(RootState::Uninitialized),
            }),
        }
    }

    /// Normalized base URL, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base
    }

    /// The server root, as given to the builder.
    #[must_use]
    pub fn url(&self) -> Url {
        self.inner.base.clone()
    }

    /// Browser URL of a job.
    pub fn job_url(&self, job: impl Into<JobName>) -> Result<Url, Error> {
        let job = job.into();
        let mut segments = vec!["job"];
        segments.extend(job.path_segments());
        crate::util::url::endpoint_url(&self.inner.base, segments)
    }

    /// Browser URL of one build.
    pub fn build_url(&self, job: impl Into<JobName>, number: u64) -> Result<Url, Error> {
        let job = job.into();
        let number = number.to_string();
        let mut segments = vec!["job"];
        segments.extend(job.path_segments());
        segments.push(&number);
        crate::util::url::endpoint_url(&self.inner.base, segments)
    }

    /// Browser URL of a view; the name is percent-encoded as one segment.
    pub fn view_url(&self, view: impl Into<ViewName>) -> Result<Url, Error> {
        let view = view.into();
        crate::util::url::endpoint_url(&self.inner.base, ["view", view.as_str()])
    }

    pub(crate) fn handle(&self) -> ClientHandle {
        ClientHandle::new(self)
    }

    /// Send `req` and fail unless the status is in `200..=399`.
    pub(crate) fn send_validated(&self, req: &Request, context: &str) -> Result<Response, Error> {
        let resp = self.execute_request(req)?;
        self.validate(&resp, context)?;
        Ok(resp)
    }

    pub(crate) fn validate(&self, resp: &Response, context: &str) -> Result<(), Error> {
        validate_with(
            resp,
            context,
            self.inner.body_snippet,
            self.inner.auth.as_ref(),
        )
    }

    pub(crate) fn decode_context<'a>(
        &'a self,
        response: &'a Response,
        context: &'a str,
    ) -> DecodeContext<'a> {
        DecodeContext {
            response,
            context,
            body_snippet: self.inner.body_snippet,
            auth: self.inner.auth.as_ref(),
        }
    }

    /// Validated request whose body must be a JSON object that `build`
    /// accepts.
    pub(crate) fn fetch<T>(
        &self,
        req: &Request,
        context: &str,
        build: impl FnOnce(Value) -> Result<T, serde_json::Error>,
    ) -> Result<T, Error> {
        let resp = self.send_validated(req, context)?;
        decode_object(&resp.body)
            .and_then(build)
            .required(&self.decode_context(&resp, context))
    }

    pub(crate) fn fetch_typed<T: DeserializeOwned>(
        &self,
        req: &Request,
        context: &str,
    ) -> Result<T, Error> {
        self.fetch(req, context, serde_json::from_value::<T>)
    }

    /// Like [`fetch`](Self::fetch), but any status other than 200 means the
    /// resource does not exist. The check runs before validation.
    pub(crate) fn fetch_if_ok<T>(
        &self,
        req: &Request,
        context: &str,
        build: impl FnOnce(Value) -> Result<T, serde_json::Error>,
    ) -> Result<Option<T>, Error> {
        let resp = self.execute_request(req)?;
        let mapped = if resp.status == http::StatusCode::OK {
            self.validate(&resp, context)?;
            decode_object(&resp.body).and_then(build)
        } else {
            Mapped::Absent
        };
        mapped.optional(&self.decode_context(&resp, context))
    }

    /// Validated request returning the body as text.
    pub(crate) fn send_text(&self, req: &Request, context: &str) -> Result<String, Error> {
        let resp = self.send_validated(req, context)?;
        Ok(resp.text_lossy().into_owned())
    }

    pub(crate) fn send_unit(&self, req: &Request, context: &str) -> Result<(), Error> {
        self.send_validated(req, context).map(|_| ())
    }

    /// Server root metadata, fetched on first use and then reused.
    pub(crate) fn root(&self) -> Result<Arc<ServerRoot>, Error> {
        let mut state = lock(&self.inner.root);
        if let RootState::Initialized(root) = &*state {
            return Ok(Arc::clone(root));
        }

        let root: Arc<ServerRoot> = Arc::new(
            self.fetch_typed(&endpoint::root(), "Error reading server root metadata")?,
        );
        #[cfg(feature = "tracing")]
        tracing::debug!(
            jobs = root.jobs.len(),
            views = root.views.len(),
            "cached server root metadata"
        );
        *state = RootState::Initialized(Arc::clone(&root));
        Ok(root)
    }

    /// One HTTP exchange: default headers, auth, request headers and, on
    /// mutating requests while crumbs are enabled, the crumb header.
    pub(crate) fn execute_request(&self, req: &Request) -> Result<Response, Error> {
        #[cfg(feature = "metrics")]
        let _inflight = crate::transport::metrics::InFlightGuard::new();

        if req.body.is_some() && !req.form.is_empty() {
            return Err(Error::InvalidConfig {
                message: "request.body and request.form are mutually exclusive".into(),
                source: None,
            });
        }

        let url = req.url(&self.inner.base)?;

        let mut headers = self.inner.default_headers.clone();
        if let Some(auth) = &self.inner.auth {
            auth.apply(&mut headers)?;
        }
        headers.extend(req.headers.clone());
        if req.is_mutating()
            && let Some(crumb) = self.inner.crumbs.active()
        {
            headers.insert(crumb.name().clone(), crumb.value().clone());
        }

        let body = req.body.clone().map(|body| TransportBody {
            bytes: body.bytes,
            content_type: body.content_type,
        });

        #[cfg(any(feature = "tracing", feature = "metrics"))]
        let start = std::time::Instant::now();
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!(
            "jenkins.request",
            http.method = %req.method,
            http.host = %self.inner.base.host_str().unwrap_or_default(),
            http.path = %url.path(),
            http.status = field::Empty,
            request_id = field::Empty,
            latency_ms = field::Empty,
            error_kind = field::Empty,
        );
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let resp = match self.inner.transport.send(TransportRequest {
            method: req.method.clone(),
            url: url.clone(),
            headers,
            query: req.query.clone(),
            form: req.form.clone(),
            body,
        }) {
            Ok(resp) => resp,
            Err(err) => {
                #[cfg(feature = "metrics")]
                crate::transport::metrics::record_outcome(
                    &req.method,
                    None,
                    start.elapsed(),
                    Some(err.kind()),
                );
                #[cfg(feature = "tracing")]
                {
                    span.record("error_kind", field::debug(err.kind()));
                    span.record("latency_ms", start.elapsed().as_millis() as i64);
                }
                return Err(err);
            }
        };

        #[cfg(feature = "metrics")]
        crate::transport::metrics::record_outcome(
            &req.method,
            Some(resp.status),
            start.elapsed(),
            None,
        );
        #[cfg(feature = "tracing")]
        {
            span.record("http.status", resp.status.as_u16() as i64);
            span.record("latency_ms", start.elapsed().as_millis() as i64);
            if let Some(rid) = crate::util::diagnostics::request_id(&resp.headers).as_deref() {
                span.record("request_id", field::display(rid));
            }
        }

        Ok(Response {
            method: req.method.clone(),
            url: req.full_url(&self.inner.base)?,
            status: resp.status,
            headers: resp.headers,
            body: resp.body,
        })
    }
}

impl std::fmt::Debug for JenkinsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JenkinsClient")
            .field("base", &self.inner.base.as_str())
            .field("auth", &self.inner.auth)
            .field("crumbs_enabled", &self.inner.crumbs.is_enabled())
            .finish_non_exhaustive()
    }
}
