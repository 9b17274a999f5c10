use super::JenkinsClient;
use crate::{
    Auth, BodySnippetConfig, Error, RequestHookContext,
    transport::{DynTransport, Transport, hook::HookTransport},
    util::url::normalize_base_url,
};
use http::{HeaderMap, HeaderName, HeaderValue};
use std::{sync::Arc, time::Duration};
use url::Url;

#[cfg(feature = "ureq")]
use crate::transport::ureq_transport::{UreqConfig, UreqTransport};

/// Configures and constructs [`JenkinsClient`].
#[cfg_attr(not(feature = "ureq"), allow(dead_code))]
pub struct ClientBuilder {
    base_url: Url,
    auth: Option<Auth>,
    insecure: bool,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    no_proxy: bool,
    crumbs: bool,
    default_headers: HeaderMap,
    body_snippet: BodySnippetConfig,
    request_hook: Option<crate::RequestHook>,
    transport: Option<DynTransport>,
}

impl ClientBuilder {
    pub(crate) fn try_new(base: impl AsRef<str>) -> Result<Self, Error> {
        let base_url = normalize_base_url(base.as_ref())?;
        Ok(Self {
            base_url,
            auth: None,
            insecure: false,
            user_agent: None,
            timeout: None,
            connect_timeout: None,
            read_timeout: None,
            no_proxy: false,
            crumbs: false,
            default_headers: HeaderMap::new(),
            body_snippet: BodySnippetConfig::default(),
            request_hook: None,
            transport: None,
        })
    }

    /// Builder seeded from `JENKINS_URL`, plus basic auth when both
    /// `JENKINS_USER` and `JENKINS_TOKEN` are set.
    pub fn from_env() -> Result<Self, Error> {
        let base = std::env::var("JENKINS_URL")
            .map_err(|err| Error::invalid_config("JENKINS_URL is not set", err))?;
        let builder = Self::try_new(base)?;
        match (std::env::var("JENKINS_USER"), std::env::var("JENKINS_TOKEN")) {
            (Ok(user), Ok(token)) => Ok(builder.auth_basic(user, token)),
            _ => Ok(builder),
        }
    }

    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn auth_basic(mut self, user: impl Into<String>, token: impl Into<String>) -> Self {
        self.auth = Some(Auth::basic(user, token));
        self
    }

    pub fn auth_bearer(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(Auth::bearer(token));
        self
    }

    pub fn no_system_proxy(mut self) -> Self {
        self.no_proxy = true;
        self
    }

    pub fn danger_accept_invalid_certs(mut self, yes: bool) -> Self {
        self.insecure = yes;
        self
    }

    /// Override the default `User-Agent` header.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    pub fn timeout(mut self, value: Duration) -> Self {
        self.timeout = Some(value);
        self
    }

    pub fn connect_timeout(mut self, value: Duration) -> Self {
        self.connect_timeout = Some(value);
        self
    }

    pub fn read_timeout(mut self, value: Duration) -> Self {
        self.read_timeout = Some(value);
        self
    }

    pub fn default_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers.extend(headers);
        self
    }

    pub fn capture_body_snippet(mut self, enabled: bool) -> Self {
        self.body_snippet.enabled = enabled;
        self
    }

    pub fn max_body_snippet_bytes(mut self, max_bytes: usize) -> Self {
        self.body_snippet.max_bytes = max_bytes;
        self
    }

    /// Fetch a crumb during [`build`](Self::build) and send it on every
    /// mutating request. Fetch failures leave crumbs disabled.
    pub fn with_crumbs(mut self) -> Self {
        self.crumbs = true;
        self
    }

    /// Add a hook invoked for every outgoing request.
    pub fn request_hook<F>(mut self, hook: F) -> Self
    where
        F: for<'a> Fn(RequestHookContext<'a>) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.request_hook = Some(Arc::new(hook));
        self
    }

    /// Use `transport` instead of the default `ureq` one. Timeout, proxy,
    /// TLS and user-agent settings only apply to the default transport.
    pub fn transport(mut self, transport: impl Transport) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    #[cfg(feature = "ureq")]
    fn default_transport(&self) -> Result<DynTransport, Error> {
        let defaults = UreqConfig::default();
        let config = UreqConfig {
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            timeout: self.timeout.unwrap_or(defaults.timeout),
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            read_timeout: self.read_timeout.unwrap_or(defaults.read_timeout),
            no_proxy: self.no_proxy,
            insecure: self.insecure,
        };
        Ok(Arc::new(UreqTransport::new(&config)))
    }

    #[cfg(not(feature = "ureq"))]
    fn default_transport(&self) -> Result<DynTransport, Error> {
        Err(Error::InvalidConfig {
            message: "no transport configured; enable the `ureq` feature or call `transport()`"
                .into(),
            source: None,
        })
    }

    pub fn build(mut self) -> Result<JenkinsClient, Error> {
        let mut transport = match self.transport.take() {
            Some(transport) => transport,
            None => self.default_transport()?,
        };

        if let Some(hook) = self.request_hook {
            transport = Arc::new(HookTransport::new(transport, hook));
        }

        let client = JenkinsClient::from_parts(
            self.base_url,
            self.auth,
            self.default_headers,
            self.body_snippet,
            transport,
        );
        if self.crumbs {
            client.enable_crumbs();
        }
        Ok(client)
    }
}
