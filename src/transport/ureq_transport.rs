use super::{Transport, TransportRequest, TransportResponse};
use crate::error::{Error, TransportErrorKind};
use http::{Method, header::CONTENT_TYPE};
use std::time::Duration;
use ureq::Agent;

/// Knobs for the default transport, set through `ClientBuilder`.
#[derive(Clone, Debug)]
pub struct UreqConfig {
    pub user_agent: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub no_proxy: bool,
    /// Accept invalid TLS certificates.
    pub insecure: bool,
}

impl Default for UreqConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_owned(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            no_proxy: false,
            insecure: false,
        }
    }
}

/// Default blocking transport built on `ureq`.
///
/// The agent keeps a cookie store, so the session cookie Jenkins binds a
/// crumb to is replayed on later requests. Redirects are not followed: a
/// 3xx comes back as the response, which validation accepts.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    #[must_use]
    pub fn new(config: &UreqConfig) -> Self {
        let mut builder = Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .max_redirects_will_error(false)
            .timeout_global(Some(config.timeout))
            .timeout_connect(Some(config.connect_timeout))
            .timeout_recv_body(Some(config.read_timeout))
            .user_agent(config.user_agent.as_str());

        if config.no_proxy {
            builder = builder.proxy(None);
        }

        if config.insecure {
            builder = builder.tls_config(
                ureq::tls::TlsConfig::builder()
                    .disable_verification(true)
                    .build(),
            );
        }

        Self {
            agent: Agent::new_with_config(builder.build()),
        }
    }
}

fn classify(err: &ureq::Error) -> TransportErrorKind {
    match err {
        ureq::Error::Timeout(_) => TransportErrorKind::Timeout,
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => TransportErrorKind::Connect,
        ureq::Error::Io(io) => match io.kind() {
            std::io::ErrorKind::TimedOut => TransportErrorKind::Timeout,
            std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::NotConnected => TransportErrorKind::Connect,
            _ => TransportErrorKind::Other,
        },
        _ => TransportErrorKind::Other,
    }
}

impl Transport for UreqTransport {
    fn send(&self, req: TransportRequest) -> Result<TransportResponse, Error> {
        let TransportRequest {
            method,
            url,
            headers,
            query,
            form,
            body,
        } = req;
        let path: Box<str> = url.path().into();

        let map_err = |err: ureq::Error| Error::Transport {
            method: method.clone(),
            path: path.clone(),
            kind: classify(&err),
            source: Box::new(err),
        };

        let mut response = match method {
            Method::GET => {
                let mut req = self.agent.get(url.as_str()).query_pairs(query);
                for (name, value) in headers.iter() {
                    req = req.header(name, value);
                }
                req.call().map_err(map_err)?
            }
            Method::POST => {
                let has_content_type = headers.contains_key(CONTENT_TYPE);
                let mut req = self.agent.post(url.as_str()).query_pairs(query);
                for (name, value) in headers.iter() {
                    req = req.header(name, value);
                }
                match body {
                    Some(body) => {
                        if let Some(content_type) = body.content_type.filter(|_| !has_content_type)
                        {
                            req = req.header(CONTENT_TYPE, content_type);
                        }
                        req.send(body.bytes).map_err(map_err)?
                    }
                    None if form.is_empty() => req.send_empty().map_err(map_err)?,
                    None => req.send_form(form).map_err(map_err)?,
                }
            }
            _ => {
                return Err(Error::InvalidConfig {
                    message: format!("Jenkins REST calls only use GET and POST, got {method}")
                        .into_boxed_str(),
                    source: None,
                });
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(map_err)?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
