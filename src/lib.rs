//! Blocking client for the Jenkins JSON/REST API.
//!
//! ```no_run
//! use jenkins_rest::JenkinsClient;
//!
//! let client = JenkinsClient::builder("https://ci.example.com")?
//!     .auth_basic("user", "api-token")
//!     .with_crumbs()
//!     .build()?;
//!
//! if let Some(job) = client.get_job("core")? {
//!     job.launch([("branch", "main")])?;
//! }
//! # Ok::<(), jenkins_rest::Error>(())
//! ```
//!
//! Entities ([`Job`], [`Build`], [`View`], ...) keep a weak link back to the
//! client for follow-up calls; they never keep it alive.

mod api;
pub mod auth;
pub mod client;
pub mod crumb;
pub mod endpoint;
pub mod error;
pub mod mapper;
pub mod request_hook;
pub mod transport;
pub mod types;
pub(crate) mod util;
pub mod validate;

#[cfg(test)]
mod testing;

pub use auth::{Auth, SecretString};
pub use client::{ClientBuilder, ClientHandle, JenkinsClient};
pub use crumb::CrumbHeader;
pub use endpoint::BUILD_TREE;
pub use error::{
    BodySnippetConfig, Error, ErrorKind, HttpError, Result, TransportErrorKind, UnexpectedShape,
};
pub use mapper::Mapped;
pub use request_hook::{RequestHook, RequestHookContext};
pub use transport::{Request, RequestBody, Response, Transport, TransportRequest, TransportResponse};
#[cfg(feature = "ureq")]
pub use transport::{UreqTransport, ureq_transport::UreqConfig};
pub use types::*;
