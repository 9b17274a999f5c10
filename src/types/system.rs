use super::{JobSummary, ViewSummary};
use serde::Deserialize;

/// JSON payload of `GET crumbIssuer/api/json`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[non_exhaustive]
pub struct Crumb {
    #[serde(rename = "crumbRequestField")]
    pub crumb_request_field: String,
    pub crumb: String,
}

/// Server root metadata from `GET api/json`.
///
/// Fetched once per client and never refreshed, so job and view lists reflect
/// the server as of the first call that needed them.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[non_exhaustive]
pub struct ServerRoot {
    pub jobs: Vec<JobSummary>,
    pub views: Vec<ViewSummary>,
    pub num_executors: u32,
    pub primary_view: Option<ViewSummary>,
    pub mode: Option<String>,
    pub node_description: Option<String>,
    pub use_security: Option<bool>,
}
