//! Jenkins operations, grouped by resource.
//!
//! Each module adds methods to [`JenkinsClient`](crate::JenkinsClient):
//! - `system`: crumbs, availability, raw `execute`
//! - `jobs`: job listing, CRUD, launching
//! - `builds`: build details, console text, test reports
//! - `queue`: the build queue
//! - `views`: views and the primary view
//! - `computers`: nodes and their executors

mod builds;
mod computers;
mod jobs;
mod queue;
mod system;
mod views;
