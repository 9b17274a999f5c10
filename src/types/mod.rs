//! Typed views over Jenkins JSON payloads.

pub mod build;
pub mod common;
pub mod computer;
pub mod job;
pub mod queue;
pub mod system;
pub mod test_report;
pub mod view;

pub use build::*;
pub use common::*;
pub use computer::*;
pub use job::*;
pub use queue::*;
pub use system::*;
pub use test_report::*;
pub use view::*;
