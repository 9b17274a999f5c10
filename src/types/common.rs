//! Identifiers and small reference types shared by the entities.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! name_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }

        impl From<&$name> for $name {
            fn from(value: &$name) -> Self {
                value.clone()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

name_type!(
    /// A job name. Inserted into paths as-is, so `folder/job/x` style names
    /// address nested items.
    JobName
);

name_type!(
    /// A view name. Percent-encoded as a single path segment.
    ViewName
);

name_type!(
    /// A computer (node) display name, e.g. `(master)` or `agent-1`.
    ComputerName
);

impl JobName {
    /// Path segments this name occupies after `job/`.
    pub(crate) fn path_segments(&self) -> impl Iterator<Item = &str> {
        raw_segments(&self.0)
    }
}

impl ComputerName {
    pub(crate) fn path_segments(&self) -> impl Iterator<Item = &str> {
        raw_segments(&self.0)
    }
}

fn raw_segments(value: &str) -> impl Iterator<Item = &str> {
    value.split('/').filter(|segment| !segment.is_empty())
}

/// `{ "name": ..., "url": ..., "color": ... }` as listed under `jobs`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct JobSummary {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// `{ "name": ..., "url": ... }` as listed under `views` / `primaryView`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct ViewSummary {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// `{ "number": ..., "url": ... }` as listed under `builds`, `lastBuild`, ...
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct BuildRef {
    pub number: u64,
    #[serde(default)]
    pub url: Option<String>,
}

/// A `{ "name": ..., "value": ... }` pair from a build or queue item's
/// `ParametersAction`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// The `actions` array: only entries carrying `parameters` matter here.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct Action {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

pub(crate) fn collect_parameters(actions: &[Option<Action>]) -> Vec<Parameter> {
    actions
        .iter()
        .flatten()
        .flat_map(|action| action.parameters.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_name_splits_on_slashes_only() {
        let name = JobName::new("folder/my job");
        assert_eq!(name.path_segments().collect::<Vec<_>>(), ["folder", "my job"]);
    }

    #[test]
    fn parameters_are_collected_across_actions() {
        let actions: Vec<Option<Action>> = serde_json::from_value(serde_json::json!([
            {},
            null,
            { "parameters": [{ "name": "env", "value": "prod" }] },
        ]))
        .unwrap();
        let params = collect_parameters(&actions);
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "env");
        assert_eq!(params[0].value, "prod");
    }
}
