use super::{Build, BuildRef};
use crate::{BUILD_TREE, ClientHandle, Error, JobName};
use serde::Deserialize;
use serde_json::Value;

/// A parameter the job accepts, from `property[].parameterDefinitions`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct ParameterDefinition {
    pub name: String,
    /// Jenkins class name, e.g. `StringParameterDefinition`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub choices: Option<Vec<String>>,
    #[serde(default)]
    default_parameter_value: Option<DefaultValue>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
struct DefaultValue {
    #[serde(default)]
    value: Value,
}

impl ParameterDefinition {
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default_parameter_value
            .as_ref()
            .map(|d| &d.value)
            .filter(|v| !v.is_null())
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct JobData {
    display_name: Option<String>,
    description: Option<String>,
    url: Option<String>,
    color: Option<String>,
    buildable: Option<bool>,
    in_queue: bool,
    builds: Vec<BuildRef>,
    last_build: Option<BuildRef>,
    last_completed_build: Option<BuildRef>,
    last_successful_build: Option<BuildRef>,
    last_failed_build: Option<BuildRef>,
    next_build_number: Option<u64>,
    property: Vec<Option<JobProperty>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct JobProperty {
    parameter_definitions: Vec<ParameterDefinition>,
}

/// `GET job/<name>/api/json`
#[derive(Clone, Debug)]
pub struct Job {
    name: JobName,
    data: JobData,
    raw: Value,
    client: ClientHandle,
}

impl Job {
    pub(crate) fn from_json(
        name: JobName,
        raw: Value,
        client: ClientHandle,
    ) -> Result<Self, serde_json::Error> {
        let data = JobData::deserialize(&raw)?;
        Ok(Self {
            name,
            data,
            raw,
            client,
        })
    }

    #[must_use]
    pub fn name(&self) -> &JobName {
        &self.name
    }

    /// The decoded `api/json` payload, for fields without an accessor.
    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.data
            .display_name
            .as_deref()
            .unwrap_or(self.name.as_str())
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.data.description.as_deref()
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.data.url.as_deref()
    }

    /// Ball color, e.g. `blue`, `red_anime`, `disabled`.
    #[must_use]
    pub fn color(&self) -> Option<&str> {
        self.data.color.as_deref()
    }

    #[must_use]
    pub fn is_buildable(&self) -> bool {
        self.data.buildable.unwrap_or(false)
    }

    #[must_use]
    pub fn is_in_queue(&self) -> bool {
        self.data.in_queue
    }

    #[must_use]
    pub fn build_refs(&self) -> &[BuildRef] {
        &self.data.builds
    }

    #[must_use]
    pub fn last_build_number(&self) -> Option<u64> {
        self.data.last_build.as_ref().map(|b| b.number)
    }

    #[must_use]
    pub fn last_completed_build_number(&self) -> Option<u64> {
        self.data.last_completed_build.as_ref().map(|b| b.number)
    }

    #[must_use]
    pub fn last_successful_build_number(&self) -> Option<u64> {
        self.data.last_successful_build.as_ref().map(|b| b.number)
    }

    #[must_use]
    pub fn last_failed_build_number(&self) -> Option<u64> {
        self.data.last_failed_build.as_ref().map(|b| b.number)
    }

    #[must_use]
    pub fn next_build_number(&self) -> Option<u64> {
        self.data.next_build_number
    }

    pub fn parameter_definitions(&self) -> impl Iterator<Item = &ParameterDefinition> {
        self.data
            .property
            .iter()
            .flatten()
            .flat_map(|p| p.parameter_definitions.iter())
    }

    /// Fetch every build listed on the job, skipping ones the server no
    /// longer serves.
    pub fn builds(&self) -> Result<Vec<Build>, Error> {
        let client = self.client.client()?;
        let mut builds = Vec::with_capacity(self.data.builds.len());
        for build in &self.data.builds {
            if let Some(build) = client.get_build(&self.name, build.number, Some(BUILD_TREE))? {
                builds.push(build);
            }
        }
        Ok(builds)
    }

    pub fn build(&self, id: u64) -> Result<Option<Build>, Error> {
        self.client
            .client()?
            .get_build(&self.name, id, Some(BUILD_TREE))
    }

    pub fn last_build(&self) -> Result<Option<Build>, Error> {
        match self.last_build_number() {
            Some(id) => self.build(id),
            None => Ok(None),
        }
    }

    pub fn last_successful_build(&self) -> Result<Option<Build>, Error> {
        match self.last_successful_build_number() {
            Some(id) => self.build(id),
            None => Ok(None),
        }
    }

    /// Whether the most recent build is still running.
    pub fn is_currently_building(&self) -> Result<bool, Error> {
        Ok(self.last_build()?.is_some_and(|b| b.is_running()))
    }

    pub fn config(&self) -> Result<String, Error> {
        self.client.client()?.get_job_config(&self.name)
    }

    pub fn set_config(&self, xml: impl Into<Vec<u8>>) -> Result<(), Error> {
        self.client.client()?.set_job_config(&self.name, xml)
    }

    pub fn launch<I, K, V>(&self, parameters: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.client.client()?.launch_job(&self.name, parameters)
    }

    pub fn delete(&self) -> Result<(), Error> {
        self.client.client()?.delete_job(&self.name)
    }
}
