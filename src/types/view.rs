use super::{Job, JobSummary, ViewSummary};
use crate::{ClientHandle, Error, ViewName};
use serde::Deserialize;
use serde_json::Value;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
struct ViewData {
    description: Option<String>,
    url: Option<String>,
    jobs: Vec<JobSummary>,
    views: Vec<ViewSummary>,
}

/// `GET view/<name>/api/json`
#[derive(Clone, Debug)]
pub struct View {
    name: ViewName,
    data: ViewData,
    raw: Value,
    client: ClientHandle,
}

impl View {
    pub(crate) fn from_json(
        name: ViewName,
        raw: Value,
        client: ClientHandle,
    ) -> Result<Self, serde_json::Error> {
        let data = ViewData::deserialize(&raw)?;
        Ok(Self {
            name,
            data,
            raw,
            client,
        })
    }

    #[must_use]
    pub fn name(&self) -> &ViewName {
        &self.name
    }

    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.data.description.as_deref()
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.data.url.as_deref()
    }

    #[must_use]
    pub fn jobs(&self) -> &[JobSummary] {
        &self.data.jobs
    }

    /// Nested views, for folder-like view types.
    #[must_use]
    pub fn views(&self) -> &[ViewSummary] {
        &self.data.views
    }

    /// The worst ball color among member jobs (`red` over `yellow` over
    /// `blue`), with the `_anime` suffix kept when that job is building.
    #[must_use]
    pub fn color(&self) -> &str {
        self.data
            .jobs
            .iter()
            .filter_map(|job| job.color.as_deref())
            .max_by_key(|color| color_severity(color))
            .unwrap_or("blue")
    }

    /// Fetch each member job. Jobs that vanished since the view was read
    /// are skipped.
    pub fn fetch_jobs(&self) -> Result<Vec<Job>, Error> {
        let client = self.client.client()?;
        let mut jobs = Vec::with_capacity(self.data.jobs.len());
        for summary in &self.data.jobs {
            if let Some(job) = client.get_job(summary.name.as_str())? {
                jobs.push(job);
            }
        }
        Ok(jobs)
    }
}

fn color_severity(color: &str) -> u8 {
    match color.trim_end_matches("_anime") {
        "red" => 4,
        "yellow" => 3,
        "aborted" => 2,
        "blue" => 1,
        _ => 0,
    }
}
