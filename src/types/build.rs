use super::{Action, Parameter, TestReport, collect_parameters};
use crate::{ClientHandle, Error, JobName};
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Final state of a finished build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum BuildResult {
    Success,
    Unstable,
    Failure,
    NotBuilt,
    Aborted,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BuildData {
    result: Option<BuildResult>,
    building: Option<bool>,
    duration: u64,
    estimated_duration: Option<i64>,
    timestamp: u64,
    url: Option<String>,
    built_on: Option<String>,
    actions: Vec<Option<Action>>,
}

/// `GET job/<name>/<id>/api/json`
///
/// A historical record; nothing on it changes after construction.
#[derive(Clone, Debug)]
pub struct Build {
    job: JobName,
    number: u64,
    data: BuildData,
    parameters: Vec<Parameter>,
    raw: Value,
    client: ClientHandle,
}

impl Build {
    pub(crate) fn from_json(
        job: JobName,
        number: u64,
        raw: Value,
        client: ClientHandle,
    ) -> Result<Self, serde_json::Error> {
        let data = BuildData::deserialize(&raw)?;
        let parameters = collect_parameters(&data.actions);
        Ok(Self {
            job,
            number,
            data,
            parameters,
            raw,
            client,
        })
    }

    #[must_use]
    pub fn job_name(&self) -> &JobName {
        &self.job
    }

    #[must_use]
    pub fn number(&self) -> u64 {
        self.number
    }

    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// `None` while the build is still running.
    #[must_use]
    pub fn result(&self) -> Option<BuildResult> {
        self.data.result
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.data
            .building
            .unwrap_or_else(|| self.data.result.is_none())
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.data.duration)
    }

    /// `None` when Jenkins has no estimate (it reports `-1`).
    #[must_use]
    pub fn estimated_duration(&self) -> Option<Duration> {
        self.data
            .estimated_duration
            .and_then(|ms| u64::try_from(ms).ok())
            .map(Duration::from_millis)
    }

    /// Start time, milliseconds since the Unix epoch.
    #[must_use]
    pub fn timestamp(&self) -> u64 {
        self.data.timestamp
    }

    #[must_use]
    pub fn started_at(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.data.timestamp)
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.data.url.as_deref()
    }

    /// Node that ran the build. Jenkins reports an empty string for the
    /// built-in node.
    #[must_use]
    pub fn built_on(&self) -> Option<&str> {
        self.data.built_on.as_deref()
    }

    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    /// Percent of the estimated duration already elapsed at `now`, capped at
    /// 100. `None` when the build is finished or has no estimate.
    #[must_use]
    pub fn progress(&self, now: SystemTime) -> Option<f64> {
        if !self.is_running() {
            return None;
        }
        let estimated = self.estimated_duration().filter(|d| !d.is_zero())?;
        let elapsed = now.duration_since(self.started_at()).unwrap_or_default();
        Some((elapsed.as_secs_f64() / estimated.as_secs_f64() * 100.0).min(100.0))
    }

    /// Estimated time left at `now`, `None` when finished or unknown.
    #[must_use]
    pub fn remaining_time(&self, now: SystemTime) -> Option<Duration> {
        if !self.is_running() {
            return None;
        }
        let estimated = self.estimated_duration()?;
        let elapsed = now.duration_since(self.started_at()).unwrap_or_default();
        Some(estimated.saturating_sub(elapsed))
    }

    pub fn console_text(&self) -> Result<String, Error> {
        self.client
            .client()?
            .get_console_text_build(&self.job, self.number)
    }

    pub fn test_report(&self) -> Result<TestReport, Error> {
        self.client.client()?.get_test_report(&self.job, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(raw: Value) -> Build {
        Build::from_json("core".into(), 7, raw, ClientHandle::detached()).unwrap()
    }

    #[test]
    fn finished_build_fields() {
        let build = build(json!({
            "number": 7,
            "result": "UNSTABLE",
            "duration": 1500,
            "estimatedDuration": 2000,
            "timestamp": 1_000,
            "builtOn": "agent-1",
            "actions": [
                { "_class": "hudson.model.CauseAction" },
                { "parameters": [{ "name": "env", "value": "prod" }, { "name": "dry", "value": true }] }
            ]
        }));

        assert_eq!(build.result(), Some(BuildResult::Unstable));
        assert!(!build.is_running());
        assert_eq!(build.duration(), Duration::from_millis(1500));
        assert_eq!(build.built_on(), Some("agent-1"));
        assert_eq!(build.parameter("dry"), Some(&json!(true)));
        assert_eq!(build.progress(SystemTime::now()), None);
    }

    #[test]
    fn running_build_progress_is_capped() {
        let build = build(json!({
            "result": null,
            "building": true,
            "estimatedDuration": 10_000,
            "timestamp": 0
        }));
        let now = UNIX_EPOCH + Duration::from_secs(5);
        assert_eq!(build.progress(now), Some(50.0));
        assert_eq!(build.remaining_time(now), Some(Duration::from_secs(5)));

        let late = UNIX_EPOCH + Duration::from_secs(60);
        assert_eq!(build.progress(late), Some(100.0));
    }

    #[test]
    fn unknown_result_and_missing_estimate() {
        let build = build(json!({ "result": "SOMETHING_NEW", "estimatedDuration": -1 }));
        assert_eq!(build.result(), Some(BuildResult::Unknown));
        assert_eq!(build.estimated_duration(), None);
    }
}
