use crate::JobName;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum CaseStatus {
    Passed,
    Fixed,
    Skipped,
    Failed,
    Regression,
    #[serde(other)]
    Unknown,
}

impl CaseStatus {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Regression)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct TestCase {
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "unknown_status")]
    pub status: CaseStatus,
    /// Seconds.
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub error_details: Option<String>,
    #[serde(default)]
    pub error_stack_trace: Option<String>,
}

fn unknown_status() -> CaseStatus {
    CaseStatus::Unknown
}

#[derive(Clone, Debug, Deserialize)]
#[non_exhaustive]
pub struct TestSuite {
    #[serde(default)]
    pub name: String,
    /// Seconds.
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub cases: Vec<TestCase>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ReportData {
    duration: f64,
    fail_count: u32,
    pass_count: u32,
    skip_count: u32,
    suites: Vec<TestSuite>,
}

/// `GET job/<name>/<id>/testReport/api/json`
///
/// Fetched on demand; nothing else keeps a copy.
#[derive(Clone, Debug)]
pub struct TestReport {
    job: JobName,
    build: u64,
    data: ReportData,
    raw: Value,
}

impl TestReport {
    pub(crate) fn from_json(job: JobName, build: u64, raw: Value) -> Result<Self, serde_json::Error> {
        let data = ReportData::deserialize(&raw)?;
        Ok(Self {
            job,
            build,
            data,
            raw,
        })
    }

    #[must_use]
    pub fn job_name(&self) -> &JobName {
        &self.job
    }

    #[must_use]
    pub fn build_number(&self) -> u64 {
        self.build
    }

    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.data.duration).unwrap_or_default()
    }

    #[must_use]
    pub fn fail_count(&self) -> u32 {
        self.data.fail_count
    }

    #[must_use]
    pub fn pass_count(&self) -> u32 {
        self.data.pass_count
    }

    #[must_use]
    pub fn skip_count(&self) -> u32 {
        self.data.skip_count
    }

    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.data.fail_count + self.data.pass_count + self.data.skip_count
    }

    #[must_use]
    pub fn suites(&self) -> &[TestSuite] {
        &self.data.suites
    }

    /// Status of the `case`-th case of the `suite`-th suite.
    #[must_use]
    pub fn case_status(&self, suite: usize, case: usize) -> Option<&CaseStatus> {
        self.data
            .suites
            .get(suite)
            .and_then(|s| s.cases.get(case))
            .map(|c| &c.status)
    }

    pub fn failed_cases(&self) -> impl Iterator<Item = &TestCase> {
        self.data
            .suites
            .iter()
            .flat_map(|s| s.cases.iter())
            .filter(|c| c.status.is_failure())
    }
}
