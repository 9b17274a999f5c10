use crate::{
    Build, Error, JenkinsClient, JobName, TestReport, endpoint,
    mapper::{Mapped, decode_object},
};

impl JenkinsClient {
    /// `GET /job/<name>/<number>/api/json[?tree=<tree>]`
    ///
    /// Pass [`BUILD_TREE`](crate::BUILD_TREE) to load only the fields the
    /// [`Build`] accessors read. A body that is not a JSON object (Jenkins
    /// answers `null` for some pruned trees) yields `None`.
    pub fn get_build(
        &self,
        job: impl Into<JobName>,
        number: u64,
        tree: Option<&str>,
    ) -> Result<Option<Build>, Error> {
        let job = job.into();
        let context = format!("Error reading build #{number} of job {job}");
        let resp = self.send_validated(&endpoint::build_detail(&job, number, tree), &context)?;

        let Some(raw) = decode_object(&resp.body).lenient() else {
            return Ok(None);
        };
        let handle = self.handle();
        Mapped::Found(raw)
            .and_then(|raw| Build::from_json(job, number, raw, handle))
            .optional(&self.decode_context(&resp, &context))
    }

    /// `GET /job/<name>/<number>/consoleText`
    pub fn get_console_text_build(
        &self,
        job: impl Into<JobName>,
        number: u64,
    ) -> Result<String, Error> {
        let job = job.into();
        self.send_text(
            &endpoint::console_text(&job, number),
            &format!("Error reading console text of build #{number} of job {job}"),
        )
    }

    /// `GET /job/<name>/<number>/testReport/api/json`
    pub fn get_test_report(&self, job: impl Into<JobName>, number: u64) -> Result<TestReport, Error> {
        let job = job.into();
        let context = format!("Error reading test report of build #{number} of job {job}");
        self.fetch(&endpoint::test_report(&job, number), &context, |raw| {
            TestReport::from_json(job.clone(), number, raw)
        })
    }
}
