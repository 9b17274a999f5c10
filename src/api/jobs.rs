use crate::{Error, Job, JenkinsClient, JobName, JobSummary, endpoint, validate::is_accepted};
use http::StatusCode;

impl JenkinsClient {
    /// Job names and links from the cached server root.
    pub fn get_all_jobs(&self) -> Result<Vec<JobSummary>, Error> {
        Ok(self.root()?.jobs.clone())
    }

    /// Every job listed in the cached server root, fetched one by one.
    /// Jobs that no longer exist are skipped.
    pub fn get_jobs(&self) -> Result<Vec<Job>, Error> {
        let root = self.root()?;
        let mut jobs = Vec::with_capacity(root.jobs.len());
        for summary in &root.jobs {
            if let Some(job) = self.get_job(summary.name.as_str())? {
                jobs.push(job);
            }
        }
        Ok(jobs)
    }

    /// `GET /job/<name>/api/json`
    ///
    /// `None` when the server answers with anything but 200.
    pub fn get_job(&self, job: impl Into<JobName>) -> Result<Option<Job>, Error> {
        let job = job.into();
        let context = format!("Error reading job {job}");
        let handle = self.handle();
        self.fetch_if_ok(&endpoint::job_detail(&job), &context, |raw| {
            Job::from_json(job.clone(), raw, handle)
        })
    }

    /// `POST /job/<name>/build`, or `buildWithParameters` when `parameters`
    /// is not empty.
    pub fn launch_job<I, K, V>(&self, job: impl Into<JobName>, parameters: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let job = job.into();
        let parameters = parameters
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.send_unit(
            &endpoint::launch(&job, parameters),
            &format!("Error trying to launch job {job}"),
        )
    }

    /// `POST /job/<name>/doDelete`
    pub fn delete_job(&self, job: impl Into<JobName>) -> Result<(), Error> {
        let job = job.into();
        self.send_unit(
            &endpoint::delete_job(&job),
            &format!("Error deleting job {job}"),
        )
    }

    /// `POST /createItem?name=<name>` with `config_xml` as the job definition.
    ///
    /// Jenkins reports a taken name with 400; that, and any accepted status
    /// other than 200, becomes [`Error::NameCollision`].
    pub fn create_job(
        &self,
        job: impl Into<JobName>,
        config_xml: impl Into<Vec<u8>>,
    ) -> Result<(), Error> {
        let job = job.into();
        let resp = self.execute_request(&endpoint::create_item(&job, config_xml.into()))?;
        if resp.status == StatusCode::BAD_REQUEST
            || (is_accepted(resp.status) && resp.status != StatusCode::OK)
        {
            return Err(Error::NameCollision {
                name: job.as_str().into(),
            });
        }
        self.validate(&resp, &format!("Error creating job {job}"))
    }

    /// `POST /job/<name>/config.xml`
    pub fn set_job_config(
        &self,
        job: impl Into<JobName>,
        config_xml: impl Into<Vec<u8>>,
    ) -> Result<(), Error> {
        let job = job.into();
        self.send_unit(
            &endpoint::set_job_config(&job, config_xml.into()),
            &format!("Error during setting configuration for job {job}"),
        )
    }

    /// `GET /job/<name>/config.xml`
    pub fn get_job_config(&self, job: impl Into<JobName>) -> Result<String, Error> {
        let job = job.into();
        self.send_text(
            &endpoint::job_config(&job),
            &format!("Error reading configuration of job {job}"),
        )
    }
}
