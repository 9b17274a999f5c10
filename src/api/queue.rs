use crate::{Error, JenkinsClient, Queue, endpoint};

impl JenkinsClient {
    /// `GET /queue/api/json`
    pub fn get_queue(&self) -> Result<Queue, Error> {
        let handle = self.handle();
        self.fetch(&endpoint::queue(), "Error reading the build queue", |raw| {
            Queue::from_json(raw, handle)
        })
    }

    /// `POST /queue/item/<id>/cancelQueue`
    pub fn cancel_queue(&self, id: u64) -> Result<(), Error> {
        self.send_unit(
            &endpoint::cancel_queue(id),
            &format!("Error cancelling queue item {id}"),
        )
    }
}
