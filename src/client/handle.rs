use super::{Inner, JenkinsClient};
use crate::Error;
use std::{
    fmt,
    sync::{Arc, Weak},
};

/// Non-owning link from an entity back to the client that produced it.
///
/// Entities use it for follow-up calls (`job.builds()`, `executor.stop()`,
/// ...). Holding an entity never keeps the client alive; once every
/// [`JenkinsClient`] clone is gone, follow-ups fail with
/// [`Error::ClientDropped`].
#[derive(Clone)]
pub struct ClientHandle {
    inner: Weak<Inner>,
}

impl ClientHandle {
    pub(crate) fn new(client: &JenkinsClient) -> Self {
        Self {
            inner: Arc::downgrade(&client.inner),
        }
    }

    /// A handle attached to nothing, for entities built outside a client.
    #[must_use]
    pub fn detached() -> Self {
        Self { inner: Weak::new() }
    }

    pub fn client(&self) -> Result<JenkinsClient, Error> {
        self.inner
            .upgrade()
            .map(|inner| JenkinsClient { inner })
            .ok_or(Error::ClientDropped)
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}
