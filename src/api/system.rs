use crate::{Crumb, CrumbHeader, Error, JenkinsClient, endpoint};
use http::StatusCode;

impl JenkinsClient {
    /// Fetch a crumb and attach it to every following POST.
    ///
    /// Never fails: when the issuer cannot be reached or answers with
    /// anything but a usable crumb, crumbs end up disabled and mutating
    /// requests go out without one. Returns whether crumbs are now enabled.
    pub fn enable_crumbs(&self) -> bool {
        match self.request_crumb() {
            Ok(header) => {
                self.inner.crumbs.store(header);
                true
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %err, "crumb issuer unavailable, crumbs stay disabled");
                #[cfg(not(feature = "tracing"))]
                let _ = err;
                self.inner.crumbs.disable();
                false
            }
        }
    }

    /// Stop sending the crumb. The last one fetched stays available through
    /// [`crumb_header`](Self::crumb_header).
    pub fn disable_crumbs(&self) {
        self.inner.crumbs.disable();
    }

    #[must_use]
    pub fn are_crumbs_enabled(&self) -> bool {
        self.inner.crumbs.is_enabled()
    }

    /// Last crumb fetched; its `Display` form is the header line
    /// `Field: value`.
    #[must_use]
    pub fn crumb_header(&self) -> Option<CrumbHeader> {
        self.inner.crumbs.cached()
    }

    /// `GET /crumbIssuer/api/json`, without touching the crumb state.
    pub fn request_crumb(&self) -> Result<CrumbHeader, Error> {
        let crumb: Crumb = self.fetch_typed(&endpoint::crumb_issuer(), "Error getting crumb")?;
        CrumbHeader::try_from_crumb(crumb)
    }

    /// Whether the server answers its root with 200 and serves the queue.
    ///
    /// A transport failure on the root request is returned as an error; any
    /// failure reading the queue just means "not available".
    pub fn is_available(&self) -> Result<bool, Error> {
        let resp = self.execute_request(&endpoint::root())?;
        if resp.status != StatusCode::OK {
            return Ok(false);
        }
        Ok(self.get_queue().is_ok())
    }

    /// `GET` an arbitrary path below the base URL and return the body.
    ///
    /// `uri` is relative (`job/x/api/json?depth=1`); a query string is kept.
    pub fn execute(&self, uri: &str) -> Result<String, Error> {
        self.send_text(&endpoint::execute_uri(uri), &format!("Error calling {uri}"))
    }
}
