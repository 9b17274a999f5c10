//! Anti-CSRF crumb state.
//!
//! Jenkins with CSRF protection rejects mutating requests that lack the
//! crumb header it issued from `crumbIssuer/api/json`. The client fetches
//! the crumb (see `JenkinsClient::enable_crumbs`) and this module keeps it,
//! along with the enabled flag, behind one lock.

use crate::{Crumb, Error};
use http::{HeaderName, HeaderValue};
use std::{
    fmt,
    sync::{Mutex, MutexGuard},
};

/// A crumb that has been checked to be sendable as an HTTP header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrumbHeader {
    name: HeaderName,
    value: HeaderValue,
    crumb: Crumb,
}

impl CrumbHeader {
    pub fn try_from_crumb(crumb: Crumb) -> Result<Self, Error> {
        let name = HeaderName::from_bytes(crumb.crumb_request_field.as_bytes())
            .map_err(|err| Error::invalid_config("invalid crumb header name", err))?;
        let value = HeaderValue::from_str(&crumb.crumb)
            .map_err(|err| Error::invalid_config("invalid crumb header value", err))?;
        Ok(Self { name, value, crumb })
    }

    #[must_use]
    pub fn name(&self) -> &HeaderName {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> &HeaderValue {
        &self.value
    }

    /// The field name exactly as the issuer spelled it.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.crumb.crumb_request_field
    }

    #[must_use]
    pub fn crumb(&self) -> &str {
        &self.crumb.crumb
    }
}

/// Renders the header line, `<crumbRequestField>: <crumb>`.
impl fmt::Display for CrumbHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.crumb.crumb_request_field, self.crumb.crumb)
    }
}

#[derive(Default)]
struct CrumbState {
    enabled: bool,
    cached: Option<CrumbHeader>,
}

#[derive(Default)]
pub(crate) struct CrumbManager {
    state: Mutex<CrumbState>,
}

impl CrumbManager {
    fn lock(&self) -> MutexGuard<'_, CrumbState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Cache a freshly issued crumb and switch crumb mode on.
    pub(crate) fn store(&self, header: CrumbHeader) {
        let mut state = self.lock();
        state.cached = Some(header);
        state.enabled = true;
    }

    /// Switch crumb mode off. The cached crumb is kept.
    pub(crate) fn disable(&self) {
        self.lock().enabled = false;
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.lock().enabled
    }

    /// Last crumb fetched, whether or not crumb mode is on.
    pub(crate) fn cached(&self) -> Option<CrumbHeader> {
        self.lock().cached.clone()
    }

    /// The header to attach to a mutating request, if crumb mode is on.
    pub(crate) fn active(&self) -> Option<CrumbHeader> {
        let state = self.lock();
        if state.enabled {
            state.cached.clone()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(field: &str, crumb: &str) -> Result<CrumbHeader, Error> {
        CrumbHeader::try_from_crumb(Crumb {
            crumb_request_field: field.to_owned(),
            crumb: crumb.to_owned(),
        })
    }

    #[test]
    fn header_line_uses_issuer_field() {
        let header = header("Jenkins-Crumb", "abc").unwrap();
        assert_eq!(header.to_string(), "Jenkins-Crumb: abc");
        assert_eq!(header.name().as_str(), "jenkins-crumb");
        assert_eq!(header.value(), "abc");
    }

    #[test]
    fn unusable_field_name_is_rejected() {
        let err = header("bad field", "abc").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidConfig);
    }

    #[test]
    fn disable_keeps_cached_crumb() {
        let manager = CrumbManager::default();
        assert!(!manager.is_enabled());
        assert!(manager.active().is_none());

        manager.store(header("Jenkins-Crumb", "abc").unwrap());
        assert!(manager.is_enabled());
        assert!(manager.active().is_some());

        manager.disable();
        assert!(!manager.is_enabled());
        assert!(manager.active().is_none());
        assert_eq!(manager.cached().map(|h| h.to_string()).as_deref(), Some("Jenkins-Crumb: abc"));
    }
}
