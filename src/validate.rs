//! Status classification.
//!
//! Every operation funnels its response through [`validate_response`]; no
//! other code decides whether a status is a failure. Redirect statuses pass:
//! following them is up to the transport.

use crate::{
    Auth, BodySnippetConfig, Error, HttpError,
    transport::Response,
    util::{diagnostics, redact::redact_text, url::sanitize_url_for_error},
};
use http::StatusCode;

/// Whether `status` counts as success (`200..=399`).
#[must_use]
pub fn is_accepted(status: StatusCode) -> bool {
    (200..=399).contains(&status.as_u16())
}

/// Fail with [`Error::RequestFailed`] carrying `context` unless the status
/// is in `200..=399`.
pub fn validate_response(response: &Response, context: &str) -> Result<(), Error> {
    validate_with(response, context, BodySnippetConfig::default(), None)
}

pub(crate) fn validate_with(
    response: &Response,
    context: &str,
    body_snippet: BodySnippetConfig,
    auth: Option<&Auth>,
) -> Result<(), Error> {
    if is_accepted(response.status) {
        return Ok(());
    }

    let message = diagnostics::extract_message(&response.body)
        .map(|msg| redact_text(msg.into(), auth).into_boxed_str());
    Err(Error::RequestFailed {
        context: context.into(),
        error: HttpError {
            status: response.status,
            method: response.method.clone(),
            url: Box::new(sanitize_url_for_error(&response.url)),
            message,
            request_id: diagnostics::request_id(&response.headers),
            body_snippet: diagnostics::body_snippet(&response.body, body_snippet, auth),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, Method};
    use url::Url;

    fn response(status: u16, body: &str) -> Response {
        Response {
            method: Method::GET,
            url: Url::parse("https://user:pw@ci.example.com/queue/api/json?tree=items").unwrap(),
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn accepts_the_whole_success_and_redirect_range() {
        for status in [200, 201, 204, 302, 304, 399] {
            assert!(validate_response(&response(status, ""), "ctx").is_ok(), "{status}");
        }
    }

    #[test]
    fn rejects_everything_else() {
        for status in [100, 199, 400, 403, 404, 500, 503] {
            let err = validate_response(&response(status, ""), "Error reading queue").unwrap_err();
            assert_eq!(err.kind(), crate::ErrorKind::RequestFailed, "{status}");
            assert_eq!(err.context(), Some("Error reading queue"));
            assert_eq!(err.status().map(|s| s.as_u16()), Some(status));
        }
    }

    #[test]
    fn failure_carries_sanitized_url_and_redacted_snippet() {
        let auth = Auth::basic("user", "s3cr3t");
        let err = validate_with(
            &response(500, "token s3cr3t leaked"),
            "ctx",
            BodySnippetConfig::default(),
            Some(&auth),
        )
        .unwrap_err();

        let Error::RequestFailed { error, .. } = err else {
            panic!("expected RequestFailed");
        };
        assert_eq!(error.url.as_str(), "https://ci.example.com/queue/api/json");
        assert_eq!(error.body_snippet.as_deref(), Some("token <redacted> leaked"));
    }
}
