use crate::{Auth, BodySnippetConfig};
use http::HeaderMap;

use super::redact::{redact_text, truncate_utf8};

pub(crate) fn request_id(headers: &HeaderMap) -> Option<Box<str>> {
    ["x-request-id", "x-correlation-id", "x-jenkins-session"]
        .into_iter()
        .filter_map(|name| headers.get(name).and_then(|v| v.to_str().ok()))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(Into::into)
}

/// Pull a human-readable message out of an error body.
///
/// Jenkins answers API failures with either a small JSON object or a full
/// HTML error page; for the latter the `<title>` is the useful part.
pub(crate) fn extract_message(body: &[u8]) -> Option<Box<str>> {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        return ["message", "error", "Message"]
            .into_iter()
            .filter_map(|key| value.get(key).and_then(|v| v.as_str()))
            .map(str::trim)
            .find(|msg| !msg.is_empty())
            .map(Into::into);
    }

    let text = String::from_utf8_lossy(body);
    let start = text.find("<title>")? + "<title>".len();
    let end = text[start..].find("</title>")? + start;
    let title = text[start..end].trim();
    (!title.is_empty()).then(|| title.into())
}

pub(crate) fn body_snippet(
    body: &[u8],
    config: BodySnippetConfig,
    auth: Option<&Auth>,
) -> Option<Box<str>> {
    if !config.enabled || body.is_empty() {
        return None;
    }

    let body = String::from_utf8_lossy(body);
    let snippet = truncate_utf8(&body, config.max_bytes).to_owned();
    Some(redact_text(snippet, auth).into_boxed_str())
}
