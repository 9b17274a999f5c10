//! JSON body → entity mapping.
//!
//! Decoding yields a [`Mapped`] value; each facade operation then decides
//! which variants are errors. Most operations require an object
//! ([`Mapped::required`]). `get_job` and `get_computer` turn a non-200
//! status into [`Mapped::Absent`] and use [`Mapped::optional`]; `get_build`
//! treats anything but an object as absence ([`Mapped::lenient`]).

use crate::{
    Auth, BodySnippetConfig, Error, UnexpectedShape, transport::Response, util::diagnostics,
};
use serde_json::Value;
use std::error::Error as StdError;

/// Outcome of mapping one response body.
#[derive(Debug)]
pub enum Mapped<T> {
    Found(T),
    Absent,
    Malformed(Box<dyn StdError + Send + Sync>),
}

/// Decode `body` and insist on a JSON object.
#[must_use]
pub fn decode_object(body: &[u8]) -> Mapped<Value> {
    match serde_json::from_slice::<Value>(body) {
        Ok(value @ Value::Object(_)) => Mapped::Found(value),
        Ok(other) => Mapped::Malformed(Box::new(UnexpectedShape {
            found: json_kind(&other),
        })),
        Err(err) => Mapped::Malformed(Box::new(err)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// What a mapping failure needs to become a useful [`Error`].
pub(crate) struct DecodeContext<'a> {
    pub response: &'a Response,
    pub context: &'a str,
    pub body_snippet: BodySnippetConfig,
    pub auth: Option<&'a Auth>,
}

impl DecodeContext<'_> {
    fn malformed(&self, source: Box<dyn StdError + Send + Sync>) -> Error {
        Error::MalformedResponse {
            context: self.context.into(),
            status: self.response.status,
            method: self.response.method.clone(),
            path: self.response.url.path().into(),
            body_snippet: diagnostics::body_snippet(
                &self.response.body,
                self.body_snippet,
                self.auth,
            ),
            source,
        }
    }
}

impl<T> Mapped<T> {
    /// Build the entity from a found value; a type mismatch inside the
    /// object counts as malformed too.
    pub fn and_then<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Mapped<U>
    where
        E: StdError + Send + Sync + 'static,
    {
        match self {
            Self::Found(value) => match f(value) {
                Ok(mapped) => Mapped::Found(mapped),
                Err(err) => Mapped::Malformed(Box::new(err)),
            },
            Self::Absent => Mapped::Absent,
            Self::Malformed(err) => Mapped::Malformed(err),
        }
    }

    /// Found → `Some`, anything else → `None`.
    pub fn lenient(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Absent | Self::Malformed(_) => None,
        }
    }

    pub(crate) fn optional(self, cx: &DecodeContext<'_>) -> Result<Option<T>, Error> {
        match self {
            Self::Found(value) => Ok(Some(value)),
            Self::Absent => Ok(None),
            Self::Malformed(err) => Err(cx.malformed(err)),
        }
    }

    pub(crate) fn required(self, cx: &DecodeContext<'_>) -> Result<T, Error> {
        match self {
            Self::Found(value) => Ok(value),
            Self::Absent => Err(cx.malformed(Box::new(UnexpectedShape { found: "nothing" }))),
            Self::Malformed(err) => Err(cx.malformed(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, Method, StatusCode};
    use url::Url;

    fn response(body: &str) -> Response {
        Response {
            method: Method::GET,
            url: Url::parse("https://ci.example.com/job/core/api/json").unwrap(),
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn only_objects_are_found() {
        assert!(matches!(decode_object(br#"{"name":"core"}"#), Mapped::Found(_)));
        for body in ["null", "[]", "42", "\"x\"", "<html/>", ""] {
            assert!(
                matches!(decode_object(body.as_bytes()), Mapped::Malformed(_)),
                "{body}"
            );
        }
    }

    #[test]
    fn required_reports_shape_and_context() {
        let resp = response("[1,2]");
        let cx = DecodeContext {
            response: &resp,
            context: "Error reading job core",
            body_snippet: BodySnippetConfig::default(),
            auth: None,
        };
        let err = decode_object(&resp.body).required(&cx).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::MalformedResponse);
        assert_eq!(err.context(), Some("Error reading job core"));
        assert!(err.to_string().contains("found an array"));
    }

    #[test]
    fn optional_and_lenient_treat_absence_softly() {
        let resp = response("null");
        let cx = DecodeContext {
            response: &resp,
            context: "ctx",
            body_snippet: BodySnippetConfig::default(),
            auth: None,
        };
        assert!(matches!(Mapped::<Value>::Absent.optional(&cx), Ok(None)));
        assert!(decode_object(&resp.body).optional(&cx).is_err());
        assert!(decode_object(&resp.body).lenient().is_none());
    }

    #[test]
    fn type_mismatch_inside_object_is_malformed() {
        #[derive(serde::Deserialize, Debug)]
        #[allow(dead_code)]
        struct Named {
            name: String,
        }
        let mapped = decode_object(br#"{"name": 5}"#).and_then(serde_json::from_value::<Named>);
        assert!(matches!(mapped, Mapped::Malformed(_)));
    }
}
