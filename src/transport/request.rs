use crate::{Error, util::url::endpoint_url};
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use std::borrow::Cow;
use url::Url;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestBody {
    pub bytes: Vec<u8>,
    pub content_type: Option<HeaderValue>,
}

impl RequestBody {
    #[must_use]
    pub fn bytes_with_content_type(bytes: Vec<u8>, content_type: HeaderValue) -> Self {
        Self {
            bytes,
            content_type: Some(content_type),
        }
    }

    /// XML payload sent as `text/xml`, the content type Jenkins expects for
    /// `config.xml` and `createItem`.
    #[must_use]
    pub fn xml(xml: impl Into<Vec<u8>>) -> Self {
        Self::bytes_with_content_type(xml.into(), HeaderValue::from_static("text/xml"))
    }
}

/// One logical operation, relative to the client's base URL.
#[derive(Clone, Debug)]
pub struct Request {
    pub method: Method,
    /// Path components; each is percent-encoded on its own.
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
}

impl Request {
    #[must_use]
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            form: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, segments)
    }

    #[must_use]
    pub fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::POST, segments)
    }

    #[must_use]
    pub fn is_mutating(&self) -> bool {
        self.method != Method::GET
    }

    #[must_use]
    pub fn query_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn form_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.body = None;
        self.form
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set a body. Its content type is also recorded as a request header so
    /// the header list describes the request completely.
    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.form.clear();
        if let Some(content_type) = body.content_type.clone() {
            self.headers.insert(http::header::CONTENT_TYPE, content_type);
        }
        self.body = Some(body);
        self
    }

    /// Absolute URL without the query string.
    pub fn url(&self, base: &Url) -> Result<Url, Error> {
        endpoint_url(base, self.segments.iter().map(String::as_str))
    }

    /// Absolute URL including the query string, as a browser would show it.
    pub fn full_url(&self, base: &Url) -> Result<Url, Error> {
        let mut url = self.url(base)?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }
}

/// A response that already went through the transport.
#[derive(Clone, Debug)]
pub struct Response {
    pub method: Method,
    pub url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Response {
    #[must_use]
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
