//! HTTP request representation.
//!
//! Requests are parsed leniently: the request line is split on single spaces
//! and missing fields stay empty, header names are lower-cased and header
//! values are kept as raw text. Because of that the types here are plain
//! strings rather than the validated `http::Uri`/`http::Method` types.

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;

/// The request method.
///
/// Only `GET` and `POST` are understood by the server; anything else,
/// including an empty token from a malformed request line, is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Other(String),
}

impl Method {
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Other(method) => method,
        }
    }

    /// Only `POST` requests carry a body.
    #[inline]
    pub fn has_body(&self) -> bool {
        matches!(self, Method::Post)
    }
}

impl From<&str> for Method {
    fn from(str: &str) -> Self {
        match str {
            "GET" => Method::Get,
            "POST" => Method::Post,
            other => Method::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request headers keyed by lower-cased name. The last occurrence of a name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHeaders {
    inner: HashMap<String, String>,
}

impl RequestHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<V: Into<String>>(&mut self, name: &str, value: V) {
        self.inner.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Looks up a header; `name` is matched case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        match self.inner.get(name) {
            Some(value) => Some(value.as_str()),
            None => self.inner.get(&name.to_ascii_lowercase()).map(String::as_str),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// A fully read request: request line, headers and, for `POST`, the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    path: String,
    version: String,
    headers: RequestHeaders,
    body: Bytes,
}

impl Request {
    pub fn new<M, P, V>(method: M, path: P, version: V) -> Self
    where
        M: Into<Method>,
        P: Into<String>,
        V: Into<String>,
    {
        Self { method: method.into(), path: path.into(), version: version.into(), headers: RequestHeaders::new(), body: Bytes::new() }
    }

    /// Adds a header, returning the request. Handy for building requests by hand.
    pub fn with_header<V: Into<String>>(mut self, name: &str, value: V) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Attaches a body. Ignored unless the method is `POST`.
    pub fn with_body<B: Into<Bytes>>(mut self, body: B) -> Self {
        self.set_body(body.into());
        self
    }

    pub(crate) fn set_body(&mut self, body: Bytes) {
        if self.method.has_body() {
            self.body = body;
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn headers(&self) -> &RequestHeaders {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut RequestHeaders {
        &mut self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }
}
