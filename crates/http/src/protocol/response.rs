//! HTTP response representation.
//!
//! A response is a standard `http::Response` whose body is optional: `None`
//! means no body at all, which is written without a `Content-Length` header.

use bytes::Bytes;
use http::{HeaderValue, StatusCode, header};

/// Response with an optional, fully buffered body.
pub type Response = http::Response<Option<Bytes>>;

/// Builds a response without a body.
pub fn empty_response(status: StatusCode) -> Response {
    let mut response = Response::new(None);
    *response.status_mut() = status;
    response
}

/// Builds a response carrying `body` labelled with `content_type`.
pub fn bytes_response<B: Into<Bytes>>(status: StatusCode, content_type: HeaderValue, body: B) -> Response {
    let mut response = Response::new(Some(body.into()));
    *response.status_mut() = status;
    response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    response
}
