//! Core HTTP protocol types.
//!
//! - **Request Processing** ([`request`]): [`Request`], its [`Method`] and
//!   lower-cased [`RequestHeaders`]
//! - **Response Processing** ([`response`]): [`Response`] with an optional
//!   buffered body, plus small constructors
//! - **Error Handling** ([`error`]):
//!   - [`HttpError`]: Top-level error type of a connection
//!   - [`ParseError`]: Request reading errors
//!   - [`SendError`]: Response writing errors

mod request;
pub use request::Method;
pub use request::Request;
pub use request::RequestHeaders;

mod response;
pub use response::Response;
pub use response::bytes_response;
pub use response::empty_response;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
