//! HTTP header processing
//!
//! Request headers are read line by line by the
//! [`RequestParser`](crate::codec::RequestParser); this module holds the
//! response side:
//!
//! - [`HeaderEncoder`]: Encodes the status line and headers to bytes
//!   - Writes header names in canonical `Title-Case`
//!   - Derives `Content-Length` from the final body

mod header_encoder;

pub use header_encoder::HeaderEncoder;
