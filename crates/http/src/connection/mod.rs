//! HTTP connection handling module
//!
//! - [`HttpConnection`]: Main connection handler that:
//!   - Reads requests one after another from the stream
//!   - Hands each request to a [`Handler`](crate::handler::Handler)
//!   - Writes the response before reading the next request
//!   - Honors `Connection: close` and closes the stream when done

mod http_connection;
mod message_writer;

pub use http_connection::HttpConnection;
pub use message_writer::MessageWriter;
