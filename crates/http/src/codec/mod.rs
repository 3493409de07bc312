//! HTTP codec module for reading requests and writing responses
//!
//! Reading is layered, each layer suspending on the socket as needed:
//!
//! - [`ByteSource`]: exact-count reads over a partially delivered stream
//! - [`LineReader`]: CRLF-terminated lines on top of the byte source
//! - [`RequestParser`]: request line, headers and `Content-Length` body
//!
//! Writing goes through [`ResponseEncoder`], which serializes a complete
//! response into a buffer using the header encoder from the [`header`] module.
//!
//! # Example
//!
//! ```no_run
//! use petit_http::codec::RequestParser;
//! use tokio::net::TcpStream;
//!
//! # async fn run(stream: TcpStream) -> Result<(), petit_http::protocol::ParseError> {
//! let mut parser = RequestParser::new(stream);
//! while let Some(request) = parser.next_request().await? {
//!     println!("{} {}", request.method(), request.path());
//! }
//! # Ok(())
//! # }
//! ```

mod body;
mod byte_source;
mod header;
mod line_reader;
mod request_parser;
mod response_encoder;

pub use body::LengthDecoder;
pub use byte_source::ByteSource;
pub use header::HeaderEncoder;
pub use line_reader::{Line, LineDecoder, LineReader, MAX_LINE_BYTES};
pub use request_parser::{MAX_BODY_BYTES, MAX_HEADER_BYTES, MAX_HEADERS, RequestParser};
pub use response_encoder::ResponseEncoder;
