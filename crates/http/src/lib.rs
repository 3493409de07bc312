//! A small asynchronous server core for a restricted subset of HTTP/1.1
//!
//! This crate reads requests incrementally from a raw, partially-delivered byte
//! stream, hands them to a [`handler::Handler`] and writes the responses back,
//! keeping the connection alive between requests until the client asks for
//! `Connection: close` or goes away.
//!
//! # Features
//!
//! - Asynchronous I/O using tokio
//! - Line based request parsing that tolerates malformed request lines
//! - `Content-Length` delimited request bodies for `POST`
//! - Keep-alive connections with sequential request/response exchanges
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use http::StatusCode;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn};
//! use petit_http::connection::HttpConnection;
//! use petit_http::handler::make_handler;
//! use petit_http::protocol::{empty_response, Request, Response};
//!
//! #[tokio::main]
//! async fn main() {
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:4221").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     let handler = Arc::new(make_handler(ok));
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let handler = handler.clone();
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             match HttpConnection::new(reader, writer).process(handler).await {
//!                 Ok(()) => info!("finished process, connection shutdown"),
//!                 Err(e) => error!("service has error, cause {}, connection shutdown", e),
//!             }
//!         });
//!     }
//! }
//!
//! async fn ok(_request: Request) -> Response {
//!     empty_response(StatusCode::OK)
//! }
//! ```
//!
//! # Architecture
//!
//! - [`codec`]: byte source, line reader, request parser and response encoder
//! - [`connection`]: the per-connection keep-alive loop
//! - [`handler`]: the seam between the connection loop and the application
//! - [`protocol`]: request, response and error types
//!
//! # Limitations
//!
//! - No chunked transfer-encoding, no pipelining, no header folding
//! - No TLS support
//! - Maximum line length: 8KB
//! - At most 64 header lines, 16KB of headers in total
//! - Maximum request body: 16MB; larger `Content-Length` values end the connection

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
