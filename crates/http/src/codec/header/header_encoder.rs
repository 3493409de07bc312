//! HTTP response head serialization
//!
//! Writes the status line and the header block of a [`Response`]. The
//! `Content-Length` header is derived from the body at this point and never
//! earlier, so it always reflects the final (possibly compressed) body.

use std::io;
use std::io::Write;

use bytes::{BufMut, BytesMut};
use http::header;
use tokio_util::codec::Encoder;

use crate::protocol::{Response, SendError};

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 1024;

/// Encoder for the status line and headers of a [`Response`].
#[derive(Debug)]
pub struct HeaderEncoder;

impl Encoder<&Response> for HeaderEncoder {
    type Error = SendError;

    fn encode(&mut self, response: &Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEADER_SIZE);

        let status = response.status();
        write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", status.as_str(), status.canonical_reason().unwrap_or_default())?;

        for (header_name, header_value) in response.headers() {
            if *header_name == header::CONTENT_LENGTH {
                continue;
            }
            put_title_case(dst, header_name.as_str());
            dst.put_slice(b": ");
            dst.put_slice(header_value.as_bytes());
            dst.put_slice(b"\r\n");
        }

        if let Some(body) = response.body() {
            write!(FastWrite(dst), "Content-Length: {}\r\n", body.len())?;
        }

        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// Writes a lower-cased header name as `Title-Case`, e.g. `content-type` as `Content-Type`.
fn put_title_case(dst: &mut BytesMut, name: &str) {
    let mut upper = true;
    for byte in name.bytes() {
        dst.put_u8(if upper { byte.to_ascii_uppercase() } else { byte });
        upper = byte == b'-';
    }
}

/// Writer adapter so `write!` can format straight into a `BytesMut`.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
