//! Request parsing on top of the [`LineReader`] and [`ByteSource`].
//!
//! The parser works in three steps, each of which may suspend on the socket:
//!
//! 1. Read the request line and split it on single spaces
//! 2. Read header lines until the first blank line
//! 3. For `POST`, read exactly `Content-Length` bytes of body
//!
//! Parsing is deliberately lenient: a short request line leaves the missing
//! fields empty, a header line without `": "` is skipped and a missing or
//! non-numeric `Content-Length` counts as zero.
//!
//! Sizes are bounded: at most [`MAX_HEADERS`] header lines totalling
//! [`MAX_HEADER_BYTES`], and a body of at most [`MAX_BODY_BYTES`].
//!
//! [`ByteSource`]: crate::codec::ByteSource

use http::header;
use tokio::io::AsyncRead;
use tracing::trace;

use crate::codec::{ByteSource, Line, LineReader};
use crate::ensure;
use crate::protocol::{ParseError, Request};

/// Maximum number of header lines in one request
pub const MAX_HEADERS: usize = 64;

/// Maximum size in bytes of the header block, line terminators included
pub const MAX_HEADER_BYTES: usize = 16 * 1024;

/// Maximum accepted `Content-Length`
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug)]
pub struct RequestParser<R> {
    lines: LineReader<R>,
}

impl<R> RequestParser<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(reader: R) -> Self {
        Self { lines: LineReader::new(ByteSource::new(reader)) }
    }

    /// True once the peer has closed its side of the stream.
    pub fn is_closed(&self) -> bool {
        self.lines.source().is_closed()
    }

    /// Reads the next request from the stream.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: a complete request was read
    /// - `Ok(None)`: no request line is available, or the stream closed before
    ///   the whole body arrived; the connection should close
    /// - `Err(_)`: the stream failed or a size limit was exceeded
    pub async fn next_request(&mut self) -> Result<Option<Request>, ParseError> {
        let request_line = self.lines.read_line().await?;
        if request_line.is_blank() {
            trace!(end_of_stream = matches!(request_line, Line::EndOfStream), "no request line");
            return Ok(None);
        }

        let mut request = parse_request_line(request_line.as_str());

        let mut header_lines = 0;
        let mut header_bytes = 0;
        loop {
            let line = self.lines.read_line().await?;
            if line.is_blank() {
                break;
            }

            header_lines += 1;
            header_bytes += line.as_str().len() + 2;
            ensure!(header_lines <= MAX_HEADERS, ParseError::too_many_headers(MAX_HEADERS));
            ensure!(header_bytes <= MAX_HEADER_BYTES, ParseError::too_large_header(header_bytes, MAX_HEADER_BYTES));

            match line.as_str().split_once(": ") {
                Some((name, value)) => request.headers_mut().insert(name, value),
                None => trace!(line = line.as_str(), "skip header line without separator"),
            }
        }

        if request.method().has_body() {
            let length = content_length(&request);
            ensure!(length <= MAX_BODY_BYTES, ParseError::too_large_body(length, MAX_BODY_BYTES));

            let body = self.lines.source_mut().read(length).await?;
            if body.len() < length {
                trace!(content_length = length, received = body.len(), "stream closed mid body, drop request");
                return Ok(None);
            }
            request.set_body(body);
        }

        Ok(Some(request))
    }
}

fn parse_request_line(line: &str) -> Request {
    let mut parts = line.split(' ');
    let method = parts.next().unwrap_or_default();
    let path = parts.next().unwrap_or_default();
    let version = parts.next().unwrap_or_default();
    Request::new(method, path, version)
}

fn content_length(request: &Request) -> usize {
    request.headers().get(header::CONTENT_LENGTH.as_str()).and_then(|value| value.trim().parse::<usize>().ok()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Method;
    use indoc::indoc;
    use std::time::Duration;
    use tokio::io::AsyncWriteExt;

    async fn parse_all(input: &str) -> Vec<Request> {
        let (mut client, server) = tokio::io::duplex(4096);
        client.write_all(input.as_bytes()).await.unwrap();
        drop(client);

        let mut parser = RequestParser::new(server);
        let mut requests = vec![];
        while let Some(request) = parser.next_request().await.unwrap() {
            requests.push(request);
        }
        requests
    }

    #[tokio::test]
    async fn from_curl() {
        let str = indoc! {r##"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:4221
        User-Agent: curl/7.79.1
        Accept: */*

        "##};

        let requests = parse_all(str).await;
        assert_eq!(requests.len(), 1);

        let request = &requests[0];
        assert_eq!(request.method(), &Method::Get);
        assert_eq!(request.path(), "/index.html");
        assert_eq!(request.version(), "HTTP/1.1");
        assert_eq!(request.headers().len(), 3);
        assert_eq!(request.headers().get("host"), Some("127.0.0.1:4221"));
        assert_eq!(request.headers().get("user-agent"), Some("curl/7.79.1"));
        assert_eq!(request.headers().get("accept"), Some("*/*"));
        assert!(request.body().is_empty());
    }

    #[tokio::test]
    async fn post_reads_content_length_body() {
        let str = "POST /files/a HTTP/1.1\r\nContent-Length: 5\r\n\r\nhelloGET / HTTP/1.1\r\n\r\n";

        let requests = parse_all(str).await;
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method(), &Method::Post);
        assert_eq!(&requests[0].body()[..], b"hello");
        assert_eq!(requests[1].path(), "/");
    }

    #[tokio::test]
    async fn invalid_content_length_counts_as_zero() {
        let str = "POST /files/a HTTP/1.1\r\nContent-Length: abc\r\n\r\nGET / HTTP/1.1\r\n\r\n";

        let requests = parse_all(str).await;
        assert_eq!(requests.len(), 2);
        assert!(requests[0].body().is_empty());
        assert_eq!(requests[1].method(), &Method::Get);
    }

    #[tokio::test]
    async fn get_never_reads_a_body() {
        let str = "GET / HTTP/1.1\r\nContent-Length: 3\r\n\r\nGET /echo/x HTTP/1.1\r\n\r\n";

        let requests = parse_all(str).await;
        assert_eq!(requests.len(), 2);
        assert!(requests[0].body().is_empty());
        assert_eq!(requests[1].path(), "/echo/x");
    }

    #[tokio::test]
    async fn short_request_line_leaves_fields_empty() {
        let requests = parse_all("GET\r\n\r\n").await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method(), &Method::Get);
        assert_eq!(requests[0].path(), "");
        assert_eq!(requests[0].version(), "");
    }

    #[tokio::test]
    async fn header_names_lower_cased_last_wins() {
        let str = "GET / HTTP/1.1\r\nX-Test: one\r\nx-test: two\r\nbroken header\r\n\r\n";

        let requests = parse_all(str).await;
        let headers = requests[0].headers();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("x-test"), Some("two"));
    }

    #[tokio::test]
    async fn header_value_keeps_later_separators() {
        let requests = parse_all("GET / HTTP/1.1\r\nX-Time: 12: 30\r\n\r\n").await;
        assert_eq!(requests[0].headers().get("x-time"), Some("12: 30"));
    }

    #[tokio::test]
    async fn empty_stream_has_no_request() {
        assert!(parse_all("").await.is_empty());
    }

    #[tokio::test]
    async fn stream_closed_mid_headers_still_yields_request() {
        let requests = parse_all("GET /echo/abc HTTP/1.1\r\nHost: a\r\n").await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].headers().get("host"), Some("a"));
    }

    #[tokio::test]
    async fn stream_closed_mid_body_drops_request() {
        let requests = parse_all("POST /files/a HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc").await;
        assert!(requests.is_empty());
    }

    async fn parse_first(input: &str) -> Result<Option<Request>, ParseError> {
        let (mut client, server) = tokio::io::duplex(64 * 1024);
        client.write_all(input.as_bytes()).await.unwrap();
        drop(client);

        RequestParser::new(server).next_request().await
    }

    #[tokio::test]
    async fn content_length_over_limit_is_rejected() {
        let result = parse_first("POST /files/a HTTP/1.1\r\nContent-Length: 1099511627776\r\n\r\nabc").await;
        assert!(matches!(result, Err(ParseError::TooLargeBody { max_size: MAX_BODY_BYTES, .. })));
    }

    #[tokio::test]
    async fn too_many_headers_is_rejected() {
        let mut input = String::from("GET / HTTP/1.1\r\n");
        for i in 0..=MAX_HEADERS {
            input.push_str(&format!("X-Header-{i}: v\r\n"));
        }
        input.push_str("\r\n");

        let result = parse_first(&input).await;
        assert!(matches!(result, Err(ParseError::TooManyHeaders { max_num: MAX_HEADERS })));
    }

    #[tokio::test]
    async fn header_block_over_limit_is_rejected() {
        let value = "v".repeat(4 * 1024);
        let mut input = String::from("GET / HTTP/1.1\r\n");
        for i in 0..5 {
            input.push_str(&format!("X-Header-{i}: {value}\r\n"));
        }
        input.push_str("\r\n");

        let result = parse_first(&input).await;
        assert!(matches!(result, Err(ParseError::TooLargeHeader { max_size: MAX_HEADER_BYTES, .. })));
    }

    #[tokio::test]
    async fn headers_at_the_limits_are_accepted() {
        let mut input = String::from("GET / HTTP/1.1\r\n");
        for i in 0..MAX_HEADERS {
            input.push_str(&format!("X-Header-{i}: v\r\n"));
        }
        input.push_str("\r\n");

        let request = parse_first(&input).await.unwrap().unwrap();
        assert_eq!(request.headers().len(), MAX_HEADERS);
    }

    #[tokio::test]
    async fn request_split_across_deliveries() {
        let (client, server) = tokio::io::duplex(64);

        let writer = tokio::spawn(async move {
            let mut client = client;
            let pieces: [&[u8]; 6] =
                [b"POST /fi", b"les/b HTTP/1.1\r", b"\nContent-Le", b"ngth: 6\r\n", b"\r\nabc", b"def"];
            for piece in pieces {
                client.write_all(piece).await.unwrap();
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            client
        });

        let mut parser = RequestParser::new(server);
        let request = parser.next_request().await.unwrap().unwrap();
        assert_eq!(request.path(), "/files/b");
        assert_eq!(request.headers().get("content-length"), Some("6"));
        assert_eq!(&request.body()[..], b"abcdef");
        assert!(!parser.is_closed());

        drop(writer.await.unwrap());
    }
}
