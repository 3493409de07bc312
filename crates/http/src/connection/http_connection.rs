use std::sync::Arc;

use http::{HeaderValue, header};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

use crate::codec::RequestParser;
use crate::connection::message_writer::MessageWriter;
use crate::handler::Handler;
use crate::protocol::{HttpError, Request, Response};

const CLOSE: HeaderValue = HeaderValue::from_static("close");

/// Initial capacity of the response buffer
const WRITE_BUFFER_SIZE: usize = 8 * 1024;

/// An HTTP connection serving sequential requests until it is closed
///
/// Each turn of the loop goes through the same states:
///
/// - parse: read the next request; no request line means the connection is done
/// - handle: hand the request to the [`Handler`]
/// - write: serialize the response and flush it
///
/// After writing, the loop ends if the request asked for `Connection: close`
/// or the peer has already closed its side; otherwise it waits for the next
/// request on the same stream.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    parser: RequestParser<R>,
    writer: MessageWriter<W>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { parser: RequestParser::new(reader), writer: MessageWriter::with_capacity(writer, WRITE_BUFFER_SIZE) }
    }

    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler + ?Sized,
    {
        let result = self.do_process(handler.as_ref()).await;

        if let Err(e) = self.writer.shutdown().await {
            debug!(cause = %e, "shutdown connection error");
        }

        result
    }

    async fn do_process<H>(&mut self, handler: &H) -> Result<(), HttpError>
    where
        H: Handler + ?Sized,
    {
        loop {
            let request = match self.parser.next_request().await? {
                Some(request) => request,
                None => {
                    info!("cant read more request, break this connection down");
                    return Ok(());
                }
            };

            debug!(method = %request.method(), path = request.path(), "receive request");
            let close = wants_close(&request);

            let mut response = handler.call(request).await;
            if close {
                response.headers_mut().insert(header::CONNECTION, CLOSE);
            }

            self.send_response(&response).await?;

            if close {
                info!("client asked to close, break this connection down");
                return Ok(());
            }

            if self.parser.is_closed() {
                info!("client closed the stream, break this connection down");
                return Ok(());
            }
        }
    }

    async fn send_response(&mut self, response: &Response) -> Result<(), HttpError> {
        debug!(status = response.status().as_u16(), "send response");
        self.writer.write(response)?;
        self.writer.flush().await.inspect_err(|e| warn!(cause = %e, "can't send response"))?;
        Ok(())
    }
}

fn wants_close(request: &Request) -> bool {
    request.headers().get(header::CONNECTION.as_str()) == Some("close")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::make_handler;
    use crate::protocol::{bytes_response, empty_response};
    use bytes::Bytes;
    use http::StatusCode;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

    async fn echo_path(request: Request) -> Response {
        if request.path() == "/" {
            return empty_response(StatusCode::OK);
        }
        let body = Bytes::copy_from_slice(request.path().as_bytes());
        bytes_response(StatusCode::OK, HeaderValue::from_static("text/plain"), body)
    }

    fn spawn_connection() -> (DuplexStream, tokio::task::JoinHandle<Result<(), HttpError>>) {
        let (client, server) = tokio::io::duplex(4096);
        let handle = tokio::spawn(async move {
            let (reader, writer) = tokio::io::split(server);
            HttpConnection::new(reader, writer).process(Arc::new(make_handler(echo_path))).await
        });
        (client, handle)
    }

    async fn read_exact_str(client: &mut DuplexStream, len: usize) -> String {
        let mut buf = vec![0u8; len];
        client.read_exact(&mut buf).await.unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn keep_alive_serves_sequential_requests() {
        let (mut client, handle) = spawn_connection();

        client.write_all(b"GET / HTTP/1.1\r\n\r\n").await.unwrap();
        let expected = "HTTP/1.1 200 OK\r\n\r\n";
        assert_eq!(read_exact_str(&mut client, expected.len()).await, expected);

        client.write_all(b"GET /abc HTTP/1.1\r\n\r\n").await.unwrap();
        let expected = "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 4\r\n\r\n/abc";
        assert_eq!(read_exact_str(&mut client, expected.len()).await, expected);

        assert!(!handle.is_finished());

        client.shutdown().await.unwrap();
        handle.await.unwrap().unwrap();

        let mut rest = vec![];
        client.read_to_end(&mut rest).await.unwrap();
        assert!(rest.is_empty());
    }

    #[tokio::test]
    async fn connection_close_is_echoed_and_stream_closed() {
        let (mut client, handle) = spawn_connection();

        client.write_all(b"GET / HTTP/1.1\r\nConnection: close\r\n\r\n").await.unwrap();

        let mut response = vec![];
        client.read_to_end(&mut response).await.unwrap();
        assert_eq!(String::from_utf8(response).unwrap(), "HTTP/1.1 200 OK\r\nConnection: close\r\n\r\n");

        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn request_after_close_is_not_served() {
        let (mut client, handle) = spawn_connection();

        client.write_all(b"GET /a HTTP/1.1\r\nConnection: close\r\n\r\nGET /b HTTP/1.1\r\n\r\n").await.unwrap();

        let mut response = vec![];
        client.read_to_end(&mut response).await.unwrap();
        let response = String::from_utf8(response).unwrap();
        assert!(response.ends_with("Connection: close\r\nContent-Length: 2\r\n\r\n/a"));
        assert!(!response.contains("/b"));

        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn empty_stream_closes_quietly() {
        let (mut client, handle) = spawn_connection();
        client.shutdown().await.unwrap();

        handle.await.unwrap().unwrap();

        let mut rest = vec![];
        client.read_to_end(&mut rest).await.unwrap();
        assert!(rest.is_empty());
    }

    #[tokio::test]
    async fn request_delivered_in_pieces() {
        let (mut client, handle) = spawn_connection();

        for piece in [&b"GET /pi"[..], b"eces HTTP/1.1\r\nHo", b"st: a\r\n", b"\r\n"] {
            client.write_all(piece).await.unwrap();
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let expected = "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 7\r\n\r\n/pieces";
        assert_eq!(read_exact_str(&mut client, expected.len()).await, expected);

        client.shutdown().await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn last_request_answered_when_client_half_closes() {
        let (mut client, handle) = spawn_connection();

        client.write_all(b"GET /last HTTP/1.1\r\n").await.unwrap();
        client.shutdown().await.unwrap();

        let mut response = vec![];
        client.read_to_end(&mut response).await.unwrap();
        assert!(String::from_utf8(response).unwrap().ends_with("\r\n\r\n/last"));

        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn body_cut_short_closes_without_response() {
        let (mut client, handle) = spawn_connection();

        client.write_all(b"POST /upload HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc").await.unwrap();
        client.shutdown().await.unwrap();

        let mut response = vec![];
        client.read_to_end(&mut response).await.unwrap();
        assert!(response.is_empty());

        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn too_long_line_ends_connection_with_error() {
        let (mut client, handle) = spawn_connection();

        let long = vec![b'a'; crate::codec::MAX_LINE_BYTES + 16];
        // the server may drop the stream before the whole line is written
        let _ = client.write_all(&long).await;

        let result = handle.await.unwrap();
        assert!(matches!(result, Err(HttpError::RequestError { .. })));

        let mut rest = vec![];
        client.read_to_end(&mut rest).await.unwrap();
        assert!(rest.is_empty());
    }
}
