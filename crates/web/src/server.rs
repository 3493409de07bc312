use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use petit_http::connection::HttpConnection;
use petit_http::handler::Handler;
use petit_http::protocol::{Request, Response};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::encoding::EncodingNegotiator;
use crate::router::Router;
use crate::storage::BlobStore;

/// `localhost:4221`
pub const DEFAULT_ADDRESS: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 4221));

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

pub struct ServerBuilder {
    store: Option<Arc<dyn BlobStore>>,
    address: SocketAddr,
}

impl std::fmt::Debug for ServerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerBuilder").field("address", &self.address).finish_non_exhaustive()
    }
}

impl ServerBuilder {
    fn new() -> Self {
        Self { store: None, address: DEFAULT_ADDRESS }
    }

    pub fn address(mut self, address: SocketAddr) -> Self {
        self.address = address;
        self
    }

    pub fn store(mut self, store: Arc<dyn BlobStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let store = self.store.ok_or(ServerBuildError::MissingStore)?;
        Ok(Server { router: Router::new(store), negotiator: EncodingNegotiator, address: self.address })
    }
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("blob store must be set")]
    MissingStore,
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("bind {address} error: {source}")]
    Bind { address: SocketAddr, source: io::Error },
}

/// Routes each request, then negotiates the response encoding.
#[derive(Debug)]
pub struct Server {
    router: Router,
    negotiator: EncodingNegotiator,
    address: SocketAddr,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// Binds the configured address and serves connections forever.
    ///
    /// Only a bind failure is returned; per-connection failures are logged
    /// and end that connection alone.
    pub async fn start(self) -> Result<(), ServerError> {
        let address = self.address;
        let tcp_listener =
            TcpListener::bind(address).await.map_err(|source| ServerError::Bind { address, source })?;

        info!("start listening at {}", address);
        self.serve(tcp_listener).await;
        Ok(())
    }

    /// Accepts connections from an already bound listener.
    pub async fn serve(self, tcp_listener: TcpListener) {
        let handler = Arc::new(self);
        loop {
            let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let id = NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed);
            let handler = Arc::clone(&handler);

            tokio::spawn(
                async move {
                    debug!(%remote_addr, "accepted connection");
                    let (reader, writer) = tcp_stream.into_split();
                    let connection = HttpConnection::new(reader, writer);
                    match connection.process(handler).await {
                        Ok(_) => {
                            info!("finished process, connection shutdown");
                        }
                        Err(e) => {
                            error!("service has error, cause {}, connection shutdown", e);
                        }
                    }
                }
                .instrument(info_span!("connection", id)),
            );
        }
    }
}

#[async_trait]
impl Handler for Server {
    async fn call(&self, request: Request) -> Response {
        let mut response = self.router.route(&request).await;
        self.negotiator.on_response(&request, &mut response);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBlobStore;
    use http::{StatusCode, header};
    use petit_http::protocol::Method;

    fn server() -> Server {
        Server::builder().store(Arc::new(MemoryBlobStore::new())).build().unwrap()
    }

    #[test]
    fn builder_defaults_to_localhost_4221() {
        assert_eq!(server().address().to_string(), "127.0.0.1:4221");
    }

    #[test]
    fn builder_requires_store() {
        assert!(matches!(Server::builder().build(), Err(ServerBuildError::MissingStore)));
    }

    #[tokio::test]
    async fn call_routes_then_encodes() {
        let request = Request::new(Method::Get, "/echo/abc", "HTTP/1.1").with_header("Accept-Encoding", "gzip");
        let response = server().call(request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::CONTENT_ENCODING).unwrap(), "gzip");
    }

    #[tokio::test]
    async fn not_found_is_never_encoded() {
        let request = Request::new(Method::Get, "/missing", "HTTP/1.1").with_header("Accept-Encoding", "gzip");
        let response = server().call(request).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(header::CONTENT_ENCODING).is_none());
    }

    #[tokio::test]
    async fn bind_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        let server = Server::builder().store(Arc::new(MemoryBlobStore::new())).address(address).build().unwrap();
        assert!(matches!(server.start().await, Err(ServerError::Bind { .. })));
    }
}
