//! The fixed endpoint table.
//!
//! Routes are checked in this order, the first match wins:
//!
//! | method | path            | response                                         |
//! |--------|-----------------|--------------------------------------------------|
//! | any    | `/`             | 200, no body                                     |
//! | any    | `/echo/{text}`  | 200, `text/plain`, the raw text after the prefix |
//! | any    | `/user-agent`   | 200, `text/plain`, the `User-Agent` value        |
//! | POST   | `/files/{name}` | 201 after storing the request body               |
//! | GET    | `/files/{name}` | 200, `application/octet-stream`, the stored blob |
//!
//! Everything else, including a missing blob, is 404.

use std::sync::Arc;

use http::{HeaderValue, StatusCode, header};
use petit_http::protocol::{Method, Request, Response, bytes_response, empty_response};
use tracing::{error, trace};

use crate::storage::BlobStore;

const TEXT_PLAIN: HeaderValue = HeaderValue::from_static("text/plain");
const OCTET_STREAM: HeaderValue = HeaderValue::from_static("application/octet-stream");

const ECHO_PREFIX: &str = "/echo/";
const FILES_PREFIX: &str = "/files/";
const USER_AGENT_PATH: &str = "/user-agent";

pub struct Router {
    store: Arc<dyn BlobStore>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router").finish_non_exhaustive()
    }
}

impl Router {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    pub async fn route(&self, request: &Request) -> Response {
        let path = request.path();

        if path == "/" {
            return empty_response(StatusCode::OK);
        }

        if let Some(text) = path.strip_prefix(ECHO_PREFIX) {
            return bytes_response(StatusCode::OK, TEXT_PLAIN, text.to_owned());
        }

        if path == USER_AGENT_PATH {
            let user_agent = request.headers().get(header::USER_AGENT.as_str()).unwrap_or_default();
            return bytes_response(StatusCode::OK, TEXT_PLAIN, user_agent.to_owned());
        }

        if let Some(name) = path.strip_prefix(FILES_PREFIX) {
            let response = match request.method() {
                Method::Post => self.store_file(name, request).await,
                Method::Get => self.load_file(name).await,
                Method::Other(_) => None,
            };
            if let Some(response) = response {
                return response;
            }
        }

        trace!(method = %request.method(), path, "no route matched");
        empty_response(StatusCode::NOT_FOUND)
    }

    async fn store_file(&self, name: &str, request: &Request) -> Option<Response> {
        match self.store.write(name, request.body().clone()).await {
            Ok(()) => Some(empty_response(StatusCode::CREATED)),
            Err(e) => {
                error!(cause = %e, name, "store file error");
                None
            }
        }
    }

    async fn load_file(&self, name: &str) -> Option<Response> {
        if !self.store.exists(name).await {
            return None;
        }

        match self.store.read(name).await {
            Ok(content) => Some(bytes_response(StatusCode::OK, OCTET_STREAM, content)),
            Err(e) => {
                error!(cause = %e, name, "load file error");
                None
            }
        }
    }
}
