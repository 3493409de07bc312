//! The application served over `petit-http`.
//!
//! - [`router`]: the fixed endpoint table
//! - [`encoding`]: gzip compression negotiated per request
//! - [`storage`]: blob storage behind `/files/`
//! - [`server`]: the TCP listener and per-connection tasks
//! - [`config`]: command line options

pub mod config;
pub mod encoding;
pub mod router;
pub mod server;
pub mod storage;

pub use config::Config;
pub use encoding::EncodingNegotiator;
pub use router::Router;
pub use server::Server;
pub use server::ServerBuilder;
pub use server::ServerError;
