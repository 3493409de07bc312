//! Request body decoding.
//!
//! Bodies are only ever `Content-Length` delimited here; there is no chunked
//! transfer-encoding support.

mod length_decoder;

pub use length_decoder::LengthDecoder;
