use crate::encoding::Writer;
use bytes::Bytes;
use flate2::Compression;
use flate2::write::GzEncoder;
use http::{HeaderValue, header};
use petit_http::protocol::{Request, Response};
use std::io;
use std::io::Write;
use tracing::{error, trace};

/// Represents the supported content encodings.
pub(crate) enum Encoder {
    Gzip(GzEncoder<Writer>),
}

impl Encoder {
    fn gzip() -> Self {
        Self::Gzip(GzEncoder::new(Writer::new(), Compression::default()))
    }

    /// Picks an encoder from an `Accept-Encoding` value.
    ///
    /// Entries are comma separated and trimmed, then matched exactly and
    /// case-sensitively; the first supported entry wins.
    fn select(accept_encodings: &str) -> Option<Self> {
        accept_encodings.split(',').map(str::trim).find_map(|encoding| match encoding {
            "gzip" => Some(Self::gzip()),
            _ => None,
        })
    }

    fn name(&self) -> &'static str {
        match self {
            Encoder::Gzip(_) => "gzip",
        }
    }

    /// Compresses `data` as a single, finished stream.
    fn encode(self, data: &[u8]) -> Result<Bytes, io::Error> {
        match self {
            Self::Gzip(mut encoder) => {
                encoder.write_all(data)?;
                Ok(encoder.finish()?.freeze())
            }
        }
    }
}

/// Compresses response bodies when the client accepts a supported encoding.
///
/// Runs after routing and before the response is serialized, so the
/// `Content-Length` written later reflects the encoded body.
#[derive(Debug, Default, Clone, Copy)]
pub struct EncodingNegotiator;

impl EncodingNegotiator {
    pub fn on_response(&self, request: &Request, response: &mut Response) {
        let Some(accept_encodings) = request.headers().get(header::ACCEPT_ENCODING.as_str()) else {
            return;
        };

        let Some(encoder) = Encoder::select(accept_encodings) else {
            trace!(accept_encodings, "no supported encoding");
            return;
        };

        let Some(body) = response.body().as_ref().filter(|body| !body.is_empty()) else {
            return;
        };

        let name = encoder.name();
        match encoder.encode(body) {
            Ok(encoded) => {
                trace!(encoding = name, before = body.len(), after = encoded.len(), "encoded response body");
                *response.body_mut() = Some(encoded);
                response.headers_mut().insert(header::CONTENT_ENCODING, HeaderValue::from_static(name));
            }
            Err(e) => error!(cause = %e, encoding = name, "encode response body error, send it as is"),
        }
    }
}
