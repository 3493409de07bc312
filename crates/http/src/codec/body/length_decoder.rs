//! Decoder for byte runs of a known length.
//!
//! Used for `Content-Length` delimited request bodies, and more generally for
//! every exact-count read performed through [`ByteSource::read`](crate::codec::ByteSource::read).

use bytes::{Bytes, BytesMut};
use tokio_util::codec::Decoder;

use crate::protocol::ParseError;

/// Upper bound on buffer growth requested per decode call
const MAX_RESERVE_BYTES: usize = 8 * 1024;

/// A decoder yielding exactly `length` bytes once they are all buffered.
///
/// The buffer grows at most [`MAX_RESERVE_BYTES`] at a time, so a large
/// `length` costs memory only as the bytes actually arrive. At end of stream
/// it yields whatever arrived instead, possibly nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthDecoder {
    /// The number of bytes to hand out
    length: usize,
}

impl LengthDecoder {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Decoder for LengthDecoder {
    type Item = Bytes;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < self.length {
            src.reserve((self.length - src.len()).min(MAX_RESERVE_BYTES));
            return Ok(None);
        }

        Ok(Some(src.split_to(self.length).freeze()))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let len = self.length.min(src.len());
        Ok(Some(src.split_to(len).freeze()))
    }
}
