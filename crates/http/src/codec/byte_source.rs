//! Exact-count reads over a raw, partially delivered stream.
//!
//! [`ByteSource`] owns the read half of a connection together with a read
//! buffer. Every read is expressed as a [`Decoder`] run against that buffer:
//! when the decoder needs more data the source suspends on the socket, and once
//! the peer has closed the stream the decoder gets a final `decode_eof` call so
//! it can hand out whatever is left instead of waiting forever.

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::body::LengthDecoder;
use crate::protocol::ParseError;

/// Initial capacity of the read buffer
const INIT_BUFFER_SIZE: usize = 8 * 1024;

/// Spare room guaranteed before each socket read
const MIN_READ_SIZE: usize = 1024;

#[derive(Debug)]
pub struct ByteSource<R> {
    reader: R,
    buffer: BytesMut,
    closed: bool,
}

impl<R> ByteSource<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, INIT_BUFFER_SIZE)
    }

    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self { reader, buffer: BytesMut::with_capacity(capacity), closed: false }
    }

    /// Returns true once the peer has been seen closing the stream.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Bytes received but not consumed yet.
    #[inline]
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    /// Reads exactly `n` bytes, assembling them across as many socket reads as
    /// needed.
    ///
    /// If the stream closes first, returns the bytes that did arrive, which
    /// may be fewer than `n` or none at all.
    pub async fn read(&mut self, n: usize) -> Result<Bytes, ParseError> {
        let mut decoder = LengthDecoder::new(n);
        Ok(self.decode(&mut decoder).await?.unwrap_or_default())
    }

    /// Runs `decoder` against the buffered data, reading from the stream until
    /// it produces an item or the stream is closed.
    ///
    /// After closure the decoder's `decode_eof` decides what, if anything, is
    /// left to hand out; `Ok(None)` then means end of input.
    pub async fn decode<D>(&mut self, decoder: &mut D) -> Result<Option<D::Item>, D::Error>
    where
        D: Decoder,
    {
        loop {
            if self.closed {
                return decoder.decode_eof(&mut self.buffer);
            }

            if let Some(item) = decoder.decode(&mut self.buffer)? {
                return Ok(Some(item));
            }

            self.fill().await?;
        }
    }

    async fn fill(&mut self) -> Result<usize, std::io::Error> {
        self.buffer.reserve(MIN_READ_SIZE);
        let read = self.reader.read_buf(&mut self.buffer).await?;
        if read == 0 {
            trace!(remaining = self.buffer.len(), "stream closed by peer");
            self.closed = true;
        }
        Ok(read)
    }
}
