//! CRLF-terminated line reading on top of a [`ByteSource`].

use bytes::BytesMut;
use tokio::io::AsyncRead;
use tokio_util::codec::Decoder;

use crate::codec::ByteSource;
use crate::ensure;
use crate::protocol::ParseError;

/// Maximum size in bytes of a single request or header line
pub const MAX_LINE_BYTES: usize = 8 * 1024;

/// One step of line reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A line with its `\r\n` terminator stripped
    Text(String),
    /// The stream closed before any byte of a new line arrived
    EndOfStream,
}

impl Line {
    /// True for an empty line and for end of stream: both end a header block.
    pub fn is_blank(&self) -> bool {
        match self {
            Line::Text(text) => text.is_empty(),
            Line::EndOfStream => true,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Line::Text(text) => text,
            Line::EndOfStream => "",
        }
    }
}

/// Splits buffered bytes into lines on `\n`, dropping the `\r\n` terminator.
#[derive(Debug, Clone)]
pub struct LineDecoder {
    /// Where to resume scanning for `\n` in the buffer
    next_index: usize,
    max_length: usize,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::with_max_length(MAX_LINE_BYTES)
    }

    pub fn with_max_length(max_length: usize) -> Self {
        Self { next_index: 0, max_length }
    }
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineDecoder {
    type Item = String;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let newline = src[self.next_index..].iter().position(|b| *b == b'\n');

        match newline {
            Some(offset) => {
                let line_end = self.next_index + offset;
                self.next_index = 0;
                ensure!(line_end <= self.max_length, ParseError::too_long_line(line_end, self.max_length));

                let line = src.split_to(line_end + 1);
                Ok(Some(to_text(&line[..line_end])))
            }
            None => {
                ensure!(src.len() <= self.max_length, ParseError::too_long_line(src.len(), self.max_length));
                self.next_index = src.len();
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }

        self.next_index = 0;
        if src.is_empty() {
            return Ok(None);
        }

        let rest = src.split();
        Ok(Some(to_text(&rest)))
    }
}

fn to_text(line: &[u8]) -> String {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

/// Reads successive lines from a [`ByteSource`].
#[derive(Debug)]
pub struct LineReader<R> {
    source: ByteSource<R>,
    decoder: LineDecoder,
}

impl<R> LineReader<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(source: ByteSource<R>) -> Self {
        Self { source, decoder: LineDecoder::new() }
    }

    /// Reads the next line, suspending until its `\n` arrives.
    ///
    /// A partial line cut short by the peer closing the stream is still
    /// returned as text; [`Line::EndOfStream`] is only returned when nothing at
    /// all was left.
    pub async fn read_line(&mut self) -> Result<Line, ParseError> {
        Ok(match self.source.decode(&mut self.decoder).await? {
            Some(text) => Line::Text(text),
            None => Line::EndOfStream,
        })
    }

    pub fn source(&self) -> &ByteSource<R> {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut ByteSource<R> {
        &mut self.source
    }
}
