//! Client line framing
//!
//! Splits the inbound byte stream on `\n` with a hard cap on line length.
//! Lines are decoded lossily so a stray non-UTF-8 byte does not end a session;
//! a trailing `\r` is dropped.

use bytes::BytesMut;
use tokio_util::codec::{AnyDelimiterCodec, AnyDelimiterCodecError, Decoder};

/// Longest accepted line in bytes, excluding the terminator
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Newline-delimited text decoder with a length limit
#[derive(Debug, Clone)]
pub struct LineCodec {
    inner: AnyDelimiterCodec,
}

impl LineCodec {
    pub fn new() -> Self {
        Self::with_max_length(MAX_LINE_LENGTH)
    }

    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            inner: AnyDelimiterCodec::new_with_max_length(b"\n".to_vec(), Vec::new(), max_length),
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn to_line(chunk: &[u8]) -> String {
    let chunk = chunk.strip_suffix(b"\r").unwrap_or(chunk);
    String::from_utf8_lossy(chunk).into_owned()
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = AnyDelimiterCodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, Self::Error> {
        Ok(self.inner.decode(src)?.map(|chunk| to_line(&chunk)))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>, Self::Error> {
        Ok(self.inner.decode_eof(src)?.map(|chunk| to_line(&chunk)))
    }
}
