//! Incoming line framing.
//!
//! Lines end in `\n`, with an optional `\r` before it. Bytes that are not
//! valid UTF-8 are replaced with U+FFFD instead of failing the connection.

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{AnyDelimiterCodec, AnyDelimiterCodecError, Decoder};

/// Decoder for client lines, tolerant of invalid UTF-8.
#[derive(Debug)]
pub struct ChatLineCodec {
    inner: AnyDelimiterCodec,
}

impl ChatLineCodec {
    /// Lines longer than `max_length` bytes fail with
    /// `AnyDelimiterCodecError::MaxChunkLengthExceeded`.
    pub fn new_with_max_length(max_length: usize) -> Self {
        Self {
            inner: AnyDelimiterCodec::new_with_max_length(
                b"\n".to_vec(),
                b"\n".to_vec(),
                max_length,
            ),
        }
    }
}

impl Decoder for ChatLineCodec {
    type Item = String;
    type Error = AnyDelimiterCodecError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<String>, Self::Error> {
        Ok(self.inner.decode(buf)?.map(into_line))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<String>, Self::Error> {
        Ok(self.inner.decode_eof(buf)?.map(into_line))
    }
}

fn into_line(chunk: Bytes) -> String {
    let line = chunk.strip_suffix(b"\r").unwrap_or(&chunk[..]);
    String::from_utf8_lossy(line).into_owned()
}
