use std::io;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Initial capacity of a [`ParseBuffer`], and the fixed step by which it
/// grows whenever a read would not fit in the remaining capacity.
pub const BUFFER_SIZE: usize = 1024;

/// A growable read buffer with an explicit consumed cursor.
///
/// The buffer is privately owned by one connection's read loop and never
/// shared. [`fill_from`](Self::fill_from) appends bytes read from the
/// transport, [`unparsed`](Self::unparsed) exposes everything not yet
/// consumed, and [`consume`](Self::consume) discards a parsed prefix.
/// Compaction is lossless: after consuming `k` bytes the retained content
/// equals the previous content with its first `k` bytes removed, for any
/// sequence of growth events.
#[derive(Debug)]
pub struct ParseBuffer {
    buf: BytesMut,
}

impl Default for ParseBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseBuffer {
    pub fn new() -> Self {
        Self::with_capacity(BUFFER_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: BytesMut::with_capacity(capacity) }
    }

    /// Reads once from `reader` into the spare capacity, growing the buffer
    /// by [`BUFFER_SIZE`] first if it is full. Growth compacts the consumed
    /// prefix and copies the retained content forward, so arbitrarily long
    /// request heads are bounded only by memory.
    ///
    /// Returns the number of bytes read; `0` means end of stream.
    pub async fn fill_from<R>(&mut self, reader: &mut R) -> io::Result<usize>
    where
        R: AsyncRead + Unpin,
    {
        if self.buf.capacity() == self.buf.len() {
            self.buf.reserve(BUFFER_SIZE);
        }

        reader.read_buf(&mut self.buf).await
    }

    /// The bytes read so far that have not been consumed yet.
    pub fn unparsed(&self) -> &[u8] {
        self.buf.as_ref()
    }

    /// Discards the first `n` unparsed bytes.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the unparsed length.
    pub fn consume(&mut self, n: usize) {
        self.buf.advance(n);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
