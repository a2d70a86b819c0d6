//! Response writer state machine
//!
//! [`ResponseWriter`] emits a response onto an output sink in the strict
//! order the wire format requires: status line, header section, body (raw
//! or chunked), trailers. Its state only ever moves forward; invoking an
//! operation out of order returns [`SendError::InvalidState`] and writes
//! nothing.
//!
//! For chunked bodies the writer is deliberately agnostic to chunk
//! boundaries: it never computes a size line itself. The caller issues the
//! hex-encoded size as one [`write_chunked_body`](ResponseWriter::write_chunked_body)
//! call and the payload as the next, which lets it interleave sizes and
//! payloads however the data arrives.

use bytes::BytesMut;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::ensure;
use crate::protocol::{CRLF, Headers, SendError, StatusCode, TRAILER, WriterState};

/// A response writer bound to one connection's output sink.
#[derive(Debug)]
pub struct ResponseWriter<W> {
    writer: W,
    state: WriterState,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self { writer, state: WriterState::StatusLine }
    }

    /// The current emission phase.
    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Emits `HTTP/1.1 <code> <reason>` and moves on to the header section.
    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), SendError> {
        ensure!(self.state == WriterState::StatusLine, SendError::invalid_state(WriterState::StatusLine, self.state));

        let line = format!("HTTP/1.1 {} {}\r\n", status.code(), status.reason());
        self.writer.write_all(line.as_bytes()).await?;

        self.state = WriterState::Headers;
        Ok(())
    }

    /// Emits one `Key: Value` line per entry plus the blank line closing the
    /// header section, then moves on to the body.
    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), SendError> {
        ensure!(self.state == WriterState::Headers, SendError::invalid_state(WriterState::Headers, self.state));

        let mut buf = BytesMut::new();
        for (name, value) in headers.iter() {
            put_field_line(&mut buf, name, value);
        }
        buf.extend_from_slice(CRLF);

        self.writer.write_all(buf.as_ref()).await?;

        self.state = WriterState::Body;
        Ok(())
    }

    /// Writes `body` verbatim. May be called repeatedly to stream a body;
    /// the state is unchanged.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<usize, SendError> {
        ensure!(self.state == WriterState::Body, SendError::invalid_state(WriterState::Body, self.state));

        self.writer.write_all(body).await?;
        Ok(body.len())
    }

    /// Writes one chunked-encoding line: `chunk` followed by a terminator.
    ///
    /// The caller sends the hex-encoded size as its own preceding call; the
    /// writer never prepends one.
    pub async fn write_chunked_body(&mut self, chunk: &[u8]) -> Result<usize, SendError> {
        ensure!(self.state == WriterState::Body, SendError::invalid_state(WriterState::Body, self.state));

        let mut buf = BytesMut::with_capacity(chunk.len() + CRLF.len());
        buf.extend_from_slice(chunk);
        buf.extend_from_slice(CRLF);

        self.writer.write_all(buf.as_ref()).await?;
        Ok(buf.len())
    }

    /// Terminates the chunked body with a single `0` line and moves on to
    /// the trailer section.
    ///
    /// Note this is one terminator, not the double terminator that would
    /// conventionally close a chunked message with no trailers.
    pub async fn write_chunked_body_done(&mut self) -> Result<usize, SendError> {
        ensure!(self.state == WriterState::Body, SendError::invalid_state(WriterState::Body, self.state));

        const DONE: &[u8] = b"0\r\n";
        self.writer.write_all(DONE).await?;

        self.state = WriterState::Trailers;
        Ok(DONE.len())
    }

    /// Emits one `Name: Value` line for each name declared in the `Trailer`
    /// entry of `headers` (a comma-and-space separated list), followed by
    /// the blank line closing the trailer section.
    ///
    /// Values are looked up in the same collection; a declared name with no
    /// stored value is emitted empty.
    pub async fn write_trailers(&mut self, headers: &Headers) -> Result<(), SendError> {
        ensure!(self.state == WriterState::Trailers, SendError::invalid_state(WriterState::Trailers, self.state));

        let declared = headers.get(TRAILER).unwrap_or("");

        let mut buf = BytesMut::new();
        for name in declared.split(", ").filter(|name| !name.is_empty()) {
            put_field_line(&mut buf, name, headers.get(name).unwrap_or(""));
        }
        buf.extend_from_slice(CRLF);

        self.writer.write_all(buf.as_ref()).await?;
        Ok(())
    }
}

fn put_field_line(buf: &mut BytesMut, name: &str, value: &str) {
    buf.extend_from_slice(name.as_bytes());
    buf.extend_from_slice(b": ");
    buf.extend_from_slice(value.as_bytes());
    buf.extend_from_slice(CRLF);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{CONNECTION, CONTENT_LENGTH, TRANSFER_ENCODING, default_headers};
    use std::io::Cursor;

    fn writer() -> ResponseWriter<Cursor<Vec<u8>>> {
        ResponseWriter::new(Cursor::new(Vec::new()))
    }

    fn written(writer: ResponseWriter<Cursor<Vec<u8>>>) -> Vec<u8> {
        writer.into_inner().into_inner()
    }

    #[tokio::test]
    async fn writes_status_lines() {
        for (status, expected) in [
            (StatusCode::Ok, "HTTP/1.1 200 OK\r\n"),
            (StatusCode::BadRequest, "HTTP/1.1 400 Bad Request\r\n"),
            (StatusCode::InternalServerError, "HTTP/1.1 500 Internal Server Error\r\n"),
        ] {
            let mut w = writer();
            w.write_status_line(status).await.unwrap();
            assert_eq!(written(w), expected.as_bytes());
        }
    }

    #[tokio::test]
    async fn headers_before_status_line_writes_nothing() {
        let mut w = writer();

        let result = w.write_headers(&Headers::new()).await;
        assert!(matches!(
            result,
            Err(SendError::InvalidState { expected: WriterState::Headers, actual: WriterState::StatusLine })
        ));
        assert_eq!(w.state(), WriterState::StatusLine);
        assert!(written(w).is_empty());
    }

    #[tokio::test]
    async fn body_after_chunked_done_is_rejected() {
        let mut w = writer();
        w.write_status_line(StatusCode::Ok).await.unwrap();
        w.write_headers(&Headers::new()).await.unwrap();
        w.write_chunked_body_done().await.unwrap();

        let result = w.write_body(b"late").await;
        assert!(matches!(
            result,
            Err(SendError::InvalidState { expected: WriterState::Body, actual: WriterState::Trailers })
        ));
    }

    #[tokio::test]
    async fn emits_header_section_in_sorted_order() {
        let mut w = writer();
        w.write_status_line(StatusCode::Ok).await.unwrap();

        let mut headers = Headers::new();
        headers.set("Content-Type", "text/plain");
        headers.set("Connection", "close");
        w.write_headers(&headers).await.unwrap();

        let expected = "HTTP/1.1 200 OK\r\nconnection: close\r\ncontent-type: text/plain\r\n\r\n";
        assert_eq!(written(w), expected.as_bytes());
    }

    #[tokio::test]
    async fn streams_a_plain_body_across_calls() {
        let mut w = writer();
        w.write_status_line(StatusCode::Ok).await.unwrap();
        w.write_headers(&default_headers(11)).await.unwrap();

        assert_eq!(w.write_body(b"hello ").await.unwrap(), 6);
        assert_eq!(w.write_body(b"world").await.unwrap(), 5);

        let bytes = written(w);
        assert!(bytes.ends_with(b"\r\n\r\nhello world"));
    }

    #[tokio::test]
    async fn chunked_body_emits_exact_framing() {
        let mut w = writer();
        w.write_status_line(StatusCode::Ok).await.unwrap();
        w.write_headers(&Headers::new()).await.unwrap();

        w.write_chunked_body(b"4").await.unwrap();
        w.write_chunked_body(b"data").await.unwrap();
        w.write_chunked_body_done().await.unwrap();

        let expected = "HTTP/1.1 200 OK\r\n\r\n4\r\ndata\r\n0\r\n";
        assert_eq!(written(w), expected.as_bytes());
    }

    #[tokio::test]
    async fn trailers_follow_the_declared_names() {
        let mut w = writer();
        w.write_status_line(StatusCode::Ok).await.unwrap();

        let mut headers = default_headers(0);
        headers.remove(CONTENT_LENGTH);
        headers.remove(CONNECTION);
        headers.set(TRANSFER_ENCODING, "chunked");
        headers.set(TRAILER, "X-Chunk-Count, X-Body-Length");
        w.write_headers(&headers).await.unwrap();

        w.write_chunked_body(b"3").await.unwrap();
        w.write_chunked_body(b"abc").await.unwrap();
        w.write_chunked_body_done().await.unwrap();

        let mut trailers = Headers::new();
        trailers.set(TRAILER, "X-Chunk-Count, X-Body-Length");
        trailers.set("X-Chunk-Count", "1");
        trailers.set("X-Body-Length", "3");
        w.write_trailers(&trailers).await.unwrap();

        let bytes = written(w);
        let text = std::str::from_utf8(&bytes).unwrap();
        assert!(text.ends_with("0\r\nX-Chunk-Count: 1\r\nX-Body-Length: 3\r\n\r\n"));
    }

    #[tokio::test]
    async fn trailers_without_declaration_emit_only_the_closing_line() {
        let mut w = writer();
        w.write_status_line(StatusCode::Ok).await.unwrap();
        w.write_headers(&Headers::new()).await.unwrap();
        w.write_chunked_body_done().await.unwrap();

        w.write_trailers(&Headers::new()).await.unwrap();

        assert!(written(w).ends_with(b"0\r\n\r\n"));
    }
}
