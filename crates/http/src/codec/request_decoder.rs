//! Incremental request decoder
//!
//! [`RequestDecoder`] frames a request head (request line plus header
//! section) out of an arbitrarily fragmented byte stream. It is driven by a
//! read loop that offers it the unconsumed buffer contents after every read:
//! the decoder consumes as many complete lines as the offer holds and
//! reports the consumed length, where zero means "need more data". The
//! result is identical for every way of splitting the same request across
//! reads.
//!
//! # State Machine
//!
//! `RequestLine → Headers → Done`, strictly forward. A framing violation in
//! any state is fatal to the whole request; there is no partial success.

use crate::ensure;
use crate::protocol::{CRLF, Headers, ParseError, Request, RequestLine, find_crlf};

const SUPPORTED_HTTP_VERSION: &str = "HTTP/1.1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    RequestLine,
    Headers,
    Done,
}

/// A decoder for request heads that accumulates its result across offers.
#[derive(Debug)]
pub struct RequestDecoder {
    state: DecodeState,
    request_line: Option<RequestLine>,
    headers: Headers,
}

impl RequestDecoder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Consumes as many complete lines from `src` as are present, possibly
    /// crossing the request-line/headers transition in a single call.
    ///
    /// Returns the number of bytes consumed; the caller discards that
    /// prefix before the next offer. Zero means more data is needed.
    pub fn decode(&mut self, src: &[u8]) -> Result<usize, ParseError> {
        let mut consumed = 0;

        loop {
            match self.state {
                DecodeState::RequestLine => {
                    let Some((request_line, n)) = parse_request_line(&src[consumed..])? else {
                        break;
                    };
                    self.request_line = Some(request_line);
                    self.state = DecodeState::Headers;
                    consumed += n;
                }
                DecodeState::Headers => {
                    let (n, done) = self.headers.parse(&src[consumed..])?;
                    if done {
                        // the blank line's own terminator belongs to this request
                        consumed += CRLF.len();
                        self.state = DecodeState::Done;
                    } else if n == 0 {
                        break;
                    } else {
                        consumed += n;
                    }
                }
                DecodeState::Done => break,
            }
        }

        Ok(consumed)
    }

    pub fn is_done(&self) -> bool {
        self.state == DecodeState::Done
    }

    /// Finishes decoding, yielding the framed request.
    ///
    /// Called at end of stream: reaching EOF while the request line or the
    /// header section is still incomplete is an error, while EOF after the
    /// head is framed is a normal completion.
    pub fn finish(self) -> Result<Request, ParseError> {
        match self.state {
            DecodeState::RequestLine => Err(ParseError::IncompleteRequestLine),
            DecodeState::Headers => Err(ParseError::IncompleteHeaders),
            DecodeState::Done => {
                let request_line = self.request_line.ok_or(ParseError::IncompleteRequestLine)?;
                Ok(Request::new(request_line, self.headers))
            }
        }
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self { state: DecodeState::RequestLine, request_line: None, headers: Headers::new() }
    }
}

/// Parses a complete request line if its terminator has arrived.
///
/// Absence of a CRLF is "need more data", not an error. Once a terminator
/// is present the line must split into exactly three space-separated
/// tokens: an all-uppercase method, a target, and the literal `HTTP/1.1`.
fn parse_request_line(src: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let Some(line_end) = find_crlf(src) else {
        return Ok(None);
    };

    let line = std::str::from_utf8(&src[..line_end])
        .map_err(|_| ParseError::malformed_request_line("request line is not valid utf-8"))?;

    let parts: Vec<&str> = line.split(' ').collect();
    let &[method, request_target, http_version] = parts.as_slice() else {
        return Err(ParseError::malformed_request_line(format!("expected 3 parts, got {}", parts.len())));
    };

    ensure!(method.bytes().all(|b| b.is_ascii_uppercase()), ParseError::method_format(method));
    ensure!(http_version == SUPPORTED_HTTP_VERSION, ParseError::unsupported_version(http_version));

    Ok(Some((RequestLine::new(method, request_target), line_end + CRLF.len())))
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST: &[u8] = b"GET / HTTP/1.1\r\nHost: localhost:42069\r\n\r\n";

    fn decode_all(input: &[u8], chunk_size: usize) -> Result<Request, ParseError> {
        let mut decoder = RequestDecoder::new();
        let mut buffer: Vec<u8> = Vec::new();

        for chunk in input.chunks(chunk_size) {
            buffer.extend_from_slice(chunk);
            let consumed = decoder.decode(&buffer)?;
            buffer.drain(..consumed);
        }

        decoder.finish()
    }

    #[test]
    fn decodes_full_request_in_one_offer() {
        let mut decoder = RequestDecoder::new();

        let consumed = decoder.decode(REQUEST).unwrap();
        assert_eq!(consumed, REQUEST.len());
        assert!(decoder.is_done());

        let request = decoder.finish().unwrap();
        assert_eq!(request.method(), "GET");
        assert_eq!(request.request_target(), "/");
        assert_eq!(request.http_version(), "1.1");
        assert_eq!(request.headers().get("host"), Some("localhost:42069"));
    }

    #[test]
    fn decoding_is_invariant_under_fragmentation() {
        let whole = decode_all(REQUEST, REQUEST.len()).unwrap();

        for chunk_size in 1..REQUEST.len() {
            let fragmented = decode_all(REQUEST, chunk_size).unwrap();
            assert_eq!(fragmented, whole, "chunk size {chunk_size}");
        }
    }

    #[test]
    fn merges_duplicate_headers_in_one_request() {
        let request = decode_all(b"GET /a HTTP/1.1\r\nX: a\r\nX: b\r\n\r\n", 7).unwrap();
        assert_eq!(request.headers().get("x"), Some("a, b"));
    }

    #[test]
    fn incomplete_line_consumes_nothing() {
        let mut decoder = RequestDecoder::new();
        let consumed = decoder.decode(b"GET / HTTP/1.1").unwrap();
        assert_eq!(consumed, 0);
        assert!(!decoder.is_done());
    }

    #[test]
    fn two_token_request_line_is_malformed_not_incomplete() {
        let mut decoder = RequestDecoder::new();
        let result = decoder.decode(b"GET /\r\n");
        assert!(matches!(result, Err(ParseError::MalformedRequestLine { .. })));
    }

    #[test]
    fn double_space_makes_four_tokens() {
        let mut decoder = RequestDecoder::new();
        let result = decoder.decode(b"GET  / HTTP/1.1\r\n");
        assert!(matches!(result, Err(ParseError::MalformedRequestLine { .. })));
    }

    #[test]
    fn lowercase_method_is_rejected() {
        let mut decoder = RequestDecoder::new();
        let result = decoder.decode(b"get / HTTP/1.1\r\n");
        assert!(matches!(result, Err(ParseError::MethodFormat { .. })));
    }

    #[test]
    fn wrong_version_is_rejected() {
        let mut decoder = RequestDecoder::new();
        let result = decoder.decode(b"GET / HTTP/1.0\r\n");
        assert!(matches!(result, Err(ParseError::UnsupportedVersion { .. })));
    }

    #[test]
    fn bad_header_line_aborts_the_request() {
        let mut decoder = RequestDecoder::new();
        let result = decoder.decode(b"GET / HTTP/1.1\r\nHost : localhost\r\n\r\n");
        assert!(matches!(result, Err(ParseError::MalformedHeaderLine { .. })));
    }

    #[test]
    fn finish_before_request_line_completes() {
        let decoder = RequestDecoder::new();
        assert!(matches!(decoder.finish(), Err(ParseError::IncompleteRequestLine)));
    }

    #[test]
    fn finish_inside_header_section() {
        let mut decoder = RequestDecoder::new();
        decoder.decode(b"GET / HTTP/1.1\r\nHost: localhost\r\n").unwrap();
        assert!(matches!(decoder.finish(), Err(ParseError::IncompleteHeaders)));
    }

    #[test]
    fn trailing_bytes_are_left_unconsumed() {
        let mut decoder = RequestDecoder::new();
        let input = b"GET / HTTP/1.1\r\n\r\nleftover";
        let consumed = decoder.decode(input).unwrap();
        assert_eq!(consumed, input.len() - b"leftover".len());
        assert!(decoder.is_done());
    }
}
