//! Protocol types and abstractions
//!
//! This module defines the value types and errors shared by the decoding and
//! encoding halves of the crate:
//!
//! - [`Headers`]: case-insensitive header collection with line-level parsing
//! - [`Request`] / [`RequestLine`]: a fully framed request
//! - [`StatusCode`] / [`WriterState`]: response-side protocol state
//! - [`HttpError`], [`ParseError`], [`SendError`]: the error taxonomy

pub mod error;
pub mod headers;
pub mod request;
pub mod response;

pub use error::{HttpError, ParseError, SendError};
pub use headers::Headers;
pub use request::{Request, RequestLine};
pub use response::{CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, TRAILER, TRANSFER_ENCODING};
pub use response::{StatusCode, WriterState, default_headers};

/// The line terminator used throughout HTTP/1.1 text framing.
pub(crate) const CRLF: &[u8] = b"\r\n";

/// Returns the offset of the first CRLF in `data`, if one is present.
pub(crate) fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(CRLF.len()).position(|window| window == CRLF)
}
