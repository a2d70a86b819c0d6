//! Response-side protocol types: status codes, writer states and the
//! default header set.

use crate::protocol::Headers;

pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONNECTION: &str = "Connection";
pub const TRANSFER_ENCODING: &str = "Transfer-Encoding";
pub const TRAILER: &str = "Trailer";

/// The closed set of status codes this server emits.
///
/// Making this an enum (rather than a bare integer) means an unsupported
/// code cannot reach the writer at all, so there is no "unknown code" path
/// to handle at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    BadRequest,
    InternalServerError,
}

impl StatusCode {
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::BadRequest => 400,
            Self::InternalServerError => 500,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::BadRequest => "Bad Request",
            Self::InternalServerError => "Internal Server Error",
        }
    }
}

/// The emission phases of a response writer, strictly forward-moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    /// Nothing emitted yet; only the status line may be written.
    StatusLine,
    /// Status line emitted; the header section is pending.
    Headers,
    /// Header section closed; raw or chunked body writes are legal.
    Body,
    /// Chunked body terminated; only trailers may follow.
    Trailers,
}

/// Returns the baseline header set for a plain response body of
/// `content_length` bytes.
///
/// Callers adjust entries before emitting them; a chunked response removes
/// `Content-Length` and `Connection` and sets `Transfer-Encoding: chunked`.
pub fn default_headers(content_length: usize) -> Headers {
    let mut headers = Headers::new();
    headers.set(CONTENT_LENGTH, &content_length.to_string());
    headers.set(CONTENT_TYPE, "text/plain");
    headers.set(CONNECTION, "close");
    headers
}
