use std::io;
use thiserror::Error;

use crate::protocol::response::WriterState;

/// Top level error for a single connection's request/response exchange.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

/// Errors produced while framing a request out of the byte stream.
///
/// The "need more data" case is not an error: the decoder reports it as zero
/// bytes consumed and the read loop keeps reading. Every variant here is
/// fatal to the request being parsed.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed request line: {reason}")]
    MalformedRequestLine { reason: String },

    #[error("malformed method {method:?}: expected uppercase ascii letters")]
    MethodFormat { method: String },

    #[error("unsupported http version: expected HTTP/1.1, got {version:?}")]
    UnsupportedVersion { version: String },

    #[error("malformed header line: {reason}")]
    MalformedHeaderLine { reason: String },

    #[error("stream ended before the request line was complete")]
    IncompleteRequestLine,

    #[error("stream ended before the header section was complete")]
    IncompleteHeaders,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn malformed_request_line<S: ToString>(reason: S) -> Self {
        Self::MalformedRequestLine { reason: reason.to_string() }
    }

    pub fn method_format<S: ToString>(method: S) -> Self {
        Self::MethodFormat { method: method.to_string() }
    }

    pub fn unsupported_version<S: ToString>(version: S) -> Self {
        Self::UnsupportedVersion { version: version.to_string() }
    }

    pub fn malformed_header_line<S: ToString>(reason: S) -> Self {
        Self::MalformedHeaderLine { reason: reason.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

/// Errors produced while emitting a response.
///
/// `InvalidState` reports a caller-programming error: the operation was
/// invoked while the writer was not in the state it requires, and nothing
/// was written.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("writer is in state {actual:?}, operation requires {expected:?}")]
    InvalidState { expected: WriterState, actual: WriterState },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn invalid_state(expected: WriterState, actual: WriterState) -> Self {
        Self::InvalidState { expected, actual }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
