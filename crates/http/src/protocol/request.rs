//! Request value types.
//!
//! A [`Request`] is produced by the decoder only once the whole head (request
//! line plus header section) has been framed out of the byte stream. It is
//! immutable from then on and owned by a single connection task.

use crate::protocol::Headers;

/// The first line of a request: `METHOD SP TARGET SP VERSION`.
///
/// The wire version must be the literal `HTTP/1.1`; it is stored normalized
/// as `"1.1"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    method: String,
    request_target: String,
    http_version: String,
}

impl RequestLine {
    pub(crate) fn new(method: &str, request_target: &str) -> Self {
        Self { method: method.to_owned(), request_target: request_target.to_owned(), http_version: "1.1".to_owned() }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn request_target(&self) -> &str {
        &self.request_target
    }

    pub fn http_version(&self) -> &str {
        &self.http_version
    }
}

/// A fully framed request: request line plus header collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    request_line: RequestLine,
    headers: Headers,
}

impl Request {
    pub(crate) fn new(request_line: RequestLine, headers: Headers) -> Self {
        Self { request_line, headers }
    }

    pub fn request_line(&self) -> &RequestLine {
        &self.request_line
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn method(&self) -> &str {
        self.request_line.method()
    }

    pub fn request_target(&self) -> &str {
        self.request_line.request_target()
    }

    pub fn http_version(&self) -> &str {
        self.request_line.http_version()
    }
}
