//! Core connection handling and lifecycle management
//!
//! - [`HttpConnection`]: drives one accepted connection through its single
//!   request/response exchange
//! - [`ResponseWriter`]: the forward-only state machine handlers use to
//!   emit the response

pub mod http_connection;
pub mod response_writer;

pub use http_connection::HttpConnection;
pub use response_writer::ResponseWriter;
