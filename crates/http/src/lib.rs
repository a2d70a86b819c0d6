//! HTTP/1.1 message framing straight over a TCP socket
//!
//! This crate implements HTTP/1.1 framing directly on top of a raw
//! byte-oriented transport, without a pre-built HTTP stack. Its value is in
//! the protocol plumbing: turning an unbounded, arbitrarily-chunked byte
//! stream into a well-formed request, and turning a sequence of writer
//! calls into a well-formed response, including chunked transfer encoding
//! and trailers.
//!
//! # Features
//!
//! - Incremental request-line/header parsing that is correct for any
//!   fragmentation of the input across reads
//! - Case-insensitive header collection with validation and duplicate-merge
//!   semantics
//! - A forward-only response writer enforcing strict emission order, with
//!   chunked bodies and trailers
//! - One task per accepted connection on top of tokio, one exchange per
//!   connection
//!
//! # Example
//!
//! ```no_run
//! use raw_http::connection::ResponseWriter;
//! use raw_http::handler::make_handler;
//! use raw_http::protocol::{Request, StatusCode, default_headers};
//! use raw_http::server::Server;
//! use tokio::net::tcp::OwnedWriteHalf;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let server = Server::serve(("127.0.0.1", 8080), make_handler(hello_world)).await?;
//!
//!     tokio::signal::ctrl_c().await?;
//!     server.stop();
//!     Ok(())
//! }
//!
//! async fn hello_world(mut writer: ResponseWriter<OwnedWriteHalf>, _request: Request) {
//!     let body = b"Hello World!\r\n";
//!     let _ = writer.write_status_line(StatusCode::Ok).await;
//!     let _ = writer.write_headers(&default_headers(body.len())).await;
//!     let _ = writer.write_body(body).await;
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: value types, header collection and the error taxonomy
//! - [`codec`]: the parse buffer and the incremental request decoder
//! - [`connection`]: per-connection lifecycle and the response writer
//! - [`handler`]: the handler trait at the application boundary
//! - [`server`]: listener binding, accept loop and shutdown
//!
//! # Limitations
//!
//! This is deliberately not a conforming full HTTP/1.1 implementation:
//! there is no keep-alive, no pipelining, no request bodies, no
//! compression and no TLS. Each accepted connection serves exactly one
//! request/response exchange, and neither reads nor writes carry a
//! timeout, so a slow peer holds its connection task indefinitely.

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;
pub mod server;

mod utils;
pub(crate) use utils::ensure;
