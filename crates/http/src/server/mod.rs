//! Accept loop and server handle
//!
//! [`Server::serve`] binds a listening endpoint and runs the accept loop as
//! an independent task: one task for accepting, one spawned task per
//! accepted connection, unbounded fan-out, no shared mutable state between
//! connection tasks. The only cross-task shared resource is the shutdown
//! signalling pair: a [`CancellationToken`] plus the atomic closed flag the
//! accept loop consults to tell an intentional shutdown apart from a
//! transient accept failure.
//!
//! Stopping the server does not drain in-flight connections; they are
//! neither tracked nor signalled.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::connection::HttpConnection;
use crate::handler::Handler;

/// Handle to a running server, usable to stop the accept loop.
#[derive(Debug)]
pub struct Server {
    local_addr: SocketAddr,
    closed: Arc<AtomicBool>,
    shutdown: CancellationToken,
}

impl Server {
    /// Binds `addr` and starts accepting connections in a background task.
    ///
    /// Each accepted connection is served by its own task: parse one
    /// request, invoke `handler`, close the connection.
    pub async fn serve<A, H>(addr: A, handler: H) -> io::Result<Self>
    where
        A: ToSocketAddrs,
        H: Handler<OwnedWriteHalf> + 'static,
    {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        let closed = Arc::new(AtomicBool::new(false));
        let shutdown = CancellationToken::new();

        tokio::spawn(accept_loop(listener, Arc::new(handler), Arc::clone(&closed), shutdown.clone()));

        info!(address = %local_addr, "server accepting connections");

        Ok(Self { local_addr, closed, shutdown })
    }

    /// The address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting connections; the listening endpoint is dropped when
    /// the accept loop exits. In-flight connections are not waited on.
    pub fn stop(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.shutdown.cancel();
    }
}

async fn accept_loop<H>(listener: TcpListener, handler: Arc<H>, closed: Arc<AtomicBool>, shutdown: CancellationToken)
where
    H: Handler<OwnedWriteHalf> + 'static,
{
    loop {
        let stream = select! {
            () = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, _remote_addr)) => stream,
                Err(e) => {
                    if closed.load(Ordering::SeqCst) {
                        break;
                    }
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            },
        };

        let handler = Arc::clone(&handler);

        tokio::spawn(async move {
            let (reader, writer) = stream.into_split();
            let connection = HttpConnection::new(reader, writer);
            match connection.process(handler).await {
                Ok(()) => {
                    info!("finished process, connection shutdown");
                }
                Err(e) => {
                    error!("service has error, cause {}, connection shutdown", e);
                }
            }
        });
    }

    info!("accept loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ResponseWriter;
    use crate::handler::make_handler;
    use crate::protocol::{Request, StatusCode, default_headers};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn greeting(mut writer: ResponseWriter<OwnedWriteHalf>, request: Request) {
        let body = format!("you asked for {}\n", request.request_target());
        writer.write_status_line(StatusCode::Ok).await.unwrap();
        writer.write_headers(&default_headers(body.len())).await.unwrap();
        writer.write_body(body.as_bytes()).await.unwrap();
    }

    #[tokio::test]
    async fn serves_a_request_over_tcp() {
        let server = Server::serve(("127.0.0.1", 0), make_handler(greeting)).await.unwrap();

        let mut stream = TcpStream::connect(server.local_addr()).await.unwrap();
        stream.write_all(b"GET /hello HTTP/1.1\r\nHost: localhost\r\n\r\n").await.unwrap();

        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();

        let text = std::str::from_utf8(&response).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.ends_with("\r\n\r\nyou asked for /hello\n"));

        server.stop();
    }

    #[tokio::test]
    async fn connections_are_independent() {
        let server = Server::serve(("127.0.0.1", 0), make_handler(greeting)).await.unwrap();

        // a malformed request on one connection must not affect another
        let mut bad = TcpStream::connect(server.local_addr()).await.unwrap();
        bad.write_all(b"GET /\r\n").await.unwrap();
        let mut nothing = Vec::new();
        bad.read_to_end(&mut nothing).await.unwrap();
        assert!(nothing.is_empty());

        let mut good = TcpStream::connect(server.local_addr()).await.unwrap();
        good.write_all(b"GET /ok HTTP/1.1\r\n\r\n").await.unwrap();
        let mut response = Vec::new();
        good.read_to_end(&mut response).await.unwrap();
        assert!(response.starts_with(b"HTTP/1.1 200 OK\r\n"));

        server.stop();
    }

    #[tokio::test]
    async fn stop_shuts_the_listener_down() {
        let server = Server::serve(("127.0.0.1", 0), make_handler(greeting)).await.unwrap();
        let addr = server.local_addr();

        TcpStream::connect(addr).await.unwrap();
        server.stop();

        // the accept loop exits asynchronously; poll until connections fail
        for _ in 0..100 {
            if TcpStream::connect(addr).await.is_err() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("listener still accepting after stop()");
    }
}
