//! Request handler traits and utilities
//!
//! The handler is the external collaborator boundary: it receives a fresh
//! [`ResponseWriter`] and the framed [`Request`], and must drive the writer
//! through a complete, state-valid sequence of calls. Any error it
//! encounters is its own responsibility to log; the core does not inspect
//! handler-internal failures.

use async_trait::async_trait;
use tokio::io::AsyncWrite;

use crate::connection::ResponseWriter;
use crate::protocol::Request;

#[async_trait]
pub trait Handler<W>: Send + Sync
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn call(&self, writer: ResponseWriter<W>, request: Request);
}

/// Adapter implementing [`Handler`] for a plain async function or closure.
#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<W, F, Fut> Handler<W> for HandlerFn<F>
where
    W: AsyncWrite + Unpin + Send + 'static,
    F: Fn(ResponseWriter<W>, Request) -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send,
{
    async fn call(&self, writer: ResponseWriter<W>, request: Request) {
        (self.f)(writer, request).await;
    }
}

pub fn make_handler<W, F, Fut>(f: F) -> HandlerFn<F>
where
    W: AsyncWrite + Unpin + Send + 'static,
    F: Fn(ResponseWriter<W>, Request) -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send,
{
    HandlerFn { f }
}
