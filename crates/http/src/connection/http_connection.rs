//! Connection lifecycle management
//!
//! [`HttpConnection`] owns both halves of one accepted transport connection
//! and drives it through a single request/response exchange: frame the
//! request out of the read half, bind a fresh [`ResponseWriter`] to the
//! write half, hand both to the handler, then let the connection drop.
//! There is no keep-alive and no pipelining; one connection serves exactly
//! one exchange.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::trace;

use crate::codec::{ParseBuffer, RequestDecoder};
use crate::connection::ResponseWriter;
use crate::handler::Handler;
use crate::protocol::{HttpError, ParseError, Request};

/// One accepted connection, generic over the transport halves.
///
/// # Type Parameters
///
/// * `R`: the async readable half
/// * `W`: the async writable half
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Processes the connection's single exchange.
    ///
    /// A fatal parse error is returned without any response bytes having
    /// been written; the caller logs it and lets the connection close.
    /// Handler-internal failures are the handler's own responsibility and
    /// are not inspected here.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler<W>,
    {
        let request = self.read_request().await?;
        trace!(method = request.method(), target = request.request_target(), "request framed");

        let writer = ResponseWriter::new(self.writer);
        handler.call(writer, request).await;

        Ok(())
    }

    /// The read loop: read, offer the unconsumed bytes to the decoder,
    /// discard what it consumed, repeat until the head is framed.
    async fn read_request(&mut self) -> Result<Request, ParseError> {
        let mut buffer = ParseBuffer::new();
        let mut decoder = RequestDecoder::new();

        while !decoder.is_done() {
            if buffer.fill_from(&mut self.reader).await? == 0 {
                // end of stream; finish() reports an error unless the head
                // was already complete
                break;
            }

            let consumed = decoder.decode(buffer.unparsed())?;
            buffer.consume(consumed);
        }

        decoder.finish()
    }
}
