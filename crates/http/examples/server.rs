//! Demo server exercising the full writer surface: templated HTML pages,
//! a chunked streaming route and trailers.
//!
//! ```shell
//! curl -v http://127.0.0.1:42069/
//! curl -v http://127.0.0.1:42069/yourproblem
//! curl -v --raw http://127.0.0.1:42069/stream
//! ```

use raw_http::connection::ResponseWriter;
use raw_http::handler::make_handler;
use raw_http::protocol::{CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, TRAILER, TRANSFER_ENCODING};
use raw_http::protocol::{Headers, Request, StatusCode, default_headers};
use raw_http::server::Server;
use tokio::net::tcp::OwnedWriteHalf;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

const PORT: u16 = 42069;

type Writer = ResponseWriter<OwnedWriteHalf>;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let server = match Server::serve(("127.0.0.1", PORT), make_handler(handle)).await {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "failed to start server");
            return;
        }
    };

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(cause = %e, "failed to listen for shutdown signal");
    }

    server.stop();
    info!("server stopped");
}

async fn handle(writer: Writer, request: Request) {
    match request.request_target() {
        "/stream" => stream_response(writer).await,
        "/yourproblem" => {
            page_response(writer, StatusCode::BadRequest, "Your request honestly kinda sucked.").await;
        }
        "/myproblem" => {
            page_response(writer, StatusCode::InternalServerError, "Okay, you know what? This one is on me.").await;
        }
        _ => page_response(writer, StatusCode::Ok, "Your request was an absolute banger.").await,
    }
}

async fn page_response(mut writer: Writer, status: StatusCode, paragraph: &str) {
    let heading = match status {
        StatusCode::Ok => "Success!",
        _ => status.reason(),
    };
    let body = format!(
        "<html>\n  <head>\n    <title>{code} {reason}</title>\n  </head>\n  <body>\n    <h1>{heading}</h1>\n    <p>{paragraph}</p>\n  </body>\n</html>",
        code = status.code(),
        reason = status.reason(),
    );

    if let Err(e) = writer.write_status_line(status).await {
        error!(cause = %e, "error writing the status line");
        return;
    }

    let mut headers = default_headers(body.len());
    headers.set(CONTENT_TYPE, "text/html");

    if let Err(e) = writer.write_headers(&headers).await {
        error!(cause = %e, "error writing the headers");
        return;
    }

    if let Err(e) = writer.write_body(body.as_bytes()).await {
        error!(cause = %e, "error writing the body");
    }
}

async fn stream_response(mut writer: Writer) {
    if let Err(e) = writer.write_status_line(StatusCode::Ok).await {
        error!(cause = %e, "error writing the status line");
        return;
    }

    let mut headers = default_headers(0);
    headers.remove(CONTENT_LENGTH);
    headers.remove(CONNECTION);
    headers.set(TRANSFER_ENCODING, "chunked");
    headers.set(TRAILER, "X-Chunk-Count, X-Body-Length");

    if let Err(e) = writer.write_headers(&headers).await {
        error!(cause = %e, "error writing the headers");
        return;
    }

    let mut chunk_count = 0usize;
    let mut body_length = 0usize;

    for i in 0..20 {
        let data = format!("chunk {i}\n");

        // the size line and the payload are two separate writes
        if let Err(e) = writer.write_chunked_body(format!("{:X}", data.len()).as_bytes()).await {
            error!(cause = %e, "error writing the chunk size");
            return;
        }
        if let Err(e) = writer.write_chunked_body(data.as_bytes()).await {
            error!(cause = %e, "error writing the chunk");
            return;
        }

        chunk_count += 1;
        body_length += data.len();
    }

    if let Err(e) = writer.write_chunked_body_done().await {
        error!(cause = %e, "error terminating the chunked body");
        return;
    }

    let mut trailers = Headers::new();
    trailers.set(TRAILER, "X-Chunk-Count, X-Body-Length");
    trailers.set("X-Chunk-Count", &chunk_count.to_string());
    trailers.set("X-Body-Length", &body_length.to_string());

    if let Err(e) = writer.write_trailers(&trailers).await {
        error!(cause = %e, "error writing the trailers");
    }
}
