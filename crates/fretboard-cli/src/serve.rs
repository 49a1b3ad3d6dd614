//! HTTP endpoint rendering diagrams on request.
//!
//! ## Routes
//!
//! - `POST /generate`: JSON diagram request in, image out
//!   ```json
//!   {"title": "C major", "frets": 5, "mode": "sharp", "mapping": {"A": [3], "B": [1]}}
//!   ```
//! - `GET /health`: liveness probe, answers `ok`
//! - `GET /`: short usage note
//!
//! Validation failures answer `400` with `{"error": "..."}`. Clients get
//! [`http::READ_TIMEOUT`] to send a complete request.

pub mod http;

use std::{future::Future, net::SocketAddr, sync::Arc};

use log::{debug, error, info, warn};
use tokio::net::{TcpListener, TcpStream};

use fretboard::{DiagramBuilder, FretboardError, config::AppConfig, request::DiagramRequest};

use crate::args::ServeArgs;
use http::{Request, Response};

const USAGE: &str = "Fretboard diagram service\n\n\
POST /generate with a JSON body such as\n  \
{\"title\": \"C major\", \"frets\": 5, \"mode\": \"sharp\", \"mapping\": {\"A\": [3], \"B\": [1]}}\n\
to receive the rendered image.\n";

/// Run the HTTP server until Ctrl-C.
///
/// # Errors
///
/// Returns [`FretboardError::Io`] if the runtime cannot start or the address
/// cannot be bound.
pub fn run(args: &ServeArgs, config: AppConfig) -> Result<(), FretboardError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let addr = SocketAddr::new(args.host, args.port);
    let builder = Arc::new(DiagramBuilder::new(config));

    runtime.block_on(async move {
        let listener = TcpListener::bind(addr).await?;
        info!(addr:% = addr; "Listening, press Ctrl+C to stop");

        serve(listener, builder, async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!(err:% = err; "Failed to listen for Ctrl+C");
            }
        })
        .await;

        Ok::<(), FretboardError>(())
    })
}

/// Accept connections on `listener` until `shutdown` completes.
///
/// Each connection is handled on its own task; rendering runs on the
/// blocking pool.
pub async fn serve<F>(listener: TcpListener, builder: Arc<DiagramBuilder>, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        debug!(peer:% = peer_addr; "New connection");
                        tokio::spawn(handle_connection(stream, peer_addr, Arc::clone(&builder)));
                    }
                    Err(err) => {
                        warn!(err:% = err; "Accept error");
                    }
                }
            }
            () = &mut shutdown => {
                info!("Server shutdown complete");
                break;
            }
        }
    }
}

/// Handle a single connection: one request, one response.
async fn handle_connection(mut stream: TcpStream, peer_addr: SocketAddr, builder: Arc<DiagramBuilder>) {
    let response = match http::read_request(&mut stream, http::READ_TIMEOUT).await {
        Ok(request) => route(request, builder).await,
        Err(err) => match err.to_response() {
            Some(response) => {
                warn!(peer:% = peer_addr, err:% = err; "Rejected request");
                response
            }
            None => {
                debug!(peer:% = peer_addr, err:% = err; "Connection dropped");
                return;
            }
        },
    };

    if let Err(err) = response.write_to(&mut stream).await {
        warn!(peer:% = peer_addr, err:% = err; "Failed to send response");
    }
}

/// Dispatch a request to its handler.
pub(crate) async fn route(request: Request, builder: Arc<DiagramBuilder>) -> Response {
    info!(method = request.method(), path = request.path(); "Request");

    match (request.method(), request.path()) {
        ("GET", "/") => Response::text(200, USAGE),
        ("GET", "/health") => Response::text(200, "ok"),
        ("POST", "/generate") => generate(request.body().to_vec(), builder).await,
        (_, "/" | "/health" | "/generate") => Response::error(405, "method not allowed"),
        _ => Response::error(404, "not found"),
    }
}

async fn generate(body: Vec<u8>, builder: Arc<DiagramBuilder>) -> Response {
    let rendered = tokio::task::spawn_blocking(move || {
        let request = DiagramRequest::from_json(&body)?;
        let diagram = builder.diagram(&request)?;
        builder.render_image(&diagram)
    })
    .await;

    match rendered {
        Ok(Ok(image)) => Response::new(200, image.content_type(), image.into_bytes()),
        Ok(Err(err)) if err.is_client_error() => {
            debug!(err:% = err; "Invalid request");
            Response::error(400, err.to_string())
        }
        Ok(Err(err)) => {
            error!(err:% = err; "Failed to render diagram");
            Response::error(500, err.to_string())
        }
        Err(err) => {
            error!(err:% = err; "Render task failed");
            Response::error(500, "internal error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn send(method: &str, path: &str, body: &str) -> Response {
        let raw = format!(
            "{method} {path} HTTP/1.1\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        );
        let mut reader = raw.as_bytes();
        let request = http::read_request(&mut reader, http::READ_TIMEOUT).await.unwrap();
        route(request, Arc::new(DiagramBuilder::default())).await
    }

    #[tokio::test]
    async fn test_health_and_usage() {
        let response = send("GET", "/health", "").await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.body(), b"ok");

        let response = send("GET", "/", "").await;
        assert_eq!(response.status(), 200);
        assert!(response.body().starts_with(b"Fretboard"));
    }

    #[tokio::test]
    async fn test_unknown_route_and_method() {
        assert_eq!(send("GET", "/nope", "").await.status(), 404);
        assert_eq!(send("GET", "/generate", "").await.status(), 405);
        assert_eq!(send("DELETE", "/health", "").await.status(), 405);
    }

    #[tokio::test]
    async fn test_generate_image() {
        let response = send(
            "POST",
            "/generate",
            r#"{"title": "C", "frets": 3, "mapping": {"A": [3], "B": [1]}}"#,
        )
        .await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.content_type(), "image/jpeg");
        assert!(response.body().starts_with(&[0xFF, 0xD8]));
    }

    #[tokio::test]
    async fn test_generate_rejects_invalid_requests() {
        let response = send("POST", "/generate", r#"{"mapping": {"x": [1]}}"#).await;
        assert_eq!(response.status(), 400);
        assert_eq!(response.content_type(), "application/json");
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert!(body["error"].as_str().unwrap().contains("unknown string `x`"));

        let response = send("POST", "/generate", "{not json").await;
        assert_eq!(response.status(), 400);

        let response = send("POST", "/generate", r#"{"frets": 2, "mapping": {"E": [5]}}"#).await;
        assert_eq!(response.status(), 400);
    }
}
