//! HTTP host and graceful shutdown.
//!
//! Handlers in this crate are synchronous and know nothing about sockets.
//! [`Server`] is the host that runs one over real HTTP: it turns each request
//! head into an [`Environ`], calls the handler with a fresh [`Captured`]
//! receiver, and sends back whatever the handler declared and returned.
//!
//! # Graceful shutdown
//!
//! On **SIGTERM** or **Ctrl-C** the server:
//! 1. Immediately stops `listener.accept()` — no new connections are made.
//! 2. Lets every in-flight connection task run to completion.
//! 3. Returns from [`Server::serve`], which lets `main` exit cleanly.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;

use bytes::Bytes;
use http::request::Parts;
use http_body_util::Full;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::environ::Environ;
use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::receiver::Captured;
use crate::response::internal_error;

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    ///
    /// # Panics
    ///
    /// Panics if `addr` is not a valid `host:port` string.
    ///
    /// ```rust,no_run
    /// use notekit::Server;
    /// let server = Server::bind("127.0.0.1:3000");
    /// ```
    pub fn bind(addr: &str) -> Self {
        let addr: SocketAddr = addr.parse().expect("invalid socket address");
        Self { addr }
    }

    /// Serves `handler` until SIGTERM or Ctrl-C, then drains in-flight
    /// connections and returns.
    pub async fn serve(self, handler: impl Handler) -> Result<(), Error> {
        self.serve_with_shutdown(handler, shutdown_signal()).await
    }

    /// Serves `handler` until `signal` resolves, then drains in-flight
    /// connections and returns.
    pub async fn serve_with_shutdown(
        self,
        handler: impl Handler,
        signal: impl Future<Output = ()>,
    ) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr).await?;
        let handler = BoxedHandler::new(handler);

        info!(addr = %listener.local_addr()?, "notekit listening");

        // Tracks every connection task so shutdown can wait for them.
        let mut tasks = tokio::task::JoinSet::new();

        tokio::pin!(signal);

        loop {
            tokio::select! {
                // Check shutdown first so a signal stops accepting at once,
                // even with connections queued.
                biased;

                () = &mut signal => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let handler = handler.clone();
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        // Called once per request on the connection.
                        let svc = service_fn(move |req: hyper::Request<hyper::body::Incoming>| {
                            let handler = handler.clone();
                            async move {
                                let (parts, _body) = req.into_parts();
                                Ok::<_, Infallible>(respond(&handler, &parts))
                            }
                        });

                        // HTTP/1.1 or HTTP/2, whichever the client negotiates.
                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                // Reap finished tasks so the set does not grow without bound.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("notekit stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Runs one request through `handler` and builds the wire response.
///
/// Every failure becomes a bodiless `500`, so hyper never sees an error.
fn respond(handler: &dyn Handler, parts: &Parts) -> http::Response<Full<Bytes>> {
    let environ = Environ::from_parts(parts);
    let mut captured = Captured::new();

    let result = handler.call(&environ, &mut captured)
        .and_then(|body| captured.into_response(body))
        .and_then(|response| response.into_http());

    match result {
        Ok(res) => res,
        Err(e) => {
            error!(method = %parts.method, path = parts.uri.path(), "handler failed: {e}");
            internal_error()
        }
    }
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first SIGTERM or SIGINT (Ctrl-C). Only Ctrl-C on Windows.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    use super::*;
    use crate::app::application;
    use crate::receiver::ResponseReceiver;
    use crate::response::Body;

    fn head(method: Method, uri: &str) -> Parts {
        http::Request::builder().method(method).uri(uri).body(()).unwrap().into_parts().0
    }

    fn never_starts(_env: &Environ, _start: &mut dyn ResponseReceiver) -> Result<Body, Error> {
        Ok(vec![Bytes::from_static(b"lost")])
    }

    #[tokio::test]
    async fn respond_runs_the_stack() {
        let res = respond(&application(), &head(Method::POST, "/anything"));

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["content-length"], "42");
        let body = res.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, "Upper middleware:<br/>REQUEST METHOD: POST");
    }

    #[tokio::test]
    async fn invalid_state_becomes_500() {
        let res = respond(&never_starts, &head(Method::GET, "/"));

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = res.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn serves_over_tcp_until_shutdown() {
        // Reserve a free port, then hand it to the server.
        let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        let server = tokio::spawn(Server::bind(&addr.to_string()).serve_with_shutdown(
            application(),
            async move { let _ = rx.await; },
        ));

        let mut stream = loop {
            match TcpStream::connect(addr).await {
                Ok(s) => break s,
                Err(_) => tokio::task::yield_now().await,
            }
        };
        stream
            .write_all(b"GET / HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).await.unwrap();

        assert!(raw.starts_with("HTTP/1.1 200 OK\r\n"), "{raw}");
        assert!(raw.ends_with("Upper middleware:<br/>REQUEST METHOD: GET"), "{raw}");

        tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}
