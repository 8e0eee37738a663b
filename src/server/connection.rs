// Connection handling module
// Serves a single TCP connection and applies the failure policy

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::sync::Arc;

use crate::config::{Config, FailurePolicy};
use crate::error::BoxError;
use crate::handler::{self, Router, ShipperData};
use crate::http::{self, BufferedResponse};
use crate::logger;
use crate::middleware::LoggingMiddleware;

/// Everything a connection needs to answer requests
pub struct App {
    middleware: LoggingMiddleware<Router>,
    on_error: FailurePolicy,
}

impl App {
    pub const fn new(middleware: LoggingMiddleware<Router>, on_error: FailurePolicy) -> Self {
        Self {
            middleware,
            on_error,
        }
    }

    /// Build the routing table and middleware described by the configuration
    pub fn from_config(cfg: &Config) -> Self {
        let mut router =
            Router::new().route(cfg.data.route.clone(), ShipperData::new(&cfg.data.file));
        if cfg.routes.home_fallback {
            router = router.fallback(handler::home);
        }

        let middleware = LoggingMiddleware::new(router)
            .enabled(cfg.logging.access_log)
            .atomic(cfg.logging.atomic_request_log);

        Self::new(middleware, cfg.server.on_error)
    }

    /// Answer one request
    ///
    /// Under [`FailurePolicy::Abort`] an error terminates the process before
    /// anything is sent; under [`FailurePolicy::Respond`] the client gets a 500.
    pub async fn handle<B>(&self, req: Request<B>) -> Result<Response<Full<Bytes>>, Infallible>
    where
        B: Body,
        B::Error: Into<BoxError>,
    {
        let mut sink = BufferedResponse::new();
        match self.middleware.serve(&mut sink, req).await {
            Ok(_) => Ok(sink.into_response()),
            Err(err) => match self.on_error {
                FailurePolicy::Abort => {
                    logger::log_fatal(&err);
                    std::process::exit(1);
                }
                FailurePolicy::Respond => {
                    logger::log_error(&err.to_string());
                    Ok(http::build_500_response())
                }
            },
        }
    }
}

/// Handle a single connection in a spawned local task.
///
/// This function:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Serves HTTP/1.1 with keep-alive through [`App::handle`]
/// 3. Logs connection-level errors
pub fn handle_connection(stream: tokio::net::TcpStream, app: Arc<App>) {
    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(true);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let app = Arc::clone(&app);
                async move { app.handle(req).await }
            }),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}
