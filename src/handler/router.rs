//! Request routing dispatch module
//!
//! Exact-path routing table. Paths without a route go to the fallback
//! handler when one is installed, otherwise they get the default 404.

use hyper::body::Bytes;
use hyper::Request;
use std::collections::HashMap;

use super::{Handler, HandlerFuture};
use crate::http::{self, ResponseWriter};
use crate::logger;

/// Exact-path dispatcher
#[derive(Default)]
pub struct Router {
    routes: HashMap<String, Box<dyn Handler>>,
    fallback: Option<Box<dyn Handler>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for requests whose path is exactly `path`
    #[must_use]
    pub fn route(mut self, path: impl Into<String>, handler: impl Handler + 'static) -> Self {
        self.routes.insert(path.into(), Box::new(handler));
        self
    }

    /// Handler for every path that has no route of its own
    #[must_use]
    pub fn fallback(mut self, handler: impl Handler + 'static) -> Self {
        self.fallback = Some(Box::new(handler));
        self
    }
}

impl Handler for Router {
    fn serve_http<'a>(
        &'a self,
        w: &'a mut dyn ResponseWriter,
        req: &'a Request<Bytes>,
    ) -> HandlerFuture<'a> {
        let path = req.uri().path();

        if let Some(handler) = self.routes.get(path) {
            return handler.serve_http(w, req);
        }

        if let Some(fallback) = &self.fallback {
            return fallback.serve_http(w, req);
        }

        if let Err(e) = http::not_found(w) {
            logger::log_warning(&format!("Failed to write 404 for {path}: {e}"));
        }
        Box::pin(std::future::ready(Ok(())))
    }
}
