//! Request/response logging middleware
//!
//! Brackets every call of the wrapped handler with:
//! 1. a dump of the inbound request
//! 2. a summary of what the handler wrote (status, size, last chunk)
//! 3. the elapsed wall-clock time

use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};
use hyper::Request;
use std::time::Instant;

use super::recorder::{ResponseRecord, ResponseRecorder};
use crate::error::{BoxError, Result, ServerError};
use crate::handler::Handler;
use crate::http::ResponseWriter;
use crate::logger;
use crate::logger::format;

/// Destination of access log emissions
pub type LogSink = Box<dyn Fn(&str) + Send + Sync>;

/// Logging middleware wrapping a handler
pub struct LoggingMiddleware<H> {
    next: H,
    enabled: bool,
    atomic: bool,
    sink: LogSink,
}

impl<H: Handler> LoggingMiddleware<H> {
    pub fn new(next: H) -> Self {
        Self {
            next,
            enabled: true,
            atomic: false,
            sink: Box::new(logger::log_access),
        }
    }

    /// Turn access output on or off; recording still happens when off
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Emit each request's log block as one write instead of three
    #[must_use]
    pub fn atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    /// Send access output somewhere other than the access log
    #[must_use]
    pub fn sink(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Serve one request through the wrapped handler
    ///
    /// The request body is read up front so it can be dumped and then
    /// replayed to the handler. A handler error is returned only after the
    /// response summary, an `Error:` line and the duration have been logged.
    pub async fn serve<B>(
        &self,
        w: &mut dyn ResponseWriter,
        req: Request<B>,
    ) -> Result<ResponseRecord>
    where
        B: Body,
        B::Error: Into<BoxError>,
    {
        let start = Instant::now();
        let mut log = RequestLog::new(&*self.sink, self.enabled, self.atomic);

        let req = collect_request(req).await?;
        log.emit(format!("REQUEST:\n{}", format::dump_request(&req)));

        let mut record = ResponseRecord::default();
        let outcome = {
            let mut recorder = ResponseRecorder::new(w, &mut record);
            self.next.serve_http(&mut recorder, &req).await
        };

        log.emit(format::format_response_summary(&record));
        if let Err(err) = &outcome {
            // The summary above belongs to a failed request
            log.emit(format::format_request_error(err));
        }
        log.emit(format::format_duration(start.elapsed()));
        log.finish();

        outcome.map(|()| record)
    }
}

/// Read the whole body so the request can be both dumped and handled
async fn collect_request<B>(req: Request<B>) -> Result<Request<Bytes>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let (parts, body) = req.into_parts();
    let body = body
        .collect()
        .await
        .map_err(|e| ServerError::RequestDump(e.into()))?
        .to_bytes();
    Ok(Request::from_parts(parts, body))
}

/// One request's access log emissions
struct RequestLog<'a> {
    sink: &'a (dyn Fn(&str) + Send + Sync),
    enabled: bool,
    /// Pending emissions when flushing as a single write
    buffered: Option<Vec<String>>,
}

impl<'a> RequestLog<'a> {
    fn new(sink: &'a (dyn Fn(&str) + Send + Sync), enabled: bool, atomic: bool) -> Self {
        Self {
            sink,
            enabled,
            buffered: atomic.then(Vec::new),
        }
    }

    fn emit(&mut self, message: String) {
        if !self.enabled {
            return;
        }
        match self.buffered.as_mut() {
            Some(pending) => pending.push(message),
            None => (self.sink)(&message),
        }
    }

    fn finish(self) {
        if let Some(pending) = self.buffered {
            if self.enabled && !pending.is_empty() {
                (self.sink)(&pending.join("\n"));
            }
        }
    }
}
