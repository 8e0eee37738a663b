//! Request handler module
//!
//! Responsible for route dispatch and the route handlers themselves.
//! Handlers write to a [`ResponseWriter`] and return errors instead of
//! deciding on their own whether the process survives them.

pub mod home;
pub mod router;
pub mod shipper;

use hyper::body::Bytes;
use hyper::Request;
use std::future::Future;
use std::pin::Pin;

use crate::error::Result;
use crate::http::ResponseWriter;
use crate::logger;

pub use home::home;
pub use router::Router;
pub use shipper::ShipperData;

/// Future returned by [`Handler::serve_http`]
///
/// Not `Send`: handlers run on the connection's local task and borrow the
/// response writer for the whole call.
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + 'a>>;

/// Something that can answer a request by writing to a response writer
pub trait Handler: Send + Sync {
    fn serve_http<'a>(
        &'a self,
        w: &'a mut dyn ResponseWriter,
        req: &'a Request<Bytes>,
    ) -> HandlerFuture<'a>;
}

/// Plain functions and closures that finish without awaiting anything
impl<F> Handler for F
where
    F: Fn(&mut dyn ResponseWriter, &Request<Bytes>) -> Result<()> + Send + Sync,
{
    fn serve_http<'a>(
        &'a self,
        w: &'a mut dyn ResponseWriter,
        req: &'a Request<Bytes>,
    ) -> HandlerFuture<'a> {
        Box::pin(std::future::ready(self(w, req)))
    }
}

/// Write a whole body. A failed client write is logged, never escalated.
fn write_body(w: &mut dyn ResponseWriter, body: &[u8]) {
    if let Err(e) = w.write_all(body) {
        logger::log_warning(&format!("Failed to write response body: {e}"));
    }
}
