//! Response writer module
//!
//! Handlers write status and body bytes to a [`ResponseWriter`] instead of
//! returning a finished `hyper::Response`. This keeps the sink replaceable,
//! which is what lets middleware decorate it.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use std::io::{self, Write};

use super::sniff::detect_content_type;
use crate::logger;

/// Capability set of an HTTP response sink
///
/// Body bytes go through [`std::io::Write`]; the status line and headers
/// through the methods below.
pub trait ResponseWriter: Write {
    /// Headers that will be sent with the response
    fn headers(&self) -> &HeaderMap;

    /// Mutable access to the headers. Changes made after the header has
    /// been written do not reach the client.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Send the status line. The code is not range-checked here.
    fn write_header(&mut self, status: u16);
}

/// Response sink that buffers the whole response in memory and converts it
/// into a hyper response once the handler is done
#[derive(Debug, Default)]
pub struct BufferedResponse {
    status: Option<u16>,
    headers: HeaderMap,
    /// Header snapshot taken when the status was written
    sent_headers: Option<HeaderMap>,
    body: Vec<u8>,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status written so far, if any
    #[cfg(test)]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    #[cfg(test)]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Convert the buffered response into the response sent to the client
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let status = self.status.unwrap_or(200);
        let mut headers = self.sent_headers.unwrap_or(self.headers);

        if !self.body.is_empty() && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static(detect_content_type(&self.body)),
            );
        }

        let mut response = Response::new(Full::new(Bytes::from(self.body)));
        match StatusCode::from_u16(status) {
            Ok(code) => *response.status_mut() = code,
            Err(e) => {
                logger::log_error(&format!("Invalid status code {status}: {e}"));
                *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            }
        }
        *response.headers_mut() = headers;
        response
    }
}

impl ResponseWriter for BufferedResponse {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_header(&mut self, status: u16) {
        if let Some(current) = self.status {
            logger::log_warning(&format!(
                "superfluous write_header call: status {current} already sent, ignoring {status}"
            ));
            return;
        }
        self.status = Some(status);
        self.sent_headers = Some(self.headers.clone());
    }
}

impl Write for BufferedResponse {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.status.is_none() {
            self.write_header(200);
        }
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
