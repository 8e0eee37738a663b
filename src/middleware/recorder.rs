//! Response recording module
//!
//! [`ResponseRecorder`] decorates a [`ResponseWriter`]: every call is
//! forwarded to the wrapped writer unchanged, and the status code, byte
//! count and last body chunk are noted in a [`ResponseRecord`] on the way.

use hyper::header::HeaderMap;
use std::io::{self, Write};

use crate::http::ResponseWriter;

/// What a handler wrote through a [`ResponseRecorder`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRecord {
    /// Last status set by the handler; 200 if it never set one
    pub status: u16,
    /// Total bytes accepted by the wrapped writer
    pub size: usize,
    /// Most recent chunk passed to `write`, not the whole body
    pub data: Vec<u8>,
}

impl Default for ResponseRecord {
    fn default() -> Self {
        Self {
            status: 200,
            size: 0,
            data: Vec::new(),
        }
    }
}

/// Recording decorator around a response writer
pub struct ResponseRecorder<'a, W: ResponseWriter + ?Sized> {
    inner: &'a mut W,
    record: &'a mut ResponseRecord,
}

impl<'a, W: ResponseWriter + ?Sized> ResponseRecorder<'a, W> {
    pub fn new(inner: &'a mut W, record: &'a mut ResponseRecord) -> Self {
        Self { inner, record }
    }
}

impl<W: ResponseWriter + ?Sized> ResponseWriter for ResponseRecorder<'_, W> {
    fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_header(&mut self, status: u16) {
        self.record.status = status;
        self.inner.write_header(status);
    }
}

impl<W: ResponseWriter + ?Sized> Write for ResponseRecorder<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // The real write goes first; bookkeeping never blocks it
        let result = self.inner.write(buf);
        if let Ok(written) = result {
            self.record.size += written;
        }
        self.record.data = buf.to_vec();
        result
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
