//! HTTP response helpers
//!
//! Plain-text error replies written through a [`ResponseWriter`], so that
//! decorating writers observe them like any handler output.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS};
use hyper::Response;
use std::io;

use super::writer::{BufferedResponse, ResponseWriter};

/// Reply with `message` as a plain-text error body and the given status
pub fn write_error(w: &mut dyn ResponseWriter, message: &str, status: u16) -> io::Result<()> {
    let headers = w.headers_mut();
    headers.remove(CONTENT_LENGTH);
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    w.write_header(status);
    w.write_all(format!("{message}\n").as_bytes())
}

/// Default reply for paths no route matches
pub fn not_found(w: &mut dyn ResponseWriter) -> io::Result<()> {
    write_error(w, "404 page not found", 404)
}

/// Build the 500 reply sent when a request fails under the `respond` policy
pub fn build_500_response() -> Response<Full<Bytes>> {
    let mut w = BufferedResponse::new();
    if let Err(e) = write_error(&mut w, "Internal Server Error", 500) {
        crate::logger::log_error(&format!("Failed to build 500 response: {e}"));
    }
    w.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    #[test]
    fn test_not_found_reply() {
        let mut w = BufferedResponse::new();
        not_found(&mut w).unwrap();
        assert_eq!(w.status(), Some(404));
        assert_eq!(w.body(), b"404 page not found\n");

        let resp = w.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            resp.headers().get(CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        assert_eq!(resp.headers().get(X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
    }

    #[test]
    fn test_500_reply() {
        let resp = build_500_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
