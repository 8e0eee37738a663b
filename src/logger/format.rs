//! Log format module
//!
//! Pure formatting for the per-request log block:
//! - request dump (start line, headers, body)
//! - captured response summary and failure marker
//! - elapsed duration
//! - timestamped fatal line

use chrono::Local;
use hyper::body::Bytes;
use hyper::Request;
use std::fmt::Display;
use std::time::Duration;

use crate::middleware::ResponseRecord;

/// Headers that are printed separately or not at all in a request dump
const DUMP_EXCLUDED_HEADERS: [&str; 2] = ["host", "trailer"];

/// Dump a request in wire order: start line, `Host`, remaining headers
/// sorted by canonical name, a blank line, then the body.
pub fn dump_request(req: &Request<Bytes>) -> String {
    let uri = req.uri();
    let mut out = format!("{} {} {:?}\r\n", req.method(), uri, req.version());

    // Absolute-form request targets already carry the host
    if uri.scheme().is_none() {
        let host = req
            .headers()
            .get(hyper::header::HOST)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .or_else(|| uri.authority().map(ToString::to_string));
        if let Some(host) = host {
            out.push_str(&format!("Host: {host}\r\n"));
        }
    }

    let mut headers: Vec<(String, String)> = req
        .headers()
        .iter()
        .filter(|(name, _)| !DUMP_EXCLUDED_HEADERS.contains(&name.as_str()))
        .map(|(name, value)| {
            (
                canonical_header_key(name.as_str()),
                String::from_utf8_lossy(value.as_bytes()).trim().to_string(),
            )
        })
        .collect();
    // Stable sort keeps repeated header values in arrival order
    headers.sort_by(|a, b| a.0.cmp(&b.0));

    for (name, value) in headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str("\r\n");
    out.push_str(&String::from_utf8_lossy(req.body()));
    out
}

/// Canonical MIME header form: `content-type` -> `Content-Type`
pub fn canonical_header_key(name: &str) -> String {
    let mut upper = true;
    name.chars()
        .map(|c| {
            let mapped = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            mapped
        })
        .collect()
}

/// Three labeled lines describing the captured response
pub fn format_response_summary(record: &ResponseRecord) -> String {
    format!(
        "Status:  {}\nSize:  {}\nData:  {}",
        record.status,
        record.size,
        String::from_utf8_lossy(&record.data)
    )
}

/// Line marking a request whose handler failed
pub fn format_request_error(err: &dyn Display) -> String {
    format!("Error:  {err}")
}

/// Duration line followed by the blank separator line
pub fn format_duration(elapsed: Duration) -> String {
    format!("DURATION: {elapsed:?}\n")
}

/// Fatal line prefixed with the local timestamp
pub fn format_fatal(err: &dyn Display) -> String {
    format!("{} {err}", Local::now().format("%Y/%m/%d %H:%M:%S"))
}
