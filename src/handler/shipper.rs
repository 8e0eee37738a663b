//! Shipper data handler
//!
//! Serves a single JSON file from local storage, re-indented with tabs.
//! The file is read on every request; there is no caching.

use hyper::body::Bytes;
use hyper::Request;
use serde::de::IgnoredAny;
use std::path::PathBuf;

use super::{write_body, Handler, HandlerFuture};
use crate::error::{Result, ServerError};
use crate::http::ResponseWriter;

/// Indentation written per nesting level
const INDENT: &[u8] = b"\t";

/// Handler serving the contents of one JSON file
pub struct ShipperData {
    path: PathBuf,
}

impl ShipperData {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read and re-indent the data file
    pub async fn load(&self) -> Result<Vec<u8>> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|source| ServerError::DataFile {
                path: self.path.display().to_string(),
                source,
            })?;

        indent_json(&raw).map_err(|source| ServerError::DataFormat {
            path: self.path.display().to_string(),
            source,
        })
    }
}

impl Handler for ShipperData {
    fn serve_http<'a>(
        &'a self,
        w: &'a mut dyn ResponseWriter,
        _req: &'a Request<Bytes>,
    ) -> HandlerFuture<'a> {
        Box::pin(async move {
            let body = self.load().await?;
            write_body(w, &body);
            Ok(())
        })
    }
}

/// Re-indent a JSON document with one tab per level
///
/// Only whitespace between tokens changes: strings, numbers and keys are
/// copied byte for byte, duplicate keys included. Empty objects and arrays
/// stay compact. Leading whitespace of the input is dropped and trailing
/// whitespace is copied through. The input is rejected if it is not a
/// single well-formed JSON value.
pub fn indent_json(raw: &[u8]) -> std::result::Result<Vec<u8>, serde_json::Error> {
    serde_json::from_slice::<IgnoredAny>(raw)?;

    let trailing = raw
        .iter()
        .rev()
        .take_while(|&&b| is_space(b))
        .count();
    let (value, tail) = raw.split_at(raw.len() - trailing);

    let mut out = Vec::with_capacity(raw.len() * 2);
    let mut depth = 0usize;
    let mut need_indent = false;
    let mut in_string = false;
    let mut escaped = false;

    for &c in value {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == b'\\' {
                escaped = true;
            } else if c == b'"' {
                in_string = false;
            }
            continue;
        }
        if is_space(c) {
            continue;
        }

        // Opening brackets defer their newline so `{}` and `[]` stay compact
        if need_indent && c != b'}' && c != b']' {
            need_indent = false;
            newline(&mut out, depth);
        }

        match c {
            b'"' => {
                in_string = true;
                out.push(c);
            }
            b'{' | b'[' => {
                out.push(c);
                depth += 1;
                need_indent = true;
            }
            b',' => {
                out.push(c);
                newline(&mut out, depth);
            }
            b':' => out.extend_from_slice(b": "),
            b'}' | b']' => {
                depth = depth.saturating_sub(1);
                if need_indent {
                    need_indent = false;
                } else {
                    newline(&mut out, depth);
                }
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    out.extend_from_slice(tail);
    Ok(out)
}

const fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

fn newline(out: &mut Vec<u8>, depth: usize) {
    out.push(b'\n');
    for _ in 0..depth {
        out.extend_from_slice(INDENT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::BufferedResponse;
    use std::cell::Cell;
    use std::rc::Rc;

    fn get() -> Request<Bytes> {
        Request::builder()
            .uri("/cpl/getshipper")
            .body(Bytes::new())
            .unwrap()
    }

    fn strip_space(bytes: &[u8]) -> Vec<u8> {
        bytes.iter().copied().filter(|&b| !is_space(b)).collect()
    }

    #[test]
    fn test_indent_simple_object() {
        assert_eq!(indent_json(br#"{"a":1}"#).unwrap(), b"{\n\t\"a\": 1\n}");
    }

    #[test]
    fn test_indent_keeps_key_order_and_nesting() {
        let raw = br#"{"zeta":[1,{"b":true,"a":null}],"alpha":"x","empty":{},"none":[]}"#;
        let expected = "{\n\t\"zeta\": [\n\t\t1,\n\t\t{\n\t\t\t\"b\": true,\n\t\t\t\"a\": null\n\t\t}\n\t],\n\t\"alpha\": \"x\",\n\t\"empty\": {},\n\t\"none\": []\n}";
        assert_eq!(String::from_utf8(indent_json(raw).unwrap()).unwrap(), expected);
    }

    #[test]
    fn test_indent_whitespace_handling() {
        let out = indent_json(b"  \n{\"a\": 1}\n").unwrap();
        assert_eq!(out, b"{\n\t\"a\": 1\n}\n");

        let out = indent_json(b"[ {  } , [\n] ]").unwrap();
        assert_eq!(out, b"[\n\t{},\n\t[]\n]");
    }

    #[test]
    fn test_indent_copies_literals_verbatim() {
        let raw = br#"{"price":1.10,"big":12345678901234567890123,"e":1e3,"s":"\u00e9","dup":1,"dup":2}"#;
        let out = indent_json(raw).unwrap();
        assert_eq!(strip_space(&out), raw.to_vec());

        let expected = "{\n\t\"price\": 1.10,\n\t\"big\": 12345678901234567890123,\n\t\"e\": 1e3,\n\t\"s\": \"\\u00e9\",\n\t\"dup\": 1,\n\t\"dup\": 2\n}";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_indent_leaves_string_contents_alone() {
        let raw = br#"{"k":"a, b:{\"[x]\"} \\","n":-0.5E-2}"#;
        let expected = "{\n\t\"k\": \"a, b:{\\\"[x]\\\"} \\\\\",\n\t\"n\": -0.5E-2\n}";
        assert_eq!(String::from_utf8(indent_json(raw).unwrap()).unwrap(), expected);
    }

    #[test]
    fn test_indent_scalar_document() {
        assert_eq!(indent_json(b" \"x\" \n").unwrap(), b"\"x\" \n");
        assert_eq!(indent_json(b"42").unwrap(), b"42");
    }

    #[test]
    fn test_indent_round_trip_equivalent() {
        let raw = br#"{"shippers":[{"id":1,"name":"CPL","rate":2.5,"tags":["x","y"]}],"count":1}"#;
        let pretty = indent_json(raw).unwrap();
        let before: serde_json::Value = serde_json::from_slice(raw).unwrap();
        let after: serde_json::Value = serde_json::from_slice(&pretty).unwrap();
        assert_eq!(before, after);
        assert_ne!(pretty.as_slice(), raw.as_slice());
    }

    #[test]
    fn test_indent_rejects_invalid_json() {
        assert!(indent_json(b"{\"a\":").is_err());
        assert!(indent_json(b"{\"a\":1} {}").is_err());
        assert!(indent_json(b"").is_err());
    }

    #[tokio::test]
    async fn test_serves_indented_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, r#"{"a":1}"#).unwrap();

        let handler = ShipperData::new(&path);
        let mut w = BufferedResponse::new();
        handler.serve_http(&mut w, &get()).await.unwrap();
        assert_eq!(w.status(), Some(200));
        assert_eq!(w.body(), b"{\n\t\"a\": 1\n}");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_file_read_yields_to_other_tasks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, r#"{"a":1}"#).unwrap();

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async move {
                let other_ran = Rc::new(Cell::new(false));
                let flag = Rc::clone(&other_ran);
                tokio::task::spawn_local(async move { flag.set(true) });

                let handler = ShipperData::new(&path);
                let mut w = BufferedResponse::new();
                handler.serve_http(&mut w, &get()).await.unwrap();

                // The sibling task got to run while the file was being read
                assert!(other_ran.get());
                assert_eq!(w.body(), b"{\n\t\"a\": 1\n}");
            })
            .await;
    }

    #[tokio::test]
    async fn test_missing_file_is_error_before_any_write() {
        let dir = tempfile::tempdir().unwrap();
        let handler = ShipperData::new(dir.path().join("data.json"));
        let mut w = BufferedResponse::new();

        let err = handler.serve_http(&mut w, &get()).await.unwrap_err();
        assert!(matches!(err, ServerError::DataFile { .. }));
        assert_eq!(w.status(), None);
        assert!(w.body().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "not json").unwrap();

        let err = ShipperData::new(&path).load().await.unwrap_err();
        assert!(matches!(err, ServerError::DataFormat { .. }));
    }
}
