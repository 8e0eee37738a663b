//! Content type sniffing module
//!
//! Picks a Content-Type from the leading bytes of a response body when the
//! handler did not set one.

/// Only this many leading bytes are inspected
const SNIFF_LEN: usize = 512;

/// Tags that mark a body as HTML when followed by a space or `>`
const HTML_TAGS: [&[u8]; 17] = [
    b"<!DOCTYPE HTML",
    b"<HTML",
    b"<HEAD",
    b"<SCRIPT",
    b"<IFRAME",
    b"<H1",
    b"<DIV",
    b"<FONT",
    b"<TABLE",
    b"<A",
    b"<STYLE",
    b"<TITLE",
    b"<B",
    b"<BODY",
    b"<BR",
    b"<P",
    b"<!--",
];

/// Detect a Content-Type for `data`
///
/// Anything without a known signature and without control bytes is
/// treated as UTF-8 text, which is what JSON bodies end up as.
pub fn detect_content_type(data: &[u8]) -> &'static str {
    let data = &data[..data.len().min(SNIFF_LEN)];

    let trimmed = trim_leading_whitespace(data);
    if HTML_TAGS.iter().any(|tag| matches_html_tag(trimmed, tag)) {
        return "text/html; charset=utf-8";
    }

    match data {
        // Text
        [0xFE, 0xFF, ..] => "text/plain; charset=utf-16be",
        [0xFF, 0xFE, ..] => "text/plain; charset=utf-16le",
        [0xEF, 0xBB, 0xBF, ..] => "text/plain; charset=utf-8",
        _ if trimmed.starts_with(b"<?xml") => "text/xml; charset=utf-8",

        // Documents
        [b'%', b'P', b'D', b'F', b'-', ..] => "application/pdf",
        _ if data.starts_with(b"%!PS-Adobe-") => "application/postscript",

        // Images
        _ if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") => "image/gif",
        [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n', ..] => "image/png",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'B', b'M', ..] => "image/bmp",
        [0x00, 0x00, 0x01, 0x00, ..] => "image/x-icon",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', b'V', b'P', ..] => {
            "image/webp"
        }

        // Archives / binaries
        [b'P', b'K', 0x03, 0x04, ..] => "application/zip",
        [0x1F, 0x8B, 0x08, ..] => "application/x-gzip",
        [0x00, b'a', b's', b'm', ..] => "application/wasm",

        // Default
        _ if data.iter().any(|&b| is_binary_byte(b)) => "application/octet-stream",
        _ => "text/plain; charset=utf-8",
    }
}

fn trim_leading_whitespace(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !matches!(b, b'\t' | b'\n' | 0x0C | b'\r' | b' '))
        .unwrap_or(data.len());
    &data[start..]
}

/// Case-insensitive tag prefix followed by a tag-terminating byte
fn matches_html_tag(data: &[u8], tag: &[u8]) -> bool {
    data.len() > tag.len()
        && data[..tag.len()].eq_ignore_ascii_case(tag)
        && matches!(data[tag.len()], b' ' | b'>')
}

const fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_types() {
        assert_eq!(
            detect_content_type(b"{\n\t\"a\": 1\n}"),
            "text/plain; charset=utf-8"
        );
        assert_eq!(
            detect_content_type(b"  <html><body>hi</body></html>"),
            "text/html; charset=utf-8"
        );
        assert_eq!(
            detect_content_type(b"<?xml version=\"1.0\"?><a/>"),
            "text/xml; charset=utf-8"
        );
    }

    #[test]
    fn test_html_tag_needs_terminator() {
        // "<Bogus" must not match the "<B" tag
        assert_eq!(detect_content_type(b"<Bogus"), "text/plain; charset=utf-8");
        assert_eq!(detect_content_type(b"<b>bold</b>"), "text/html; charset=utf-8");
    }

    #[test]
    fn test_magic_numbers() {
        assert_eq!(detect_content_type(b"\x89PNG\r\n\x1a\n\0\0"), "image/png");
        assert_eq!(detect_content_type(b"GIF89a..."), "image/gif");
        assert_eq!(detect_content_type(b"\xFF\xD8\xFF\xE0"), "image/jpeg");
        assert_eq!(detect_content_type(b"%PDF-1.7"), "application/pdf");
        assert_eq!(detect_content_type(b"PK\x03\x04rest"), "application/zip");
    }

    #[test]
    fn test_binary_fallback() {
        assert_eq!(
            detect_content_type(b"\x01\x02\x03"),
            "application/octet-stream"
        );
    }
}
