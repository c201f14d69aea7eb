//! Symbolic regex identifiers and the concrete expressions they stand for.

use crate::rules::KnownRegex;

/// RFC 7230 header field name, optionally prefixed with `:` for HTTP/2
/// pseudo-headers.
pub const HTTP_HEADER_NAME: &str = r"^:?[0-9a-zA-Z!#$%&'*+-.^_|~`]+$";

/// RFC 7230 header field value.
pub const HTTP_HEADER_VALUE: &str = r"^[^\x{0000}-\x{0008}\x{000A}-\x{001F}\x{007F}]*$";

/// Loose header string: no NUL, CR or LF.
pub const HEADER_STRING: &str = r"^[^\x{0000}\x{000A}\x{000D}]*$";

// resolve
// non-strict header rules fall back to the loose header string
#[must_use]
pub const fn resolve(known: KnownRegex, strict: Option<bool>) -> Option<&'static str> {
    let relaxed = matches!(strict, Some(false));

    match known {
        KnownRegex::Unknown => None,
        KnownRegex::HttpHeaderName if relaxed => Some(HEADER_STRING),
        KnownRegex::HttpHeaderValue if relaxed => Some(HEADER_STRING),
        KnownRegex::HttpHeaderName => Some(HTTP_HEADER_NAME),
        KnownRegex::HttpHeaderValue => Some(HTTP_HEADER_VALUE),
    }
}

///
/// TESTS
///
