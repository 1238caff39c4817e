//! Cross-origin and embedding headers
//!
//! Every response leaving the server passes through [`augment`], whatever
//! produced it. Browsers on any origin may read the response and embed the
//! served pages in frames.

use hyper::header::{
    HeaderMap, HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_SECURITY_POLICY,
    X_FRAME_OPTIONS,
};
use hyper::Response;

/// The fixed header set, names and values exactly as sent
pub const EMBED_HEADERS: [(HeaderName, &str); 5] = [
    (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
    (ACCESS_CONTROL_ALLOW_HEADERS, "*"),
    (X_FRAME_OPTIONS, "ALLOWALL"),
    (CONTENT_SECURITY_POLICY, "frame-ancestors *"),
];

/// Insert the fixed header set, replacing any value already present
pub fn apply(headers: &mut HeaderMap) {
    for (name, value) in EMBED_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
}

/// Wrap a finished response with the fixed header set
pub fn augment<B>(mut response: Response<B>) -> Response<B> {
    apply(response.headers_mut());
    response
}
