//! Request dispatch module
//!
//! Entry point for HTTP request processing: method dispatch, then the
//! cross-origin/embedding decoration applied to whatever came back.

use crate::config::AppState;
use crate::handler::static_files::{self, RequestContext};
use crate::http;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{IF_MODIFIED_SINCE, IF_NONE_MATCH, SERVER};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    // Only the head matters, the body is released here
    let (parts, _) = req.into_parts();
    let response = dispatch(&parts, &state).await;

    let response = if parts.method == Method::HEAD {
        strip_body(response)
    } else {
        response
    };

    Ok(finalize(response, &state))
}

/// Produce the undecorated response for a request
async fn dispatch(req: &Parts, state: &AppState) -> Response<Full<Bytes>> {
    match req.method {
        // Preflight never touches the filesystem
        Method::OPTIONS => http::build_preflight_response(),
        Method::GET | Method::HEAD => {
            let headers = &req.headers;
            let ctx = RequestContext {
                path: req.uri.path(),
                query: req.uri.query(),
                if_modified_since: headers
                    .get(IF_MODIFIED_SINCE)
                    .and_then(|v| v.to_str().ok()),
                has_if_none_match: headers.contains_key(IF_NONE_MATCH),
            };
            static_files::serve(&ctx, state).await
        }
        _ => http::build_501_response(),
    }
}

/// Keep status and headers of a HEAD response, drop the body
fn strip_body(response: Response<Full<Bytes>>) -> Response<Full<Bytes>> {
    let (parts, _) = response.into_parts();
    Response::from_parts(parts, Full::new(Bytes::new()))
}

/// Headers every response carries, applied after the handler finished
fn finalize(mut response: Response<Full<Bytes>>, state: &AppState) -> Response<Full<Bytes>> {
    if let Some(server) = state.server_header() {
        response.headers_mut().insert(SERVER, server.clone());
    }
    http::augment(response)
}
