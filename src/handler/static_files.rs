//! Static file serving module
//!
//! Maps request paths onto the served root and answers with file content,
//! a directory index, a generated listing, a redirect, or an error status.

use crate::config::AppState;
use crate::handler::listing;
use crate::http::{self, cache, mime, response};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Request information needed to resolve and serve a path
#[derive(Debug, Default)]
pub struct RequestContext<'a> {
    /// Raw, still percent-encoded request path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub if_modified_since: Option<&'a str>,
    pub has_if_none_match: bool,
}

/// Serve a GET/HEAD request from the root directory
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let Ok(decoded) = urlencoding::decode(ctx.path) else {
        return http::build_400_response();
    };
    let Some(relative) = sanitize_path(&decoded) else {
        return http::build_400_response();
    };
    let trailing_slash = decoded.ends_with('/');

    let target = match contained_path(state.root(), &state.root().join(relative)).await {
        Ok(path) => path,
        Err(resp) => return resp,
    };

    let metadata = match fs::metadata(&target).await {
        Ok(m) => m,
        Err(e) => return io_error_response(&e, &target),
    };

    if metadata.is_dir() {
        if !trailing_slash {
            return http::build_redirect_response(&redirect_location(ctx));
        }
        return serve_directory(ctx, state, &target, &decoded).await;
    }

    // A file named with a trailing slash does not exist as a directory
    if trailing_slash {
        return http::build_404_response();
    }

    serve_file(ctx, &target, &metadata).await
}

/// Normalize a decoded URL path into a relative filesystem path
///
/// `.` and empty segments are dropped and `..` pops the previous segment,
/// so the result can never climb above the root. `None` for NUL bytes.
pub fn sanitize_path(decoded: &str) -> Option<PathBuf> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        if segment.contains('\0') {
            return None;
        }
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            // Separators of other platforms never name a path component
            s if s.contains('\\') => {}
            s => segments.push(s),
        }
    }
    Some(segments.iter().collect())
}

/// Canonicalize `path` and make sure it did not escape `root` through a symlink
async fn contained_path(root: &Path, path: &Path) -> Result<PathBuf, Response<Full<Bytes>>> {
    let canonical = fs::canonicalize(path)
        .await
        .map_err(|e| io_error_response(&e, path))?;

    if !canonical.starts_with(root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path.display(),
            canonical.display()
        ));
        return Err(http::build_404_response());
    }
    Ok(canonical)
}

/// Directory path with the trailing slash added, query preserved
fn redirect_location(ctx: &RequestContext<'_>) -> String {
    match ctx.query {
        Some(q) => format!("{}/?{q}", ctx.path),
        None => format!("{}/", ctx.path),
    }
}

async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &AppState,
    dir: &Path,
    display_path: &str,
) -> Response<Full<Bytes>> {
    for index_file in &state.config.site.index_files {
        let candidate = dir.join(index_file);
        let Ok(metadata) = fs::metadata(&candidate).await else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        return match contained_path(state.root(), &candidate).await {
            Ok(path) => serve_file(ctx, &path, &metadata).await,
            Err(resp) => resp,
        };
    }

    if !state.config.site.directory_listing {
        return http::build_404_response();
    }

    match listing::read_entries(dir).await {
        Ok(entries) => response::build_html_response(listing::render(display_path, &entries)),
        Err(e) => io_error_response(&e, dir),
    }
}

async fn serve_file(
    ctx: &RequestContext<'_>,
    path: &Path,
    metadata: &std::fs::Metadata,
) -> Response<Full<Bytes>> {
    let modified = metadata.modified().ok();

    if let Some(modified) = modified {
        if cache::is_not_modified(ctx.if_modified_since, ctx.has_if_none_match, modified) {
            return http::build_304_response(&cache::format_http_date(modified));
        }
    }

    let content = match fs::read(path).await {
        Ok(c) => c,
        Err(e) => return io_error_response(&e, path),
    };

    let last_modified = cache::format_http_date(modified.unwrap_or_else(std::time::SystemTime::now));
    response::build_file_response(
        Bytes::from(content),
        mime::content_type_for(path),
        &last_modified,
    )
}

/// Map a filesystem error onto the status a client should see
pub(crate) fn io_error_response(err: &io::Error, path: &Path) -> Response<Full<Bytes>> {
    match err.kind() {
        // Missing files and names no filesystem could hold are routine, no log entry
        io::ErrorKind::NotFound
        | io::ErrorKind::NotADirectory
        | io::ErrorKind::InvalidFilename => http::build_404_response(),
        io::ErrorKind::PermissionDenied => {
            logger::log_warning(&format!("Permission denied: {}", path.display()));
            http::build_403_response()
        }
        _ => {
            logger::log_error(&format!("Failed to read '{}': {err}", path.display()));
            http::build_500_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use tempfile::TempDir;

    fn state_for(dir: &TempDir) -> AppState {
        let mut cfg = Config::load_from("does-not-exist/config").unwrap();
        cfg.site.root = dir.path().to_string_lossy().into_owned();
        AppState::new(cfg).unwrap()
    }

    async fn body_of(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    fn get(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            ..RequestContext::default()
        }
    }

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path("/a/b.txt"), Some(PathBuf::from("a/b.txt")));
        assert_eq!(sanitize_path("/a/./b/"), Some(PathBuf::from("a/b")));
        assert_eq!(sanitize_path("/../../etc/passwd"), Some(PathBuf::from("etc/passwd")));
        assert_eq!(sanitize_path("/a/../b"), Some(PathBuf::from("b")));
        assert_eq!(sanitize_path("/"), Some(PathBuf::new()));
        assert_eq!(sanitize_path("/a\\..\\b/c"), Some(PathBuf::from("c")));
        assert_eq!(sanitize_path("/a\0b"), None);
    }

    #[tokio::test]
    async fn test_serve_existing_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log(1);").unwrap();
        let state = state_for(&dir);

        let resp = serve(&get("/app.js"), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "text/javascript; charset=utf-8");
        assert!(resp.headers().contains_key("last-modified"));
        assert_eq!(body_of(resp).await, "console.log(1);");
    }

    #[tokio::test]
    async fn test_percent_encoded_name() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("my page.html"), "<p>hi</p>").unwrap();
        let state = state_for(&dir);

        let resp = serve(&get("/my%20page.html"), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_of(resp).await, "<p>hi</p>");
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let dir = TempDir::new().unwrap();
        let state = state_for(&dir);
        assert_eq!(serve(&get("/nope.html"), &state).await.status(), 404);
        assert_eq!(serve(&get("/nope/deeper.html"), &state).await.status(), 404);
    }

    #[tokio::test]
    async fn test_file_with_trailing_slash_is_404() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        let state = state_for(&dir);
        assert_eq!(serve(&get("/a.txt/"), &state).await.status(), 404);
        assert_eq!(serve(&get("/a.txt/b"), &state).await.status(), 404);
    }

    #[tokio::test]
    async fn test_directory_redirect_keeps_query() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        let state = state_for(&dir);

        let ctx = RequestContext {
            path: "/docs",
            query: Some("v=2"),
            ..RequestContext::default()
        };
        let resp = serve(&ctx, &state).await;
        assert_eq!(resp.status(), 301);
        assert_eq!(resp.headers()["location"], "/docs/?v=2");
    }

    #[tokio::test]
    async fn test_directory_index() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/index.htm"), "htm").unwrap();
        std::fs::write(dir.path().join("index.html"), "root").unwrap();
        let state = state_for(&dir);

        let resp = serve(&get("/"), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_of(resp).await, "root");

        let resp = serve(&get("/docs/"), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "text/html; charset=utf-8");
        assert_eq!(body_of(resp).await, "htm");
    }

    #[tokio::test]
    async fn test_directory_listing() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/site.css"), "body{}").unwrap();
        let state = state_for(&dir);

        let resp = serve(&get("/assets/"), &state).await;
        assert_eq!(resp.status(), 200);
        let body = body_of(resp).await;
        let html = String::from_utf8_lossy(&body);
        assert!(html.contains("Directory listing for /assets/"));
        assert!(html.contains("<a href=\"site.css\">site.css</a>"));
    }

    #[tokio::test]
    async fn test_listing_disabled() {
        let dir = TempDir::new().unwrap();
        let mut state = state_for(&dir);
        state.config.site.directory_listing = false;
        assert_eq!(serve(&get("/"), &state).await.status(), 404);
    }

    #[tokio::test]
    async fn test_traversal_stays_in_root() {
        let outer = TempDir::new().unwrap();
        std::fs::write(outer.path().join("secret.txt"), "secret").unwrap();
        std::fs::create_dir(outer.path().join("www")).unwrap();

        let mut cfg = Config::load_from("does-not-exist/config").unwrap();
        cfg.site.root = outer.path().join("www").to_string_lossy().into_owned();
        let state = AppState::new(cfg).unwrap();

        assert_eq!(serve(&get("/../secret.txt"), &state).await.status(), 404);
        assert_eq!(serve(&get("/%2e%2e/secret.txt"), &state).await.status(), 404);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escape_blocked() {
        let outer = TempDir::new().unwrap();
        std::fs::write(outer.path().join("secret.txt"), "secret").unwrap();
        std::fs::create_dir(outer.path().join("www")).unwrap();
        std::os::unix::fs::symlink(
            outer.path().join("secret.txt"),
            outer.path().join("www/link.txt"),
        )
        .unwrap();

        let mut cfg = Config::load_from("does-not-exist/config").unwrap();
        cfg.site.root = outer.path().join("www").to_string_lossy().into_owned();
        let state = AppState::new(cfg).unwrap();

        assert_eq!(serve(&get("/link.txt"), &state).await.status(), 404);
    }

    #[tokio::test]
    async fn test_if_modified_since() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.css"), "a{}").unwrap();
        let state = state_for(&dir);

        let resp = serve(&get("/a.css"), &state).await;
        let last_modified = resp.headers()["last-modified"].to_str().unwrap().to_string();

        let ctx = RequestContext {
            path: "/a.css",
            if_modified_since: Some(&last_modified),
            ..RequestContext::default()
        };
        let resp = serve(&ctx, &state).await;
        assert_eq!(resp.status(), 304);
        assert!(body_of(resp).await.is_empty());

        let ctx = RequestContext {
            path: "/a.css",
            if_modified_since: Some(&last_modified),
            has_if_none_match: true,
            ..RequestContext::default()
        };
        assert_eq!(serve(&ctx, &state).await.status(), 200);
    }

    #[tokio::test]
    async fn test_overlong_name_is_404() {
        let dir = TempDir::new().unwrap();
        let state = state_for(&dir);

        let long = format!("/{}", "a".repeat(300));
        assert_eq!(serve(&get(&long), &state).await.status(), 404);
        let nested = format!("/{}/index.html", "b".repeat(300));
        assert_eq!(serve(&get(&nested), &state).await.status(), 404);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_loop_is_500() {
        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(dir.path().join("b"), dir.path().join("a")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("a"), dir.path().join("b")).unwrap();
        let state = state_for(&dir);

        assert_eq!(serve(&get("/a"), &state).await.status(), 500);
    }

    #[test]
    fn test_io_error_mapping() {
        let path = Path::new("/srv/x");
        let status = |kind: io::ErrorKind| io_error_response(&io::Error::from(kind), path).status();
        assert_eq!(status(io::ErrorKind::NotFound), 404);
        assert_eq!(status(io::ErrorKind::NotADirectory), 404);
        assert_eq!(status(io::ErrorKind::InvalidFilename), 404);
        assert_eq!(status(io::ErrorKind::PermissionDenied), 403);
        assert_eq!(status(io::ErrorKind::Other), 500);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_400() {
        let dir = TempDir::new().unwrap();
        let state = state_for(&dir);
        assert_eq!(serve(&get("/%ff%fe"), &state).await.status(), 400);
    }
}
