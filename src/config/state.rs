// Application state module
// Immutable per-process state shared by every connection

use hyper::header::HeaderValue;
use std::path::{Path, PathBuf};

use super::types::Config;
use crate::error::StartupResult;
use crate::logger;

/// Application state
///
/// Built once at startup and handed to connections behind an `Arc`.
/// Nothing in here changes after construction, so requests never contend.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    /// Canonical served root
    root: PathBuf,
    /// Pre-validated `Server` header value
    server_header: Option<HeaderValue>,
}

impl AppState {
    /// Validate the configured root and build the state around it
    pub fn new(config: Config) -> StartupResult<Self> {
        let root = config.resolve_root()?;
        let server_header = match HeaderValue::from_str(&config.http.server_name) {
            Ok(value) => Some(value),
            Err(_) => {
                logger::log_warning(&format!(
                    "Ignoring invalid server_name '{}'",
                    config.http.server_name
                ));
                None
            }
        };

        Ok(Self {
            config,
            root,
            server_header,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub const fn server_header(&self) -> Option<&HeaderValue> {
        self.server_header.as_ref()
    }
}
