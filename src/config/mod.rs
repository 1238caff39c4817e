// Configuration module entry point
// Loads layered configuration and builds the shared runtime state

mod state;
mod types;

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::error::{StartupError, StartupResult};

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, SiteConfig};

/// Environment variables override file values, e.g. `CORS_SERVER_SERVER__PORT=8080`
const ENV_PREFIX: &str = "CORS_SERVER";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// The file is optional; defaults and environment fill the gaps
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 12000)?
            .set_default("site.root", "public")?
            .set_default("site.index_files", vec!["index.html", "index.htm"])?
            .set_default("site.directory_listing", true)?
            .set_default("logging.level", "info")?
            .set_default("performance.keep_alive", true)?
            .set_default(
                "http.server_name",
                concat!("cors-file-server/", env!("CARGO_PKG_VERSION")),
            )?
            .build()?;

        settings.try_deserialize()
    }

    /// Bind address from `server.host` (IPv4 or IPv6 literal) and `server.port`
    pub fn socket_addr(&self) -> StartupResult<SocketAddr> {
        let ip: IpAddr = self
            .server
            .host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse()
            .map_err(|_| StartupError::InvalidAddress(self.server.host.clone()))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// Canonicalize the served root and make sure it is a readable directory
    pub fn resolve_root(&self) -> StartupResult<PathBuf> {
        let path = PathBuf::from(&self.site.root);
        let canonical = path
            .canonicalize()
            .map_err(|source| StartupError::RootInaccessible {
                path: path.clone(),
                source,
            })?;

        if !canonical.is_dir() {
            return Err(StartupError::RootNotDirectory { path });
        }

        std::fs::read_dir(&canonical)
            .map_err(|source| StartupError::RootInaccessible { path, source })?;

        Ok(canonical)
    }
}
