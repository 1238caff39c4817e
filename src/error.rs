//! Startup error types
//!
//! Everything in here is fatal: the process reports it and exits before a
//! single connection is accepted. Per-request failures never reach this type,
//! the handler turns them into status codes.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub type StartupResult<T> = Result<T, StartupError>;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid bind address '{0}'")]
    InvalidAddress(String),

    #[error("Root directory '{}' is not accessible: {source}", .path.display())]
    RootInaccessible {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Root path '{}' is not a directory", .path.display())]
    RootNotDirectory { path: PathBuf },

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("Failed to open log file: {0}")]
    Logger(std::io::Error),

    #[error("Failed to build async runtime: {0}")]
    Runtime(std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
