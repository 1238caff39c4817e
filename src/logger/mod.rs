//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Server lifecycle logging
//! - Error and warning logging
//! - File-based logging support

pub mod writer;

pub use writer::Level;

use crate::config::Config;
use chrono::Local;
use std::net::SocketAddr;
use std::path::Path;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        Level::parse(&config.logging.level),
        config.logging.log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write a timestamped line; falls back to stdout/stderr before `init()`
fn write(level: Level, message: &str) {
    let line = format!(
        "[{}] [{}] {message}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        level.as_str()
    );
    match writer::get() {
        Some(w) => w.write(level, &line),
        None if level <= Level::Warn => eprintln!("{line}"),
        None if level == Level::Info => println!("{line}"),
        None => {}
    }
}

pub fn log_server_start(addr: &SocketAddr, root: &Path, config: &Config) {
    log_info("======================================");
    log_info(&format!("Server running at http://{addr}"));
    log_info(&format!("Serving files from: {}", root.display()));
    log_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        log_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.log_file {
        log_info(&format!("Log file: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        log_info(&format!("Error log: {path}"));
    }
    log_info("======================================");
}

pub fn log_shutdown(addr: &SocketAddr) {
    log_info(&format!("[Shutdown] Listener on {addr} closed"));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log_error(&format!("Failed to serve connection: {err:?}"));
}

pub fn log_startup_failed(err: &impl std::fmt::Display) {
    log_error(&format!("Startup failed: {err}"));
}

pub fn log_info(message: &str) {
    write(Level::Info, message);
}

pub fn log_debug(message: &str) {
    write(Level::Debug, message);
}

pub fn log_error(message: &str) {
    write(Level::Error, message);
}

pub fn log_warning(message: &str) {
    write(Level::Warn, message);
}
