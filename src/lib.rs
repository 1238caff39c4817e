//! Static file server for browser-embedded web assets.
//!
//! Serves one directory over HTTP/1.1. Every response carries permissive
//! CORS and frame-embedding headers, and `OPTIONS` preflights are answered
//! directly without touching the filesystem.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
