//! Request handler module
//!
//! Responsible for method dispatch and static file serving. Every response
//! produced here leaves through the router, which adds the cross-origin and
//! embedding headers.

pub mod listing;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
