//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from path
//! resolution and the filesystem.

pub mod cache;
pub mod headers;
pub mod mime;
pub mod response;

// Re-export commonly used items
pub use headers::augment;
pub use response::{
    build_304_response, build_400_response, build_403_response, build_404_response,
    build_500_response, build_501_response, build_preflight_response, build_redirect_response,
};
