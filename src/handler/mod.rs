//! Request handler module
//!
//! Request Router & Transfer Engine: path validation and method dispatch,
//! streamed downloads, size-guarded uploads and deletes.

pub mod delete;
pub mod download;
pub mod path;
pub mod router;
pub mod upload;

// Re-export main entry point
pub use router::handle_request;
