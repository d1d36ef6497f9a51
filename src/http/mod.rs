//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the file store.

pub mod body;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use body::ResponseBody;
pub use response::{
    build_200_response, build_400_close_response, build_400_response, build_404_response,
    build_409_response, build_413_response, build_500_response, build_502_response,
    build_file_response,
};
