//! File download module
//!
//! Streams the index document or a stored file. The file is opened and
//! inspected before any header is produced, so every open fault still gets
//! a proper status line.

use hyper::Response;

use crate::config::AppState;
use crate::handler::path::Target;
use crate::http::{self, body, mime, ResponseBody};
use crate::logger;
use crate::storage::{OpenedFile, StoreError};

/// Serve a GET request
pub async fn serve(target: &Target, state: &AppState) -> Response<ResponseBody> {
    let (opened, name) = match target {
        Target::Index => {
            let index = state.config.storage.index_file.as_str();
            (state.store.open_public(index).await, index)
        }
        Target::File(name) => (state.store.open(name).await, name.as_str()),
    };

    match opened {
        Ok(OpenedFile { file, len }) => {
            logger::log_debug(&format!("Streaming '{name}' ({len} bytes)"));
            http::build_file_response(body::file_stream(file), mime::content_type_for(name), len)
        }
        Err(StoreError::NotFound) => http::build_404_response("Not found"),
        Err(e) => {
            logger::log_error(&format!("Failed to open '{name}' for reading: {e}"));
            http::build_500_response()
        }
    }
}
