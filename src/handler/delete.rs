//! File removal

use hyper::Response;

use crate::config::AppState;
use crate::http::{self, ResponseBody};
use crate::logger;
use crate::storage::{Filename, StoreError};

/// Serve a DELETE request
pub async fn remove(name: &Filename, state: &AppState) -> Response<ResponseBody> {
    match state.store.remove(name).await {
        Ok(()) => {
            logger::log_debug(&format!("Deleted '{name}'"));
            http::build_200_response("File deleted")
        }
        Err(StoreError::NotFound) => http::build_404_response("File not found"),
        Err(e) => {
            logger::log_error(&format!("Failed to delete '{name}': {e}"));
            http::build_500_response()
        }
    }
}
