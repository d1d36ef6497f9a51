//! HTTP response building module
//!
//! Provides builders for every status the file server answers with.
//! Bodies are short plain-text messages; only file downloads stream.

use hyper::header::{CONNECTION, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Response, StatusCode};

use super::body::{self, ResponseBody};

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Build a plain-text response, optionally asking the client to close the connection
fn build_text_response(
    status: StatusCode,
    message: &'static str,
    close: bool,
) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, TEXT_PLAIN)
        .header(CONTENT_LENGTH, message.len());
    if close {
        builder = builder.header(CONNECTION, "close");
    }

    builder.body(body::full(message)).unwrap_or_else(|e| {
        log_build_error(status, &e);
        fallback(status)
    })
}

/// Build 200 OK response carrying a confirmation message
pub fn build_200_response(message: &'static str) -> Response<ResponseBody> {
    build_text_response(StatusCode::OK, message, false)
}

/// Build 200 OK response streaming a file
pub fn build_file_response(
    data: ResponseBody,
    content_type: &str,
    content_length: u64,
) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .body(data)
        .unwrap_or_else(|e| {
            log_build_error(StatusCode::OK, &e);
            build_500_response()
        })
}

/// Build 400 Bad Request response
pub fn build_400_response(message: &'static str) -> Response<ResponseBody> {
    build_text_response(StatusCode::BAD_REQUEST, message, false)
}

/// Build 400 Bad Request response for a request whose body could not be read
pub fn build_400_close_response(message: &'static str) -> Response<ResponseBody> {
    build_text_response(StatusCode::BAD_REQUEST, message, true)
}

/// Build 404 Not Found response
pub fn build_404_response(message: &'static str) -> Response<ResponseBody> {
    build_text_response(StatusCode::NOT_FOUND, message, false)
}

/// Build 409 Conflict response
pub fn build_409_response() -> Response<ResponseBody> {
    build_text_response(StatusCode::CONFLICT, "File already exists", false)
}

/// Build 413 Payload Too Large response
///
/// The request body is never fully read in this case, so the connection
/// cannot be reused.
pub fn build_413_response() -> Response<ResponseBody> {
    build_text_response(StatusCode::PAYLOAD_TOO_LARGE, "File is too big", true)
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<ResponseBody> {
    build_text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error", true)
}

/// Build 502 response for methods the server does not route
pub fn build_502_response() -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::BAD_GATEWAY)
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error(StatusCode::BAD_GATEWAY, &e);
            fallback(StatusCode::BAD_GATEWAY)
        })
}

fn fallback(status: StatusCode) -> Response<ResponseBody> {
    let mut resp = Response::new(body::empty());
    *resp.status_mut() = status;
    resp
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_responses() {
        let resp = build_409_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "19");
        assert!(resp.headers().get(CONNECTION).is_none());

        let resp = build_413_response();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(resp.headers()[CONNECTION], "close");
    }

    #[test]
    fn test_internal_error_closes_connection() {
        let resp = build_500_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.headers()[CONNECTION], "close");
    }

    #[test]
    fn test_bad_gateway_has_no_content_type() {
        let resp = build_502_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert!(resp.headers().get(CONTENT_TYPE).is_none());
    }
}
