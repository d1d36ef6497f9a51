//! Request path decoding and validation
//!
//! Turns the raw request path into a [`Target`]. Every rejection happens here,
//! before any handler runs, so an invalid name never reaches the file store.

use std::borrow::Cow;
use thiserror::Error;

use crate::http::{self, ResponseBody};
use crate::storage::Filename;
use hyper::Response;

/// What a request path addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The root path `/`
    Index,
    /// A single stored file
    File(Filename),
}

/// Reason a request path was refused
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    #[error("malformed percent-encoding")]
    Malformed,
    #[error("embedded NUL byte")]
    NulByte,
    #[error("nested paths are not allowed")]
    Nested,
}

impl PathError {
    pub fn to_response(self) -> Response<ResponseBody> {
        match self {
            Self::Malformed | Self::NulByte => http::build_400_response("Bad request"),
            Self::Nested => http::build_400_response("Nested paths are not allowed"),
        }
    }
}

/// Decode and validate a raw request path
pub fn resolve_target(raw_path: &str) -> Result<Target, PathError> {
    let decoded = decode_path(raw_path)?;
    if decoded.contains('\0') {
        return Err(PathError::NulByte);
    }

    let candidate = decoded.strip_prefix('/').unwrap_or(&decoded);
    if candidate.is_empty() {
        return Ok(Target::Index);
    }

    Filename::parse(candidate)
        .map(Target::File)
        .ok_or(PathError::Nested)
}

/// Percent-decode a path
///
/// Strict: a `%` not followed by two hex digits, or a sequence that does not
/// decode to UTF-8, is an error rather than being passed through.
pub fn decode_path(raw: &str) -> Result<String, PathError> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return Err(PathError::Malformed);
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .map_err(|_| PathError::Malformed)
}
