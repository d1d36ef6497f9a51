//! yafs - a flat HTTP file store
//!
//! `GET /` serves the index document, `GET /{name}` downloads a stored file,
//! `POST /{name}` uploads a new one (never overwriting) and `DELETE /{name}`
//! removes it.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod storage;
