//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: the path is decoded and validated
//! first, for every method, and only then is the request dispatched.

use crate::config::AppState;
use crate::handler::path::{self, Target};
use crate::handler::{delete, download, upload};
use crate::http::{self, ResponseBody};
use crate::logger;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::fmt::Display;
use std::sync::Arc;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<ResponseBody>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Display,
{
    Ok(dispatch(req, &state).await)
}

/// Validate the path, then route by method
async fn dispatch<B>(req: Request<B>, state: &AppState) -> Response<ResponseBody>
where
    B: Body<Data = Bytes>,
    B::Error: Display,
{
    let target = match path::resolve_target(req.uri().path()) {
        Ok(target) => target,
        Err(e) => {
            logger::log_debug(&format!("Rejected path '{}': {e}", req.uri().path()));
            return e.to_response();
        }
    };

    let (parts, body) = req.into_parts();
    match (parts.method, target) {
        (Method::GET, target) => download::serve(&target, state).await,
        (Method::POST, Target::File(name)) => {
            upload::receive(&name, &parts.headers, body, state).await
        }
        (Method::DELETE, Target::File(name)) => delete::remove(&name, state).await,
        (Method::POST | Method::DELETE, Target::Index) => {
            http::build_400_response("File not found")
        }
        (method, _) => {
            logger::log_warning(&format!("Method not routed: {method}"));
            http::build_502_response()
        }
    }
}
