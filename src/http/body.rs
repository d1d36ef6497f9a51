//! Response body types
//!
//! Every response uses one boxed body type so buffered messages and streamed
//! files can share a single service signature.

use futures_util::TryStreamExt;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

/// Body type of every response produced by the server
pub type ResponseBody = UnsyncBoxBody<Bytes, std::io::Error>;

/// Buffered body
pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Zero-length body
pub fn empty() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Body streaming a file chunk by chunk
///
/// The file handle is owned by the body, so it is closed as soon as hyper
/// drops the body, including when the client goes away mid-transfer.
pub fn file_stream(file: File) -> ResponseBody {
    StreamBody::new(ReaderStream::new(file).map_ok(Frame::data)).boxed_unsync()
}
