//! The stock application: echo the request method, shouted.

use bytes::Bytes;
use http::StatusCode;

use crate::environ::Environ;
use crate::error::Error;
use crate::handler::Handler;
use crate::middleware::Transform;
use crate::receiver::ResponseReceiver;
use crate::response::{Body, StatusLine};

/// `200 OK`, `text/html`, body `request method: <METHOD>`.
pub fn request_method(environ: &Environ, start: &mut dyn ResponseReceiver) -> Result<Body, Error> {
    let body = format!("request method: {}", environ.method());

    start.start(StatusLine::from(StatusCode::OK), vec![
        ("Content-Type".to_owned(), "text/html".to_owned()),
        ("Content-Length".to_owned(), body.len().to_string()),
    ]);

    Ok(vec![Bytes::from(body)])
}

/// [`request_method`] behind the upper-casing middleware.
pub fn application() -> impl Handler {
    Transform::upper(request_method)
}
