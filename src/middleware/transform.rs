//! Body-rewriting middleware.
//!
//! [`Transform`] runs the inner handler to completion, maps every chunk it
//! returned, puts a fixed prefix chunk in front, and forwards the inner
//! status and headers with `Content-Length` corrected for the prefix.
//!
//! The body is buffered: nothing is forwarded until the inner handler has
//! returned all of its chunks.

use bytes::Bytes;
use tracing::debug;

use crate::environ::Environ;
use crate::error::Error;
use crate::handler::Handler;
use crate::receiver::{Captured, ResponseReceiver};
use crate::response::{Body, Headers};

/// Prefix injected by [`Transform::upper`].
pub const UPPER_PREFIX: &str = "Upper middleware:<br/>";

/// ASCII-uppercases one chunk. Non-ASCII bytes are left alone, so the chunk
/// length never changes.
pub fn uppercase(chunk: &[u8]) -> Bytes {
    Bytes::from(chunk.to_ascii_uppercase())
}

/// How the forwarded `Content-Length` header is computed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ContentLength {
    /// Declared value plus the prefix length. The declared value must be a
    /// decimal integer.
    #[default]
    Adjust,
    /// Byte length of the body actually returned, whatever was declared.
    Recompute,
}

/// Middleware that maps body chunks and injects a prefix.
///
/// ```rust
/// use notekit::{Captured, Environ, Handler};
/// use notekit::app::request_method;
/// use notekit::middleware::Transform;
/// use http::Method;
///
/// let app = Transform::upper(request_method);
///
/// let mut captured = Captured::new();
/// let body = app.call(&Environ::new(Method::GET, "/"), &mut captured).unwrap();
/// let res = captured.into_response(body).unwrap();
///
/// assert_eq!(res.body(), "Upper middleware:<br/>REQUEST METHOD: GET");
/// assert_eq!(res.header("Content-Length"), Some("41"));
/// ```
pub struct Transform<H> {
    inner: H,
    prefix: Bytes,
    map: fn(&[u8]) -> Bytes,
    length: ContentLength,
}

impl<H: Handler> Transform<H> {
    /// No prefix, chunks passed through untouched, [`ContentLength::Adjust`].
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            prefix: Bytes::new(),
            map: Bytes::copy_from_slice,
            length: ContentLength::Adjust,
        }
    }

    /// Prefix [`UPPER_PREFIX`], chunks mapped through [`uppercase`].
    /// The prefix keeps its own casing.
    pub fn upper(inner: H) -> Self {
        Self::new(inner).prefix(UPPER_PREFIX).map_chunks(uppercase)
    }

    pub fn prefix(mut self, prefix: impl Into<Bytes>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn map_chunks(mut self, map: fn(&[u8]) -> Bytes) -> Self {
        self.map = map;
        self
    }

    pub fn content_length(mut self, policy: ContentLength) -> Self {
        self.length = policy;
        self
    }

    fn rewrite(&self, headers: Headers, body_len: usize) -> Result<Headers, Error> {
        headers.into_iter()
            .map(|(name, value)| {
                if !name.eq_ignore_ascii_case("content-length") {
                    return Ok((name, value));
                }
                let len = match self.length {
                    ContentLength::Adjust => {
                        let invalid = || Error::InvalidContentLength(value.clone());
                        let digits = value.trim();
                        if !digits.bytes().all(|b| b.is_ascii_digit()) {
                            return Err(invalid());
                        }
                        let declared: usize = digits.parse().map_err(|_| invalid())?;
                        declared.checked_add(self.prefix.len()).ok_or_else(invalid)?
                    }
                    ContentLength::Recompute => body_len,
                };
                debug!(from = %value, to = len, "rewrote content-length");
                Ok((name, len.to_string()))
            })
            .collect()
    }
}

impl<H: Handler> Handler for Transform<H> {
    fn call(&self, environ: &Environ, start: &mut dyn ResponseReceiver) -> Result<Body, Error> {
        let mut captured = Captured::new();
        let chunks = self.inner.call(environ, &mut captured)?;

        let mut body = Vec::with_capacity(chunks.len() + 1);
        if !self.prefix.is_empty() {
            body.push(self.prefix.clone());
        }
        body.extend(chunks.iter().map(|chunk| (self.map)(&chunk[..])));

        let (status, headers) = captured.into_parts()?;
        let body_len = body.iter().map(Bytes::len).sum();
        let headers = self.rewrite(headers, body_len)?;

        start.start(status, headers);
        Ok(body)
    }
}
