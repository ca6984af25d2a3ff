//! Status lines, header lists, body chunks, and the assembled [`Response`].
//!
//! Handlers speak in these three pieces: a [`StatusLine`] and [`Headers`]
//! declared on a receiver, and a [`Body`] returned. The host glues them back
//! together into a [`Response`] once the handler is done.

use std::fmt;
use std::str::FromStr;

use bytes::{Bytes, BytesMut};
use http::header::{HeaderName, HeaderValue};
use http::StatusCode;
use http_body_util::Full;

use crate::error::Error;

/// Ordered `(name, value)` header pairs, exactly as a handler declared them.
pub type Headers = Vec<(String, String)>;

/// Response body as an ordered sequence of chunks.
pub type Body = Vec<Bytes>;

// ── StatusLine ────────────────────────────────────────────────────────────────

/// Status code plus reason phrase, e.g. `200 OK`.
///
/// ```rust
/// use notekit::StatusLine;
/// use http::StatusCode;
///
/// let ok = StatusLine::from(StatusCode::OK);
/// assert_eq!(ok.to_string(), "200 OK");
///
/// let teapot: StatusLine = "418 Short And Stout".parse().unwrap();
/// assert_eq!(teapot.code(), StatusCode::IM_A_TEAPOT);
/// assert_eq!(teapot.reason(), "Short And Stout");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatusLine {
    code: StatusCode,
    reason: String,
}

impl StatusLine {
    /// A status line with a custom reason phrase.
    pub fn new(code: StatusCode, reason: impl Into<String>) -> Self {
        Self { code, reason: reason.into() }
    }

    pub fn code(&self) -> StatusCode { self.code }
    pub fn reason(&self) -> &str { &self.reason }
}

/// Uses the canonical reason phrase, or none for unregistered codes.
impl From<StatusCode> for StatusLine {
    fn from(code: StatusCode) -> Self {
        Self::new(code, code.canonical_reason().unwrap_or(""))
    }
}

impl FromStr for StatusLine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (code, reason) = s.split_once(' ').unwrap_or((s, ""));
        let code = StatusCode::from_bytes(code.as_bytes())
            .map_err(|_| Error::InvalidStatus(s.to_owned()))?;
        Ok(Self::new(code, reason.trim()))
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reason.is_empty() {
            write!(f, "{}", self.code.as_u16())
        } else {
            write!(f, "{} {}", self.code.as_u16(), self.reason)
        }
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// A complete response: what a handler declared, plus what it returned.
#[derive(Debug)]
pub struct Response {
    pub(crate) status: StatusLine,
    pub(crate) headers: Headers,
    pub(crate) body: Body,
}

impl Response {
    pub fn new(status: StatusLine, headers: Headers, body: Body) -> Self {
        Self { status, headers, body }
    }

    pub fn status(&self) -> &StatusLine { &self.status }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn chunks(&self) -> &[Bytes] { &self.body }

    /// Case-insensitive header lookup. Returns the first match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All chunks joined into one contiguous buffer.
    pub fn body(&self) -> Bytes {
        concat(&self.body)
    }

    /// Converts into the `http` crate's response type for hyper to send.
    ///
    /// Headers keep their declared order. A `Content-Length` header is passed
    /// through as declared; framing is the handler's (or middleware's) job.
    pub(crate) fn into_http(self) -> Result<http::Response<Full<Bytes>>, Error> {
        let mut builder = http::Response::builder().status(self.status.code);
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::InvalidHeader(name.clone()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| Error::InvalidHeader(format!("{name}: {value}")))?;
            builder = builder.header(name, value);
        }
        builder
            .body(Full::new(concat(&self.body)))
            .map_err(|e| Error::InvalidHeader(e.to_string()))
    }
}

/// Response with no headers and no body, used when a handler fails outright.
pub(crate) fn internal_error() -> http::Response<Full<Bytes>> {
    let mut res = http::Response::new(Full::new(Bytes::new()));
    *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    res
}

fn concat(chunks: &[Bytes]) -> Bytes {
    match chunks {
        [] => Bytes::new(),
        [one] => one.clone(),
        many => {
            let mut buf = BytesMut::with_capacity(many.iter().map(Bytes::len).sum());
            for chunk in many {
                buf.extend_from_slice(chunk);
            }
            buf.freeze()
        }
    }
}
