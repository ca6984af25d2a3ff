//! Request context handed to every handler.

use http::Method;
use http::request::Parts;

use crate::response::Headers;

/// The request environment: method, path, query string, and headers.
///
/// The host builds one per request from the HTTP request head. The body is
/// not part of it; handlers here answer from the head alone.
///
/// ```rust
/// use notekit::Environ;
/// use http::Method;
///
/// let env = Environ::new(Method::POST, "/notes")
///     .with_query("draft=1")
///     .with_header("Accept", "text/html");
///
/// assert_eq!(env.method(), &Method::POST);
/// assert_eq!(env.header("accept"), Some("text/html"));
/// ```
#[derive(Clone, Debug)]
pub struct Environ {
    method: Method,
    path: String,
    query: Option<String>,
    headers: Headers,
}

impl Environ {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: None, headers: Vec::new() }
    }

    pub(crate) fn from_parts(parts: &Parts) -> Self {
        let headers = parts.headers.iter()
            .map(|(k, v)| (k.as_str().to_owned(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect();
        Self {
            method: parts.method.clone(),
            path: parts.uri.path().to_owned(),
            query: parts.uri.query().map(str::to_owned),
            headers,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn query(&self) -> Option<&str> { self.query.as_deref() }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
