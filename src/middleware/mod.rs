//! Middleware layer.
//!
//! A middleware is a [`Handler`] that owns another handler. It sees the
//! request before the inner handler does and the response after, and is the
//! right place for cross-cutting concerns such as body rewriting and tracing.
//!
//! Built-in middleware:
//! - [`Transform`] — maps body chunks, injects a prefix, fixes `Content-Length`
//! - [`Trace`] — per-request span with method, path, status, latency
//!
//! Layers are composed explicitly with [`Stack`]. The last `wrap` is the
//! outermost layer:
//!
//! ```rust
//! use notekit::app::request_method;
//! use notekit::middleware::{Stack, Trace, Transform};
//!
//! let app = Stack::new(request_method)
//!     .wrap(Transform::upper)
//!     .wrap(Trace::new)
//!     .boxed();
//! ```

mod trace;
mod transform;

pub use trace::Trace;
pub use transform::{ContentLength, Transform, UPPER_PREFIX, uppercase};

use crate::handler::{BoxedHandler, Handler};

/// Builds a handler by wrapping layers around an innermost handler.
pub struct Stack<H> {
    handler: H,
}

impl<H: Handler> Stack<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    /// Wraps the current stack in one more layer.
    pub fn wrap<M, F>(self, layer: F) -> Stack<M>
    where
        M: Handler,
        F: FnOnce(H) -> M,
    {
        Stack { handler: layer(self.handler) }
    }

    pub fn build(self) -> H {
        self.handler
    }

    pub fn boxed(self) -> BoxedHandler {
        BoxedHandler::new(self.handler)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::{Method, StatusCode};

    use super::*;
    use crate::environ::Environ;
    use crate::error::Error;
    use crate::receiver::{Captured, ResponseReceiver};
    use crate::response::Body;

    fn hello(_env: &Environ, start: &mut dyn ResponseReceiver) -> Result<Body, Error> {
        start.start(StatusCode::OK.into(), vec![("Content-Length".into(), "5".into())]);
        Ok(vec![Bytes::from_static(b"hello")])
    }

    #[test]
    fn later_layers_wrap_earlier_ones() {
        let app = Stack::new(hello)
            .wrap(|h| Transform::new(h).prefix("[a]"))
            .wrap(|h| Transform::new(h).prefix("[b]"))
            .build();

        let mut captured = Captured::new();
        let body = app.call(&Environ::new(Method::GET, "/"), &mut captured).unwrap();
        let res = captured.into_response(body).unwrap();

        assert_eq!(res.body(), "[b][a]hello");
        assert_eq!(res.header("content-length"), Some("11"));
    }
}
