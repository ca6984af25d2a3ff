//! Handler trait and type erasure.
//!
//! # What a handler is
//!
//! A handler takes the request [`Environ`] and a [`ResponseReceiver`],
//! declares its status and headers on the receiver, and returns its body as a
//! list of chunks. Plain functions and closures with that shape are handlers
//! already:
//!
//! ```rust
//! use notekit::{Body, Environ, Error, ResponseReceiver, StatusLine};
//! use http::StatusCode;
//!
//! fn hello(_env: &Environ, start: &mut dyn ResponseReceiver) -> Result<Body, Error> {
//!     start.start(StatusLine::from(StatusCode::OK), vec![]);
//!     Ok(vec!["hello".into()])
//! }
//! ```
//!
//! Middleware are handlers too: they hold another handler and call it.
//!
//! # How handlers are shared
//!
//! The server needs one handler value shared by every connection task, and
//! callers building a stack at runtime need to hold handlers of *different*
//! types behind one name. [`BoxedHandler`] covers both:
//!
//! ```text
//! Stack::new(app).wrap(Transform::upper)     ← concrete Transform<fn …>
//!        ↓ .boxed()
//! BoxedHandler(Arc::new(transform))          ← one heap allocation
//!        ↓ .clone() per connection           ← atomic increment
//! handler.call(&env, &mut captured)          ← one vtable dispatch
//! ```

use std::fmt;
use std::sync::Arc;

use crate::environ::Environ;
use crate::error::Error;
use crate::receiver::ResponseReceiver;
use crate::response::Body;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Produces a response for one request.
///
/// Implemented automatically for every function or closure with the
/// signature
///
/// ```text
/// Fn(&Environ, &mut dyn ResponseReceiver) -> Result<Body, Error>
/// ```
///
/// A handler must call `start` before returning `Ok`. Callers that wrap it
/// treat a missing `start` as [`Error::InvalidState`].
pub trait Handler: Send + Sync + 'static {
    fn call(&self, environ: &Environ, start: &mut dyn ResponseReceiver) -> Result<Body, Error>;
}

impl<F> Handler for F
where
    F: Fn(&Environ, &mut dyn ResponseReceiver) -> Result<Body, Error> + Send + Sync + 'static,
{
    fn call(&self, environ: &Environ, start: &mut dyn ResponseReceiver) -> Result<Body, Error> {
        self(environ, start)
    }
}

// ── Type erasure ──────────────────────────────────────────────────────────────

/// A type-erased handler, cheap to clone and safe to share across threads.
#[derive(Clone)]
pub struct BoxedHandler(Arc<dyn Handler>);

impl BoxedHandler {
    pub fn new(handler: impl Handler) -> Self {
        Self(Arc::new(handler))
    }
}

impl Handler for BoxedHandler {
    fn call(&self, environ: &Environ, start: &mut dyn ResponseReceiver) -> Result<Body, Error> {
        self.0.call(environ, start)
    }
}

impl fmt::Debug for BoxedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BoxedHandler")
    }
}
