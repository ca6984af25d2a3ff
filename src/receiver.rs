//! The response-start contract.
//!
//! A handler declares its status and headers by calling
//! [`ResponseReceiver::start`] before returning its body. Whoever invoked the
//! handler decides what "start" means: the host records it so it can build
//! the HTTP response, and a middleware records it so it can rewrite the
//! headers before passing them further out.
//!
//! ```text
//! host ──start──▶ Transform ──captured──▶ inner handler
//!                     │                        │
//!                     │◀── status + headers ───┘ (recorded, not forwarded)
//!                     │◀── body chunks ────────┘
//!  host ◀── start(status, rewritten headers) ──┘ (exactly once)
//! ```
//!
//! Each invocation gets its own [`Captured`], so nothing about a request
//! outlives the call and a handler can be shared between connections.

use crate::error::Error;
use crate::response::{Body, Headers, Response, StatusLine};

/// Receives the status line and headers a handler declares.
pub trait ResponseReceiver {
    fn start(&mut self, status: StatusLine, headers: Headers);
}

/// A receiver that records the most recent `start` call.
///
/// A handler may call `start` more than once; only the last declaration is
/// kept.
#[derive(Debug, Default)]
pub struct Captured {
    status: Option<StatusLine>,
    headers: Option<Headers>,
}

impl Captured {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the handler has declared a status yet.
    pub fn is_started(&self) -> bool {
        self.status.is_some()
    }

    /// The recorded status and headers.
    ///
    /// Fails with [`Error::InvalidState`] if `start` was never called.
    pub fn into_parts(self) -> Result<(StatusLine, Headers), Error> {
        match (self.status, self.headers) {
            (Some(status), Some(headers)) => Ok((status, headers)),
            _ => Err(Error::InvalidState),
        }
    }

    /// The recorded status and headers joined with the handler's body.
    pub fn into_response(self, body: Body) -> Result<Response, Error> {
        let (status, headers) = self.into_parts()?;
        Ok(Response::new(status, headers, body))
    }
}

impl ResponseReceiver for Captured {
    fn start(&mut self, status: StatusLine, headers: Headers) {
        self.status = Some(status);
        self.headers = Some(headers);
    }
}
