//! Per-request tracing middleware.

use std::time::Instant;

use bytes::Bytes;
use http::StatusCode;
use tracing::{error, info, info_span};

use crate::environ::Environ;
use crate::error::Error;
use crate::handler::Handler;
use crate::receiver::ResponseReceiver;
use crate::response::{Body, Headers, StatusLine};

/// Wraps a handler in a `request` span carrying method and path, and logs
/// one line per request with status, body size, and latency.
pub struct Trace<H> {
    inner: H,
}

impl<H: Handler> Trace<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H: Handler> Handler for Trace<H> {
    fn call(&self, environ: &Environ, start: &mut dyn ResponseReceiver) -> Result<Body, Error> {
        let span = info_span!("request", method = %environ.method(), path = environ.path());
        let _guard = span.enter();
        let started = Instant::now();

        let mut observed = Observe { inner: start, status: None };
        match self.inner.call(environ, &mut observed) {
            Ok(body) => {
                let status = observed.status.map(|s| s.as_u16());
                info!(
                    status,
                    bytes = body.iter().map(Bytes::len).sum::<usize>(),
                    latency_us = latency_us(started),
                    "request completed",
                );
                Ok(body)
            }
            Err(e) => {
                error!(latency_us = latency_us(started), "request failed: {e}");
                Err(e)
            }
        }
    }
}

fn latency_us(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX)
}

/// Forwards `start` unchanged, remembering the status code on the way.
struct Observe<'a> {
    inner: &'a mut dyn ResponseReceiver,
    status: Option<StatusCode>,
}

impl ResponseReceiver for Observe<'_> {
    fn start(&mut self, status: StatusLine, headers: Headers) {
        self.status = Some(status.code());
        self.inner.start(status, headers);
    }
}

#[cfg(test)]
mod tests {
    use http::Method;

    use super::*;
    use crate::receiver::Captured;

    fn created(_env: &Environ, start: &mut dyn ResponseReceiver) -> Result<Body, Error> {
        start.start(StatusCode::CREATED.into(), vec![("Location".into(), "/n/1".into())]);
        Ok(vec![Bytes::from_static(b"made")])
    }

    fn broken(_env: &Environ, _start: &mut dyn ResponseReceiver) -> Result<Body, Error> {
        Err(Error::InvalidState)
    }

    #[test]
    fn forwards_status_headers_and_body() {
        let mut captured = Captured::new();
        let body = Trace::new(created)
            .call(&Environ::new(Method::POST, "/n"), &mut captured)
            .unwrap();
        let res = captured.into_response(body).unwrap();

        assert_eq!(res.status().code(), StatusCode::CREATED);
        assert_eq!(res.header("location"), Some("/n/1"));
        assert_eq!(res.body(), "made");
    }

    #[test]
    fn latency_fits_in_u64() {
        let started = Instant::now();
        assert!(latency_us(started) < 60_000_000);
    }

    #[test]
    fn errors_pass_through() {
        let mut captured = Captured::new();
        let err = Trace::new(broken)
            .call(&Environ::new(Method::GET, "/"), &mut captured)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidState));
        assert!(!captured.is_started());
    }
}
