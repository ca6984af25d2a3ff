//! # notekit
//!
//! Two small tools that share a crate and nothing else.
//!
//! ## Response middleware
//!
//! Handlers are synchronous: they get the request [`Environ`], declare a
//! status and headers on a [`ResponseReceiver`], and return body chunks.
//! Middleware are handlers that wrap handlers. The built-in
//! [`Transform`](middleware::Transform) rewrites the body and keeps
//! `Content-Length` honest; [`Server`] runs any handler over HTTP.
//!
//! ```rust,no_run
//! use notekit::app::request_method;
//! use notekit::middleware::{Stack, Trace, Transform};
//! use notekit::Server;
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Stack::new(request_method)
//!         .wrap(Transform::upper)
//!         .wrap(Trace::new)
//!         .build();
//!
//!     Server::bind("127.0.0.1:3000").serve(app).await.unwrap();
//! }
//! ```
//!
//! ## Directory index
//!
//! [`index::make_index`] writes a `README.md` linking every file one level
//! below a directory. The `make-index` binary runs it on the working
//! directory.

mod environ;
mod error;
mod handler;
mod receiver;
mod response;
mod server;

pub mod app;
pub mod index;
pub mod middleware;

pub use environ::Environ;
pub use error::Error;
pub use handler::{BoxedHandler, Handler};
pub use receiver::{Captured, ResponseReceiver};
pub use response::{Body, Headers, Response, StatusLine};
pub use server::Server;
