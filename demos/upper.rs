//! The upper-casing middleware served over HTTP.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example upper
//!
//! Try:
//!   curl -i http://localhost:3000/
//!   curl -i -X POST http://localhost:3000/anything
//!
//! Every response is `Upper middleware:<br/>REQUEST METHOD: <METHOD>` with a
//! `Content-Length` that accounts for the prefix.

use notekit::app::request_method;
use notekit::middleware::{Stack, Trace, Transform};
use notekit::Server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("notekit=info".parse()?)
        )
        .init();

    let app = Stack::new(request_method)
        .wrap(Transform::upper)
        .wrap(Trace::new)
        .build();

    Server::bind("127.0.0.1:3000").serve(app).await?;
    Ok(())
}
