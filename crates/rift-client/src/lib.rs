//! Typed client for the Mountebank-compatible imposter Admin API.
//!
//! ```no_run
//! use rift_client::{Client, ClientConfig, Context, HttpRequest, HttpResponse};
//! use rift_client::{Imposter, Predicate, Response, Stub};
//! use std::time::Duration;
//!
//! # async fn run() -> rift_client::Result<()> {
//! let client = Client::new(ClientConfig::default())?;
//! let ctx = Context::background().with_timeout(Duration::from_secs(5));
//!
//! let imposter = Imposter::http(8080).with_stub(
//!     Stub::new()
//!         .with_predicate(Predicate::equals(HttpRequest::new().method("GET").path("/foo")))
//!         .with_response(Response::is(HttpResponse::new(200).body("ok"))),
//! );
//! let created = client.create(&ctx, &imposter).await?;
//! assert_eq!(created.port, 8080);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod transport;

pub use client::Client;
pub use config::ClientConfig;
pub use context::Context;
pub use error::{Error, Result};
pub use model::{
    Behaviors, Comparison, Config, HttpRequest, HttpResponse, Imposter, Log, Predicate, Protocol,
    Proxy, ProxyMode, RequestPayload, Response, ResponsePayload, Stub, TcpRequest, TcpResponse,
};
