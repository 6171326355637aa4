//! Client for the imposter Admin API.
//!
//! Each method performs exactly one HTTP call: encode the input, send it to a
//! fixed path, check for the expected status, decode the body. Nothing is
//! retried; every failure is returned to the caller as is.

use crate::codec::{self, decode_imposter, decode_imposters, decode_optional_imposter};
use crate::config::ClientConfig;
use crate::context::Context;
use crate::error::Result;
use crate::model::{Config, Imposter, Log, Stub};
use crate::transport::Transport;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::trace;
use url::Url;

#[derive(Serialize)]
struct AddStubRequest<'a> {
    stub: &'a Stub,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<usize>,
}

#[derive(Serialize)]
struct StubsRequest<'a> {
    stubs: &'a [Stub],
}

#[derive(Serialize)]
struct ImpostersRequest<'a> {
    imposters: &'a [Imposter],
}

#[derive(Deserialize)]
struct LogsResponse {
    #[serde(default)]
    logs: Vec<Log>,
}

/// Typed client for the Admin API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    transport: Transport,
}

impl Client {
    /// Build a client with its own connection pool.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self::with_http_client(http, config.base_url))
    }

    /// Build a client on top of an existing `reqwest::Client`.
    pub fn with_http_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            transport: Transport::new(http, base_url),
        }
    }

    pub fn base_url(&self) -> &Url {
        self.transport.base_url()
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Register a new imposter (`POST /imposters`).
    pub async fn create(&self, ctx: &Context, imposter: &Imposter) -> Result<Imposter> {
        trace!(port = imposter.port, "encoding imposter");
        let body = codec::encode(imposter)?;
        let req = self
            .transport
            .request(Method::POST, "/imposters", Some(body), &[])?;
        self.transport
            .call(ctx, req, StatusCode::CREATED, decode_imposter)
            .await
    }

    /// Fetch one imposter. With `replayable` the server leaves out recorded
    /// requests and other runtime state.
    pub async fn imposter(&self, ctx: &Context, port: u16, replayable: bool) -> Result<Imposter> {
        let req = self.transport.request(
            Method::GET,
            &imposter_path(port),
            None,
            &[replayable_query(replayable)],
        )?;
        self.transport
            .call(ctx, req, StatusCode::OK, decode_imposter)
            .await
    }

    /// Insert a stub at `index`, or append it when `index` is `None`.
    pub async fn add_stub(
        &self,
        ctx: &Context,
        port: u16,
        index: Option<usize>,
        stub: &Stub,
    ) -> Result<Imposter> {
        let body = codec::encode(&AddStubRequest { stub, index })?;
        let path = format!("{}/stubs", imposter_path(port));
        let req = self.transport.request(Method::POST, &path, Some(body), &[])?;
        self.transport
            .call(ctx, req, StatusCode::OK, decode_imposter)
            .await
    }

    /// Replace the stub at `index`, leaving the others untouched.
    pub async fn overwrite_stub(
        &self,
        ctx: &Context,
        port: u16,
        index: usize,
        stub: &Stub,
    ) -> Result<Imposter> {
        let body = codec::encode(stub)?;
        let path = format!("{}/stubs/{}", imposter_path(port), index);
        let req = self.transport.request(Method::PUT, &path, Some(body), &[])?;
        self.transport
            .call(ctx, req, StatusCode::OK, decode_imposter)
            .await
    }

    /// Replace the whole stub list of an imposter.
    pub async fn overwrite_all_stubs(
        &self,
        ctx: &Context,
        port: u16,
        stubs: &[Stub],
    ) -> Result<Imposter> {
        let body = codec::encode(&StubsRequest { stubs })?;
        let path = format!("{}/stubs", imposter_path(port));
        let req = self.transport.request(Method::PUT, &path, Some(body), &[])?;
        self.transport
            .call(ctx, req, StatusCode::OK, decode_imposter)
            .await
    }

    pub async fn remove_stub(&self, ctx: &Context, port: u16, index: usize) -> Result<Imposter> {
        let path = format!("{}/stubs/{}", imposter_path(port), index);
        let req = self.transport.request(Method::DELETE, &path, None, &[])?;
        self.transport
            .call(ctx, req, StatusCode::OK, decode_imposter)
            .await
    }

    /// Delete an imposter and return it, or `None` if no imposter was
    /// registered on `port`.
    pub async fn delete(
        &self,
        ctx: &Context,
        port: u16,
        replayable: bool,
    ) -> Result<Option<Imposter>> {
        let req = self.transport.request(
            Method::DELETE,
            &imposter_path(port),
            None,
            &[replayable_query(replayable)],
        )?;
        self.transport
            .call(ctx, req, StatusCode::OK, decode_optional_imposter)
            .await
    }

    /// Clear the recorded requests of an imposter.
    pub async fn delete_requests(&self, ctx: &Context, port: u16) -> Result<Option<Imposter>> {
        let path = format!("{}/savedRequests", imposter_path(port));
        let req = self.transport.request(Method::DELETE, &path, None, &[])?;
        self.transport
            .call(ctx, req, StatusCode::OK, decode_optional_imposter)
            .await
    }

    /// Clear the responses saved by the proxies of an imposter.
    pub async fn delete_saved_proxy_responses(
        &self,
        ctx: &Context,
        port: u16,
    ) -> Result<Option<Imposter>> {
        let path = format!("{}/savedProxyResponses", imposter_path(port));
        let req = self.transport.request(Method::DELETE, &path, None, &[])?;
        self.transport
            .call(ctx, req, StatusCode::OK, decode_optional_imposter)
            .await
    }

    /// List every imposter. Without `replayable` the server answers with a
    /// summary of each one.
    pub async fn imposters(&self, ctx: &Context, replayable: bool) -> Result<Vec<Imposter>> {
        let req = self.transport.request(
            Method::GET,
            "/imposters",
            None,
            &[replayable_query(replayable)],
        )?;
        self.transport
            .call(ctx, req, StatusCode::OK, decode_imposters)
            .await
    }

    /// Replace every registered imposter with `imposters`.
    pub async fn overwrite(&self, ctx: &Context, imposters: &[Imposter]) -> Result<Vec<Imposter>> {
        let body = codec::encode(&ImpostersRequest { imposters })?;
        let req = self
            .transport
            .request(Method::PUT, "/imposters", Some(body), &[])?;
        self.transport
            .call(ctx, req, StatusCode::OK, decode_imposters)
            .await
    }

    /// Delete every imposter and return what was removed.
    pub async fn delete_all(&self, ctx: &Context, replayable: bool) -> Result<Vec<Imposter>> {
        let req = self.transport.request(
            Method::DELETE,
            "/imposters",
            None,
            &[replayable_query(replayable)],
        )?;
        self.transport
            .call(ctx, req, StatusCode::OK, decode_imposters)
            .await
    }

    pub async fn config(&self, ctx: &Context) -> Result<Config> {
        let req = self.transport.request(Method::GET, "/config", None, &[])?;
        self.transport
            .call(ctx, req, StatusCode::OK, |body| {
                Ok(serde_json::from_slice(body)?)
            })
            .await
    }

    /// Fetch the server log buffer between `start` and `end` (inclusive
    /// indices). `None` leaves that side unbounded.
    pub async fn logs(
        &self,
        ctx: &Context,
        start: Option<usize>,
        end: Option<usize>,
    ) -> Result<Vec<Log>> {
        let mut query = Vec::new();
        if let Some(start) = start {
            query.push(("startIndex", start.to_string()));
        }
        if let Some(end) = end {
            query.push(("endIndex", end.to_string()));
        }
        let req = self.transport.request(Method::GET, "/logs", None, &query)?;
        self.transport
            .call(ctx, req, StatusCode::OK, |body| {
                let wrap: LogsResponse = serde_json::from_slice(body)?;
                Ok(wrap.logs)
            })
            .await
    }
}

fn imposter_path(port: u16) -> String {
    format!("/imposters/{}", port)
}

fn replayable_query(replayable: bool) -> (&'static str, String) {
    ("replayable", replayable.to_string())
}
