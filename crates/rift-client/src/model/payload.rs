//! Protocol-specific request and response payloads.
//!
//! Imposters speak either HTTP or raw TCP, and the same predicate/response
//! envelope carries a different payload shape for each. These types are the
//! resolved leaves of the document tree.

use crate::codec::values::{is_empty_multi_values, serialize_multi_values};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::net::IpAddr;

/// Query parameters or headers: each key maps to one or more values, in order.
pub type MultiValues = HashMap<String, Vec<String>>;

/// Request received by (or matched against) an HTTP imposter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequest {
    /// Originating address, host only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_from: Option<IpAddr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Request path without the query string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(
        skip_serializing_if = "is_empty_multi_values",
        serialize_with = "serialize_multi_values"
    )]
    pub query: MultiValues,
    #[serde(
        skip_serializing_if = "is_empty_multi_values",
        serialize_with = "serialize_multi_values"
    )]
    pub headers: MultiValues,
    /// Opaque body: a string or any JSON document. `Some(Value::Null)` is an
    /// explicit `"body": null` and survives a round trip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Set by the server on recorded requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl HttpRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Append a value for a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.entry(key.into()).or_default().push(value.into());
        self
    }

    /// Append a value for a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.entry(key.into()).or_default().push(value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn request_from(mut self, addr: IpAddr) -> Self {
        self.request_from = Some(addr);
        self
    }
}

/// Data received by (or matched against) a TCP imposter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TcpRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_from: Option<IpAddr>,
    /// Payload as sent on the wire, usually base64. Never decoded here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl TcpRequest {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            request_from: None,
            data: Some(data.into()),
        }
    }
}

/// Response body mode (Mountebank `_mode`)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Body is UTF-8 text (default)
    #[default]
    Text,
    /// Body is base64-encoded binary data
    Binary,
}

/// Canned reply of an HTTP imposter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(
        skip_serializing_if = "is_empty_multi_values",
        serialize_with = "serialize_multi_values"
    )]
    pub headers: MultiValues,
    /// See [`HttpRequest::body`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(rename = "_mode", skip_serializing_if = "Option::is_none")]
    pub mode: Option<ResponseMode>,
}

impl HttpResponse {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code: Some(status_code),
            ..Self::default()
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.entry(key.into()).or_default().push(value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn mode(mut self, mode: ResponseMode) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Canned reply of a TCP imposter. Empty data sends only the FIN.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TcpResponse {
    pub data: String,
}

impl TcpResponse {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

/// A request leaf, resolved against the imposter protocol.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestPayload {
    Http(HttpRequest),
    Tcp(TcpRequest),
}

impl RequestPayload {
    pub fn as_http(&self) -> Option<&HttpRequest> {
        match self {
            RequestPayload::Http(req) => Some(req),
            RequestPayload::Tcp(_) => None,
        }
    }

    pub fn as_tcp(&self) -> Option<&TcpRequest> {
        match self {
            RequestPayload::Tcp(req) => Some(req),
            RequestPayload::Http(_) => None,
        }
    }
}

impl From<HttpRequest> for RequestPayload {
    fn from(req: HttpRequest) -> Self {
        RequestPayload::Http(req)
    }
}

impl From<TcpRequest> for RequestPayload {
    fn from(req: TcpRequest) -> Self {
        RequestPayload::Tcp(req)
    }
}

/// A response leaf, resolved against the imposter protocol.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponsePayload {
    Http(HttpResponse),
    Tcp(TcpResponse),
}

impl ResponsePayload {
    pub fn as_http(&self) -> Option<&HttpResponse> {
        match self {
            ResponsePayload::Http(resp) => Some(resp),
            ResponsePayload::Tcp(_) => None,
        }
    }

    pub fn as_tcp(&self) -> Option<&TcpResponse> {
        match self {
            ResponsePayload::Tcp(resp) => Some(resp),
            ResponsePayload::Http(_) => None,
        }
    }
}

impl From<HttpResponse> for ResponsePayload {
    fn from(resp: HttpResponse) -> Self {
        ResponsePayload::Http(resp)
    }
}

impl From<TcpResponse> for ResponsePayload {
    fn from(resp: TcpResponse) -> Self {
        ResponsePayload::Tcp(resp)
    }
}
