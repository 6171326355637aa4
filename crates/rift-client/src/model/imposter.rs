//! Imposters and stubs.

use super::payload::{RequestPayload, ResponsePayload};
use super::predicate::{try_map_all, Predicate};
use super::response::Response;
use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Transport protocol of an imposter; selects the payload shape of every leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Tcp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Tcp => "tcp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "http" => Ok(Protocol::Http),
            "tcp" => Ok(Protocol::Tcp),
            other => Err(Error::UnsupportedProtocol(other.to_string())),
        }
    }
}

/// Predicates paired with a sequence of responses.
///
/// Predicates are AND-ed; an empty list always matches. The server treats
/// `responses` as a circular queue and rotates it on every match, so the
/// order seen on a later fetch may differ from the order sent. The client
/// never reorders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(bound(serialize = "Predicate<Q>: Serialize, Response<P>: Serialize"))]
pub struct Stub<Q = RequestPayload, P = ResponsePayload> {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub predicates: Vec<Predicate<Q>>,
    pub responses: Vec<Response<P>>,
}

impl<Q, P> Default for Stub<Q, P> {
    fn default() -> Self {
        Self {
            predicates: Vec::new(),
            responses: Vec::new(),
        }
    }
}

impl<Q, P> Stub<Q, P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_predicate(mut self, predicate: Predicate<Q>) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn with_response(mut self, response: Response<P>) -> Self {
        self.responses.push(response);
        self
    }

    /// Convert every request leaf with `on_request` and every response leaf
    /// with `on_response`, preserving order.
    pub(crate) fn try_map<Q2, P2, F, G>(
        self,
        on_request: &mut F,
        on_response: &mut G,
    ) -> Result<Stub<Q2, P2>>
    where
        F: FnMut(Q) -> Result<Q2>,
        G: FnMut(P) -> Result<P2>,
    {
        let predicates = try_map_all(self.predicates, on_request)?;
        let mut responses = Vec::with_capacity(self.responses.len());
        for response in self.responses {
            responses.push(response.try_map(on_response)?);
        }
        Ok(Stub {
            predicates,
            responses,
        })
    }
}

/// A virtual service registered on a port.
///
/// `request_count` and `requests` are owned by the server: they are filled
/// in on reads and never sent on writes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Imposter {
    pub protocol: Protocol,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Creation-only: ask the server to remember received requests.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub record_requests: bool,
    /// HTTP only: answer CORS pre-flight requests.
    #[serde(rename = "allowCORS", skip_serializing_if = "std::ops::Not::not")]
    pub allow_cors: bool,
    #[serde(skip)]
    pub request_count: u64,
    /// Sent when no stub matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_response: Option<ResponsePayload>,
    /// In match-priority order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stubs: Vec<Stub>,
    #[serde(skip)]
    pub requests: Vec<RequestPayload>,
}

impl Imposter {
    pub fn new(port: u16, protocol: Protocol) -> Self {
        Self {
            protocol,
            port,
            name: None,
            record_requests: false,
            allow_cors: false,
            request_count: 0,
            default_response: None,
            stubs: Vec::new(),
            requests: Vec::new(),
        }
    }

    pub fn http(port: u16) -> Self {
        Self::new(port, Protocol::Http)
    }

    pub fn tcp(port: u16) -> Self {
        Self::new(port, Protocol::Tcp)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_record_requests(mut self, record: bool) -> Self {
        self.record_requests = record;
        self
    }

    pub fn with_allow_cors(mut self, allow: bool) -> Self {
        self.allow_cors = allow;
        self
    }

    pub fn with_default_response(mut self, response: impl Into<ResponsePayload>) -> Self {
        self.default_response = Some(response.into());
        self
    }

    pub fn with_stub(mut self, stub: Stub) -> Self {
        self.stubs.push(stub);
        self
    }
}
