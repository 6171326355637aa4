//! Stub responses and response behaviors.

use super::payload::ResponsePayload;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub(crate) const TYPE_IS: &str = "is";
pub(crate) const TYPE_PROXY: &str = "proxy";
pub(crate) const TYPE_INJECT: &str = "inject";
pub(crate) const TYPE_FAULT: &str = "fault";

/// Modifiers applied by the server before it sends a response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Behaviors {
    /// Latency added before replying, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait: Option<u64>,
    /// Number of times the response is sent before the stub moves on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<u32>,
    /// JavaScript that post-processes the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decorate: Option<String>,
    /// Behaviors this client does not model (copy, lookup, shellTransform...)
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Behaviors {
    pub fn wait(ms: u64) -> Self {
        Self {
            wait: Some(ms),
            ..Self::default()
        }
    }
}

/// Proxy recording mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProxyMode {
    ProxyOnce,
    ProxyAlways,
    ProxyTransparent,
}

/// Forward matched requests to a real service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proxy {
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ProxyMode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub predicate_generators: Vec<Value>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub add_wait_behavior: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_decorate_behavior: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub inject_headers: HashMap<String, String>,
}

impl Proxy {
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            mode: None,
            predicate_generators: Vec::new(),
            add_wait_behavior: false,
            add_decorate_behavior: None,
            inject_headers: HashMap::new(),
        }
    }

    pub fn mode(mut self, mode: ProxyMode) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Response type and its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseKind<P = ResponsePayload> {
    /// Canned, protocol-specific response.
    Is(P),
    Proxy(Proxy),
    /// JavaScript that builds the response on the server.
    Inject(String),
    /// Connection-level fault, e.g. `CONNECTION_RESET_BY_PEER`.
    Fault(String),
}

/// A reply definition; a stub cycles through its responses in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<P = ResponsePayload> {
    pub kind: ResponseKind<P>,
    pub behaviors: Option<Behaviors>,
}

impl<P> Response<P> {
    pub fn is(payload: impl Into<P>) -> Self {
        Self::from_kind(ResponseKind::Is(payload.into()))
    }

    pub fn proxy(proxy: Proxy) -> Self {
        Self::from_kind(ResponseKind::Proxy(proxy))
    }

    pub fn inject(script: impl Into<String>) -> Self {
        Self::from_kind(ResponseKind::Inject(script.into()))
    }

    pub fn fault(name: impl Into<String>) -> Self {
        Self::from_kind(ResponseKind::Fault(name.into()))
    }

    fn from_kind(kind: ResponseKind<P>) -> Self {
        Self {
            kind,
            behaviors: None,
        }
    }

    pub fn with_behaviors(mut self, behaviors: Behaviors) -> Self {
        self.behaviors = Some(behaviors);
        self
    }

    /// Shorthand for a `wait` behavior.
    pub fn with_wait(self, ms: u64) -> Self {
        self.with_behaviors(Behaviors::wait(ms))
    }

    /// Wire name of the response type.
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ResponseKind::Is(_) => TYPE_IS,
            ResponseKind::Proxy(_) => TYPE_PROXY,
            ResponseKind::Inject(_) => TYPE_INJECT,
            ResponseKind::Fault(_) => TYPE_FAULT,
        }
    }

    pub(crate) fn try_map<S, F>(self, f: &mut F) -> Result<Response<S>>
    where
        F: FnMut(P) -> Result<S>,
    {
        let kind = match self.kind {
            ResponseKind::Is(payload) => ResponseKind::Is(f(payload)?),
            ResponseKind::Proxy(proxy) => ResponseKind::Proxy(proxy),
            ResponseKind::Inject(script) => ResponseKind::Inject(script),
            ResponseKind::Fault(name) => ResponseKind::Fault(name),
        };
        Ok(Response {
            kind,
            behaviors: self.behaviors,
        })
    }
}
