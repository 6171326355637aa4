//! Pass one of imposter decoding: everything except protocol-specific leaves.
//!
//! Predicate and response objects are single-key maps whose key is the
//! operator (or response type). Their payload shape depends on the imposter
//! protocol, which JSON only tells us in a sibling field, so the leaves are
//! kept as [`Deferred`] JSON until [`super::resolve_payloads`] runs.

use crate::error::{Error, Result};
use crate::model::{
    Behaviors, Operation, Predicate, Response, ResponseKind, Stub, OP_AND, OP_EXISTS, OP_INJECT,
    OP_NOT, OP_OR, TYPE_FAULT, TYPE_INJECT, TYPE_IS, TYPE_PROXY,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

pub(crate) const KEY_CASE_SENSITIVE: &str = "caseSensitive";
pub(crate) const KEY_EXCEPT: &str = "except";
pub(crate) const KEY_JSONPATH: &str = "jsonpath";
pub(crate) const KEY_XPATH: &str = "xpath";

/// Predicate keys that modify the operator instead of being one.
pub(crate) const MODIFIER_KEYS: [&str; 4] = [KEY_CASE_SENSITIVE, KEY_EXCEPT, KEY_JSONPATH, KEY_XPATH];

pub(crate) const KEY_BEHAVIORS: &str = "_behaviors";
/// Array form emitted by newer servers.
const KEY_BEHAVIORS_ARRAY: &str = "behaviors";

/// A protocol-dependent leaf whose type is not known yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Deferred(Value);

impl Deferred {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Deferred {
    fn from(value: Value) -> Self {
        Deferred(value)
    }
}

/// An imposter decoded up to, but not including, its protocol-specific leaves.
#[derive(Debug, Clone, PartialEq)]
pub struct ImposterEnvelope {
    pub port: u16,
    /// Unvalidated; checked when payloads are resolved.
    pub protocol: String,
    pub name: Option<String>,
    pub record_requests: bool,
    pub allow_cors: bool,
    pub request_count: u64,
    pub default_response: Option<Deferred>,
    pub stubs: Vec<Stub<Deferred, Deferred>>,
    pub requests: Vec<Deferred>,
}

/// Imposter as found on the wire
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImposterRaw {
    port: u16,
    protocol: String,
    name: Option<String>,
    #[serde(default)]
    record_requests: bool,
    #[serde(default, rename = "allowCORS")]
    allow_cors: bool,
    #[serde(default, rename = "numberOfRequests")]
    request_count: u64,
    default_response: Option<Value>,
    #[serde(default)]
    stubs: Vec<StubRaw>,
    #[serde(default)]
    requests: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StubRaw {
    #[serde(default)]
    predicates: Vec<Map<String, Value>>,
    #[serde(default)]
    responses: Vec<Map<String, Value>>,
}

/// Decode an imposter document without looking at its protocol.
pub fn decode_envelope(bytes: &[u8]) -> Result<ImposterEnvelope> {
    let raw: ImposterRaw = serde_json::from_slice(bytes)?;
    ImposterEnvelope::try_from(raw)
}

impl TryFrom<ImposterRaw> for ImposterEnvelope {
    type Error = Error;

    fn try_from(raw: ImposterRaw) -> Result<Self> {
        trace!(
            "decoding envelope for imposter {} ({} stubs, {} requests)",
            raw.port,
            raw.stubs.len(),
            raw.requests.len()
        );
        let stubs = raw
            .stubs
            .into_iter()
            .map(stub_envelope)
            .collect::<Result<Vec<_>>>()?;
        Ok(ImposterEnvelope {
            port: raw.port,
            protocol: raw.protocol,
            name: raw.name,
            record_requests: raw.record_requests,
            allow_cors: raw.allow_cors,
            request_count: raw.request_count,
            default_response: raw.default_response.map(Deferred),
            stubs,
            requests: raw.requests.into_iter().map(Deferred).collect(),
        })
    }
}

pub(crate) fn stub_envelope(raw: StubRaw) -> Result<Stub<Deferred, Deferred>> {
    Ok(Stub {
        predicates: raw
            .predicates
            .into_iter()
            .map(predicate_envelope)
            .collect::<Result<_>>()?,
        responses: raw
            .responses
            .into_iter()
            .map(response_envelope)
            .collect::<Result<_>>()?,
    })
}

/// Decode one predicate object, recursing into logical operators.
///
/// Keys are split into modifiers and operators first; exactly one operator
/// key must remain.
pub(crate) fn predicate_envelope(map: Map<String, Value>) -> Result<Predicate<Deferred>> {
    let (modifiers, mut operators): (Vec<_>, Vec<_>) = map
        .into_iter()
        .partition(|(key, _)| MODIFIER_KEYS.contains(&key.as_str()));

    if operators.len() != 1 {
        return Err(Error::MalformedPredicate {
            keys: sorted_keys(operators),
        });
    }
    let Some((operator, payload)) = operators.pop() else {
        return Err(Error::MalformedPredicate { keys: Vec::new() });
    };

    let operation = match operator.as_str() {
        OP_AND => Operation::And(predicate_list(payload)?),
        OP_OR => Operation::Or(predicate_list(payload)?),
        OP_NOT => Operation::Not(Box::new(predicate_envelope(serde_json::from_value(
            payload,
        )?)?)),
        OP_INJECT => Operation::Inject(serde_json::from_value(payload)?),
        OP_EXISTS => Operation::Exists(serde_json::from_value(payload)?),
        other => Operation::Compare {
            operator: other.parse()?,
            request: Deferred(payload),
        },
    };

    let mut predicate = Predicate::new(operation);
    for (key, value) in modifiers {
        match key.as_str() {
            KEY_CASE_SENSITIVE => predicate.case_sensitive = serde_json::from_value(value)?,
            KEY_EXCEPT => predicate.except = serde_json::from_value(value)?,
            KEY_JSONPATH => predicate.json_path = serde_json::from_value(value)?,
            KEY_XPATH => predicate.xpath = serde_json::from_value(value)?,
            // partitioned above
            _ => {}
        }
    }
    Ok(predicate)
}

fn predicate_list(payload: Value) -> Result<Vec<Predicate<Deferred>>> {
    let maps: Vec<Map<String, Value>> = serde_json::from_value(payload)?;
    maps.into_iter().map(predicate_envelope).collect()
}

fn sorted_keys(entries: Vec<(String, Value)>) -> Vec<String> {
    let mut keys: Vec<String> = entries.into_iter().map(|(key, _)| key).collect();
    keys.sort();
    keys
}

/// Decode one response object. Behaviors sit next to the type key.
pub(crate) fn response_envelope(map: Map<String, Value>) -> Result<Response<Deferred>> {
    let (behavior_entries, mut kinds): (Vec<_>, Vec<_>) = map
        .into_iter()
        .partition(|(key, _)| key == KEY_BEHAVIORS || key == KEY_BEHAVIORS_ARRAY);

    if kinds.len() != 1 {
        return Err(Error::MalformedResponse {
            keys: sorted_keys(kinds),
        });
    }
    let Some((kind, payload)) = kinds.pop() else {
        return Err(Error::MalformedResponse { keys: Vec::new() });
    };

    let kind = match kind.as_str() {
        TYPE_IS => ResponseKind::Is(Deferred(payload)),
        TYPE_PROXY => ResponseKind::Proxy(serde_json::from_value(payload)?),
        TYPE_INJECT => ResponseKind::Inject(serde_json::from_value(payload)?),
        TYPE_FAULT => ResponseKind::Fault(serde_json::from_value(payload)?),
        other => return Err(Error::UnsupportedResponseType(other.to_string())),
    };

    // Prefer _behaviors, fall back to the array form
    let mut behaviors = None;
    for (key, value) in behavior_entries {
        if key == KEY_BEHAVIORS || behaviors.is_none() {
            behaviors = decode_behaviors(value)?.or(behaviors);
        }
    }

    Ok(Response { kind, behaviors })
}

/// Accept `{"wait": 500}` as well as `[{"wait": 500}, {"repeat": 2}]`.
fn decode_behaviors(value: Value) -> Result<Option<Behaviors>> {
    let object = match value {
        Value::Null => return Ok(None),
        items @ Value::Array(_) => {
            // every entry must be an object
            let entries: Vec<Map<String, Value>> = serde_json::from_value(items)?;
            let mut merged = Map::new();
            for entry in entries {
                merged.extend(entry);
            }
            Value::Object(merged)
        }
        other => other,
    };
    Ok(Some(serde_json::from_value(object)?))
}
