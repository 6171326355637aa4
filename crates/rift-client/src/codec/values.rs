//! Leaf-level wire helpers: multi-value maps, client addresses, status codes.

use crate::error::{Error, Result};
use crate::model::MultiValues;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

/// A query parameter or header value as sent by the server: a plain string
/// for a single value, an array when repeated.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

pub(crate) fn normalize_multi_values(raw: HashMap<String, OneOrMany>) -> MultiValues {
    raw.into_iter().map(|(k, v)| (k, v.into())).collect()
}

/// Nothing to send: no keys, or only keys without values.
pub(crate) fn is_empty_multi_values(values: &MultiValues) -> bool {
    values.values().all(Vec::is_empty)
}

/// Single values go out as strings, repeated values as arrays. Keys with no
/// values are dropped.
pub(crate) fn serialize_multi_values<S>(values: &MultiValues, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let present = values.iter().filter(|(_, v)| !v.is_empty());
    let mut map = serializer.serialize_map(Some(present.clone().count()))?;
    for (key, vals) in present {
        match vals.as_slice() {
            [single] => map.serialize_entry(key, single)?,
            many => map.serialize_entry(key, many)?,
        }
    }
    map.end()
}

/// Where a `requestFrom` value came from, which decides how a trailing
/// `:segment` is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AddressForm {
    /// Written by a client into a predicate: normally a bare IP, possibly
    /// followed by a port.
    Host,
    /// Recorded by the server as `remoteAddress:remotePort`. The last
    /// segment is the port even when the address is unbracketed IPv6.
    Socket,
}

/// Parse a `requestFrom` value down to its host.
///
/// Accepts a bare IP, `ip:port`, `[v6]:port` and the unbracketed
/// `v6:port` form the server records, e.g. `::1:8080` or
/// `::ffff:a.b.c.d:port`. An unbracketed IPv6 value is only split when
/// `form` is [`AddressForm::Socket`]; as a host it is read whole.
pub(crate) fn parse_request_from(s: &str, form: AddressForm) -> Result<IpAddr> {
    if let Ok(addr) = s.parse::<SocketAddr>() {
        return Ok(addr.ip());
    }
    if form == AddressForm::Host {
        if let Ok(ip) = s.parse::<IpAddr>() {
            return Ok(ip);
        }
    }
    if let Some((host, port)) = s.rsplit_once(':') {
        if port.parse::<u16>().is_ok() {
            let host = host.trim_start_matches('[').trim_end_matches(']');
            if let Ok(ip) = host.parse::<IpAddr>() {
                return Ok(ip);
            }
        }
    }
    // recorded without a port
    s.parse::<IpAddr>()
        .map_err(|_| Error::InvalidAddress(s.to_string()))
}

/// Empty `requestFrom` strings mean "not set".
pub(crate) fn parse_optional_request_from(
    s: Option<String>,
    form: AddressForm,
) -> Result<Option<IpAddr>> {
    match s {
        Some(s) if !s.is_empty() => parse_request_from(&s, form).map(Some),
        _ => Ok(None),
    }
}

/// Keep an explicit `null` as `Some(Value::Null)`; a missing field stays
/// `None` through `#[serde(default)]`.
pub(crate) fn deserialize_present<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

/// Deserialize statusCode from either a number or a string
pub(crate) fn deserialize_status_code<'de, D>(deserializer: D) -> std::result::Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u16::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| D::Error::custom("invalid status code number")),
        Some(serde_json::Value::String(s)) => s
            .parse::<u16>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid status code string: {s}"))),
        Some(_) => Err(D::Error::custom("statusCode must be a number or string")),
    }
}
