//! JSON codec for the document model.
//!
//! Encoding goes through the model's `Serialize` impls. Decoding is split in
//! two explicit passes because the shape of predicate and response payloads
//! depends on the imposter protocol:
//!
//! 1. [`decode_envelope`] reads the document with those payloads left as
//!    [`Deferred`] JSON;
//! 2. [`resolve_payloads`] parses the protocol and converts every deferred
//!    leaf, recursing through logical predicates.
//!
//! A failure in either pass discards the whole document.

mod encode;
mod envelope;
mod payload;
mod resolve;
pub(crate) mod values;

pub use envelope::{decode_envelope, Deferred, ImposterEnvelope};
pub use resolve::{resolve_payloads, resolve_stub};

use crate::error::Result;
use crate::model::{Imposter, Protocol, Stub};
use envelope::{stub_envelope, ImposterRaw, StubRaw};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Encode any model value (or request wrapper) as JSON bytes.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// Decode a single imposter document.
pub fn decode_imposter(bytes: &[u8]) -> Result<Imposter> {
    resolve_payloads(decode_envelope(bytes)?)
}

/// Decode an imposter document, treating the empty object `{}` as "none".
///
/// Deleting an imposter that does not exist answers with `{}`.
pub fn decode_optional_imposter(bytes: &[u8]) -> Result<Option<Imposter>> {
    let object: Map<String, Value> = serde_json::from_slice(bytes)?;
    if object.is_empty() {
        return Ok(None);
    }
    let raw: ImposterRaw = serde_json::from_value(Value::Object(object))?;
    resolve_payloads(ImposterEnvelope::try_from(raw)?).map(Some)
}

#[derive(Deserialize)]
struct ImpostersRaw {
    #[serde(default)]
    imposters: Vec<ImposterRaw>,
}

/// Decode a `{"imposters": [...]}` list; each imposter resolves against its
/// own protocol.
pub fn decode_imposters(bytes: &[u8]) -> Result<Vec<Imposter>> {
    let raw: ImpostersRaw = serde_json::from_slice(bytes)?;
    raw.imposters
        .into_iter()
        .map(|imposter| resolve_payloads(ImposterEnvelope::try_from(imposter)?))
        .collect()
}

/// Decode a stub for an imposter whose protocol is already known.
pub fn decode_stub(protocol: Protocol, bytes: &[u8]) -> Result<Stub> {
    let raw: StubRaw = serde_json::from_slice(bytes)?;
    resolve_stub(protocol, stub_envelope(raw)?)
}
