//! Pass two of imposter decoding: turn deferred leaves into typed payloads.
//!
//! The protocol is validated before any leaf is touched, so an unknown
//! protocol never produces a partially resolved imposter.

use super::envelope::{Deferred, ImposterEnvelope};
use super::payload::{HttpRequestRaw, HttpResponseRaw, TcpRequestRaw, TcpResponseRaw};
use super::values::AddressForm;
use crate::error::Result;
use crate::model::{
    HttpResponse, Imposter, Protocol, RequestPayload, ResponsePayload, Stub, TcpResponse,
};
use tracing::trace;

/// Resolve every deferred leaf of `envelope` against its protocol.
pub fn resolve_payloads(envelope: ImposterEnvelope) -> Result<Imposter> {
    let protocol: Protocol = envelope.protocol.parse()?;
    trace!(
        "resolving payloads of imposter {} as {}",
        envelope.port,
        protocol
    );

    let stubs = envelope
        .stubs
        .into_iter()
        .map(|stub| resolve_stub(protocol, stub))
        .collect::<Result<Vec<_>>>()?;
    let requests = envelope
        .requests
        .into_iter()
        .map(|raw| decode_request(protocol, raw, AddressForm::Socket))
        .collect::<Result<Vec<_>>>()?;
    let default_response = envelope
        .default_response
        .map(|raw| decode_response(protocol, raw))
        .transpose()?;

    Ok(Imposter {
        protocol,
        port: envelope.port,
        name: envelope.name,
        record_requests: envelope.record_requests,
        allow_cors: envelope.allow_cors,
        request_count: envelope.request_count,
        default_response,
        stubs,
        requests,
    })
}

/// Resolve one stub, including predicates nested under `and`/`or`/`not`.
pub fn resolve_stub(protocol: Protocol, stub: Stub<Deferred, Deferred>) -> Result<Stub> {
    stub.try_map(
        &mut |raw| decode_request(protocol, raw, AddressForm::Host),
        &mut |raw| decode_response(protocol, raw),
    )
}

/// Decode a request leaf. Recorded requests carry the server's
/// `address:port` socket name, predicate leaves a client-written host.
pub(crate) fn decode_request(
    protocol: Protocol,
    raw: Deferred,
    form: AddressForm,
) -> Result<RequestPayload> {
    let value = raw.into_value();
    Ok(match protocol {
        Protocol::Http => {
            let raw: HttpRequestRaw = serde_json::from_value(value)?;
            RequestPayload::Http(raw.into_request(form)?)
        }
        Protocol::Tcp => {
            let raw: TcpRequestRaw = serde_json::from_value(value)?;
            RequestPayload::Tcp(raw.into_request(form)?)
        }
    })
}

pub(crate) fn decode_response(protocol: Protocol, raw: Deferred) -> Result<ResponsePayload> {
    let value = raw.into_value();
    Ok(match protocol {
        Protocol::Http => {
            let raw: HttpResponseRaw = serde_json::from_value(value)?;
            ResponsePayload::Http(HttpResponse::from(raw))
        }
        Protocol::Tcp => {
            let raw: TcpResponseRaw = serde_json::from_value(value)?;
            ResponsePayload::Tcp(TcpResponse::from(raw))
        }
    })
}
