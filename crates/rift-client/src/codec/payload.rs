//! Raw deserialization types for protocol payloads.
//!
//! The wire shapes are looser than the model (multi-values as string or
//! array, `requestFrom` with a port, `statusCode` as number or string); each
//! raw type converts into its model type once parsed.

use super::values::{
    deserialize_present, deserialize_status_code, normalize_multi_values,
    parse_optional_request_from, AddressForm, OneOrMany,
};
use crate::error::Result;
use crate::model::{HttpRequest, HttpResponse, ResponseMode, TcpRequest, TcpResponse};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HttpRequestRaw {
    request_from: Option<String>,
    method: Option<String>,
    path: Option<String>,
    #[serde(default)]
    query: HashMap<String, OneOrMany>,
    #[serde(default)]
    headers: HashMap<String, OneOrMany>,
    #[serde(default, deserialize_with = "deserialize_present")]
    body: Option<Value>,
    timestamp: Option<String>,
}

impl HttpRequestRaw {
    pub(crate) fn into_request(self, form: AddressForm) -> Result<HttpRequest> {
        Ok(HttpRequest {
            request_from: parse_optional_request_from(self.request_from, form)?,
            method: self.method,
            path: self.path,
            query: normalize_multi_values(self.query),
            headers: normalize_multi_values(self.headers),
            body: self.body,
            timestamp: self.timestamp,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TcpRequestRaw {
    request_from: Option<String>,
    data: Option<String>,
}

impl TcpRequestRaw {
    pub(crate) fn into_request(self, form: AddressForm) -> Result<TcpRequest> {
        Ok(TcpRequest {
            request_from: parse_optional_request_from(self.request_from, form)?,
            data: self.data,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HttpResponseRaw {
    #[serde(default, deserialize_with = "deserialize_status_code")]
    status_code: Option<u16>,
    #[serde(default)]
    headers: HashMap<String, OneOrMany>,
    #[serde(default, deserialize_with = "deserialize_present")]
    body: Option<Value>,
    #[serde(rename = "_mode")]
    mode: Option<ResponseMode>,
}

impl From<HttpResponseRaw> for HttpResponse {
    fn from(raw: HttpResponseRaw) -> Self {
        HttpResponse {
            status_code: raw.status_code,
            headers: normalize_multi_values(raw.headers),
            body: raw.body,
            mode: raw.mode,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TcpResponseRaw {
    #[serde(default)]
    data: String,
}

impl From<TcpResponseRaw> for TcpResponse {
    fn from(raw: TcpResponseRaw) -> Self {
        TcpResponse { data: raw.data }
    }
}
