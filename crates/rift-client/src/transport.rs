//! JSON-over-HTTP plumbing for the Admin API.
//!
//! Builds requests against the configured base URL, runs exactly one
//! network call per invocation under a [`Context`], and reads the whole body
//! before returning so the connection can be reused.

use crate::context::Context;
use crate::error::{Error, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Request, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

const APPLICATION_JSON: &str = "application/json";

/// Status and fully-read body of an Admin API response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Error response from API
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    base_url: Url,
}

impl Transport {
    pub fn new(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a request for `path` relative to the base URL.
    ///
    /// `Accept: application/json` is always set; `Content-Type` only when
    /// there is a body.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        query: &[(&str, String)],
    ) -> Result<Request> {
        let url = self.url(path, query);
        let mut builder = self.http.request(method, url).header(ACCEPT, APPLICATION_JSON);
        if let Some(body) = body {
            builder = builder.header(CONTENT_TYPE, APPLICATION_JSON).body(body);
        }
        Ok(builder.build()?)
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!("{}{}", self.base_url.path().trim_end_matches('/'), path);
        url.set_path(&joined);
        url.set_query(None);
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        url
    }

    /// Send `request` and read the whole body, bounded by `ctx`.
    pub async fn execute(&self, ctx: &Context, request: Request) -> Result<RawResponse> {
        let method = request.method().clone();
        let url = request.url().clone();
        debug!("{} {}", method, url);

        ctx.run(async {
            let response = self.http.execute(request).await?;
            let status = response.status();
            let body = response.bytes().await?.to_vec();
            debug!("{} {} -> {} ({} bytes)", method, url, status, body.len());
            Ok::<_, Error>(RawResponse { status, body })
        })
        .await
    }

    /// Send `request`; decode the body with `decode` when the status is
    /// `expected`, otherwise decode it as an error envelope.
    pub async fn call<T, F>(
        &self,
        ctx: &Context,
        request: Request,
        expected: StatusCode,
        decode: F,
    ) -> Result<T>
    where
        F: FnOnce(&[u8]) -> Result<T>,
    {
        let response = self.execute(ctx, request).await?;
        if response.status == expected {
            decode(&response.body)
        } else {
            Err(decode_error(response.status, &response.body))
        }
    }
}

/// Turn an error envelope into [`Error::Server`], keeping only the first entry.
pub(crate) fn decode_error(status: StatusCode, body: &[u8]) -> Error {
    let envelope: ErrorEnvelope = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(e) => return Error::Json(e),
    };
    match envelope.errors.into_iter().next() {
        Some(detail) => Error::Server {
            status: status.as_u16(),
            code: detail.code,
            message: detail.message,
        },
        None => Error::EmptyErrorEnvelope {
            status: status.as_u16(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> Transport {
        Transport::new(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn test_request_headers_for_body_methods() {
        let t = transport("http://localhost:2525");
        for method in [Method::POST, Method::PUT] {
            let req = t.request(method, "/imposters", Some(b"{}".to_vec()), &[]).unwrap();
            assert_eq!(req.headers()[ACCEPT], APPLICATION_JSON);
            assert_eq!(req.headers()[CONTENT_TYPE], APPLICATION_JSON);
            assert!(req.body().is_some());
        }
    }

    #[test]
    fn test_request_headers_without_body() {
        let t = transport("http://localhost:2525");
        for method in [Method::GET, Method::DELETE, Method::POST, Method::PUT] {
            let req = t.request(method, "/imposters", None, &[]).unwrap();
            assert_eq!(req.headers()[ACCEPT], APPLICATION_JSON);
            assert!(req.headers().get(CONTENT_TYPE).is_none());
            assert!(req.body().is_none());
        }
    }

    #[test]
    fn test_url_join_and_query() {
        let t = transport("http://localhost:2525");
        let req = t
            .request(
                Method::GET,
                "/imposters/8080",
                None,
                &[("replayable", "true".to_string())],
            )
            .unwrap();
        assert_eq!(
            req.url().as_str(),
            "http://localhost:2525/imposters/8080?replayable=true"
        );

        let req = t.request(Method::GET, "/config", None, &[]).unwrap();
        assert_eq!(req.url().query(), None);
    }

    #[test]
    fn test_url_keeps_base_path_prefix() {
        let t = transport("http://gateway/mb/");
        let req = t.request(Method::GET, "/logs", None, &[]).unwrap();
        assert_eq!(req.url().as_str(), "http://gateway/mb/logs");
    }

    #[test]
    fn test_decode_error_first_entry_only() {
        let body = br#"{"errors":[
            {"code":"bad data","message":"invalid value for 'port'"},
            {"code":"other","message":"ignored"}
        ]}"#;
        let err = decode_error(StatusCode::BAD_REQUEST, body);
        assert_eq!(err.to_string(), "bad data: invalid value for 'port'");
        assert!(matches!(err, Error::Server { status: 400, .. }));
    }

    #[test]
    fn test_decode_error_empty_list() {
        let err = decode_error(StatusCode::INTERNAL_SERVER_ERROR, br#"{"errors":[]}"#);
        assert!(matches!(err, Error::EmptyErrorEnvelope { status: 500 }));
        let err = decode_error(StatusCode::INTERNAL_SERVER_ERROR, b"{}");
        assert!(matches!(err, Error::EmptyErrorEnvelope { status: 500 }));
    }

    #[test]
    fn test_decode_error_not_json() {
        let err = decode_error(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>");
        assert!(matches!(err, Error::Json(_)));
    }
}
