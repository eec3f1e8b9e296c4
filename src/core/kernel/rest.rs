use crate::core::errors::BittrexError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{instrument, trace};

/// One fully-built, signed request, consumed exactly once by a transport.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    /// Fully-qualified URL, query string included.
    pub url: String,
    /// Lowercase hex HMAC-SHA512 of `url`, sent as the `apisign` header.
    pub apisign: String,
    /// Optional JSON body forwarded verbatim. Kept for parity with the HTTP
    /// layer's signature; no current operation sends one.
    pub payload: Option<Value>,
}

impl SignedRequest {
    pub fn new(url: String, apisign: String) -> Self {
        Self {
            url,
            apisign,
            payload: None,
        }
    }
}

/// Suspending GET transport used by the async session.
///
/// Implementations must map underlying I/O failures (connection reset, peer
/// disconnect, timeout) into `BittrexError::Response` so both session
/// flavors present the same error surface.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: &SignedRequest) -> Result<Value, BittrexError>;
}

/// Blocking GET transport used by the blocking session.
pub trait BlockingTransport {
    fn get(&self, request: &SignedRequest) -> Result<Value, BittrexError>;
}

/// `Transport` implementation over a shared `reqwest::Client` pool.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an externally-configured client (timeouts, proxies).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(url = %request.url))]
    async fn get(&self, request: &SignedRequest) -> Result<Value, BittrexError> {
        let mut builder = self
            .client
            .get(&request.url)
            .header("apisign", &request.apisign);

        if let Some(payload) = &request.payload {
            builder = builder.json(payload);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        decode_body(&request.url, status, &body)
    }
}

/// `BlockingTransport` implementation over `reqwest::blocking::Client`.
#[derive(Debug, Default)]
pub struct ReqwestBlocking {
    client: reqwest::blocking::Client,
}

impl ReqwestBlocking {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl BlockingTransport for ReqwestBlocking {
    #[instrument(skip(self, request), fields(url = %request.url))]
    fn get(&self, request: &SignedRequest) -> Result<Value, BittrexError> {
        let mut builder = self
            .client
            .get(&request.url)
            .header("apisign", &request.apisign);

        if let Some(payload) = &request.payload {
            builder = builder.json(payload);
        }

        let response = builder.send()?;
        let status = response.status();
        let body = response.text()?;

        decode_body(&request.url, status, &body)
    }
}

fn decode_body(url: &str, status: StatusCode, body: &str) -> Result<Value, BittrexError> {
    trace!("response body: {}", body);

    if status != StatusCode::OK {
        return Err(BittrexError::Response(format!(
            "{} {}: {}",
            url,
            status.as_u16(),
            body
        )));
    }

    serde_json::from_str(body)
        .map_err(|e| BittrexError::Response(format!("{}: invalid JSON body: {}", url, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://bittrex.com/api/v1.1/public/getmarkets";

    #[test]
    fn ok_status_decodes_json() {
        let value = decode_body(URL, StatusCode::OK, r#"{"success": true}"#).unwrap();
        assert_eq!(value["success"], Value::Bool(true));
    }

    #[test]
    fn non_ok_status_carries_url_status_and_body() {
        let err = decode_body(URL, StatusCode::SERVICE_UNAVAILABLE, "down").unwrap_err();
        let message = err.to_string();
        assert!(message.contains(URL));
        assert!(message.contains("503"));
        assert!(message.contains("down"));
        assert!(matches!(err, BittrexError::Response(_)));
    }

    #[test]
    fn malformed_json_is_a_response_error() {
        let err = decode_body(URL, StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, BittrexError::Response(_)));
    }
}
