//! Randomness provider port
//!
//! The upstream provider hands out batches of decimal fractions over a
//! JSON-RPC endpoint and attaches an advisory delay that callers are
//! expected to honor before the next batch request. The HTTP adapter maps
//! transport failures, rejections, and unparseable payloads into coarse
//! error kinds; nothing here retries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("provider rejected request: {0}")]
    Rejected(String),

    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// One successful batch response.
#[derive(Debug, Clone)]
pub struct RandomBatch {
    /// Fractions in [0,1), in provider order.
    pub values: Vec<f64>,
    /// Advisory delay before the next batch request.
    pub advisory_delay: Duration,
}

/// Source of high-entropy decimal fractions.
#[async_trait]
pub trait RandomProvider: Send + Sync {
    async fn fetch(&self, count: usize, decimal_places: u8) -> Result<RandomBatch, ProviderError>;
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: RpcParams<'a>,
    id: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RpcParams<'a> {
    api_key: &'a str,
    n: usize,
    decimal_places: u8,
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<RpcResult>,
    error: Option<RpcError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcResult {
    random: RpcRandom,
    advisory_delay: u64,
}

#[derive(Deserialize)]
struct RpcRandom {
    data: Vec<f64>,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// Reqwest-backed adapter speaking the provider's JSON-RPC dialect.
pub struct HttpRandomProvider {
    client: reqwest::Client,
    url: String,
    api_key: String,
    request_id: AtomicU32,
}

impl HttpRandomProvider {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
            request_id: AtomicU32::new(1),
        })
    }
}

#[async_trait]
impl RandomProvider for HttpRandomProvider {
    async fn fetch(&self, count: usize, decimal_places: u8) -> Result<RandomBatch, ProviderError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            method: "generateDecimalFractions",
            params: RpcParams {
                api_key: &self.api_key,
                n: count,
                decimal_places,
            },
            id: self.request_id.fetch_add(1, Ordering::Relaxed),
        };

        debug!(count, decimal_places, "Requesting fraction batch");
        let response = self.client.post(&self.url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Provider returned non-success status");
            return Err(ProviderError::Status(status));
        }

        let body = response.bytes().await?;
        let parsed: RpcResponse = serde_json::from_slice(&body)
            .map_err(|e| ProviderError::Malformed(format!("invalid json-rpc body: {e}")))?;

        if let Some(error) = parsed.error {
            warn!(code = error.code, message = %error.message, "Provider rejected batch request");
            return Err(ProviderError::Rejected(error.message));
        }

        let result = parsed
            .result
            .ok_or_else(|| ProviderError::Malformed("missing result object".to_string()))?;

        Ok(RandomBatch {
            values: result.random.data,
            advisory_delay: Duration::from_millis(result.advisory_delay),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_request_shape() {
        let request = RpcRequest {
            jsonrpc: "2.0",
            method: "generateDecimalFractions",
            params: RpcParams {
                api_key: "k",
                n: 25,
                decimal_places: 14,
            },
            id: 7,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["method"], "generateDecimalFractions");
        assert_eq!(json["params"]["apiKey"], "k");
        assert_eq!(json["params"]["n"], 25);
        assert_eq!(json["params"]["decimalPlaces"], 14);
    }

    #[test]
    fn test_rpc_response_parses_result() {
        let body = r#"{
            "jsonrpc": "2.0",
            "result": {
                "random": { "data": [0.25, 0.75] },
                "advisoryDelay": 2000
            },
            "id": 1
        }"#;
        let parsed: RpcResponse = serde_json::from_slice(body.as_bytes()).unwrap();
        let result = parsed.result.unwrap();
        assert_eq!(result.random.data, vec![0.25, 0.75]);
        assert_eq!(result.advisory_delay, 2000);
    }

    #[test]
    fn test_rpc_response_parses_error() {
        let body = r#"{"jsonrpc":"2.0","error":{"code":402,"message":"quota exceeded"},"id":1}"#;
        let parsed: RpcResponse = serde_json::from_slice(body.as_bytes()).unwrap();
        assert!(parsed.result.is_none());
        assert_eq!(parsed.error.unwrap().message, "quota exceeded");
    }
}
