//! Reqwest-backed name predictor adapter.
//!
//! This adapter owns transport details only: the bearer-authenticated GET,
//! per-call timeout, bounded body reading, HTTP error mapping and JSON
//! decoding into domain predictions. It never retries.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};

use super::dto::PredictionDto;
use crate::domain::ports::{NamePredictor, PredictionError};

/// Largest response body read from a predictor.
pub const MAX_BODY_BYTES: usize = 1 << 20;

/// Where a predictor lives and how to authenticate against it.
#[derive(Debug, Clone)]
pub struct PredictorEndpoint {
    pub url: Url,
    pub api_token: String,
}

/// Predictor issuing `GET <url>?name=<name>` and decoding the body as `D`.
pub struct HttpNamePredictor<D> {
    client: Client,
    endpoint: PredictorEndpoint,
    _dto: PhantomData<fn() -> D>,
}

impl<D> HttpNamePredictor<D> {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: PredictorEndpoint, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Build an adapter sharing an existing client and its connection pool.
    pub fn with_client(client: Client, endpoint: PredictorEndpoint) -> Self {
        Self {
            client,
            endpoint,
            _dto: PhantomData,
        }
    }
}

#[async_trait]
impl<D> NamePredictor<D::Prediction> for HttpNamePredictor<D>
where
    D: PredictionDto + 'static,
{
    async fn predict(&self, name: &str) -> Result<D::Prediction, PredictionError> {
        let response = self
            .client
            .get(self.endpoint.url.clone())
            .query(&[("name", name)])
            .bearer_auth(&self.endpoint.api_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = read_capped(response, MAX_BODY_BYTES)
            .await
            .map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, &body.bytes));
        }
        if body.truncated {
            return Err(PredictionError::decode(format!(
                "response body exceeds {MAX_BODY_BYTES} bytes"
            )));
        }

        decode::<D>(&body.bytes)
    }
}

struct CappedBody {
    bytes: Vec<u8>,
    truncated: bool,
}

async fn read_capped(mut response: Response, limit: usize) -> Result<CappedBody, reqwest::Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let remaining = limit.saturating_sub(bytes.len());
        if chunk.len() > remaining {
            bytes.extend_from_slice(&chunk[..remaining]);
            return Ok(CappedBody {
                bytes,
                truncated: true,
            });
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(CappedBody {
        bytes,
        truncated: false,
    })
}

fn decode<D: PredictionDto>(body: &[u8]) -> Result<D::Prediction, PredictionError> {
    let decoded: D = serde_json::from_slice(body).map_err(|error| {
        PredictionError::decode(format!("invalid predictor JSON payload: {error}"))
    })?;
    decoded.into_prediction()
}

fn map_transport_error(error: reqwest::Error) -> PredictionError {
    if error.is_timeout() {
        PredictionError::transport(format!("timed out: {error}"))
    } else {
        PredictionError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PredictionError {
    PredictionError::remote_rejected(status.as_u16(), body_preview(body))
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
