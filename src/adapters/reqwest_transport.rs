//! Production transport adapter over HTTP.
//!
//! Posts the stream request with a bearer credential and hands the raw
//! response body back as a byte stream; all decoding and framing happens
//! downstream in the pipeline.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::Deserialize;

use crate::models::StreamRequest;
use crate::traits::transport::{ByteStream, StreamTransport, TransportError};

/// Session-creation response body.
#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
}

/// Streaming backend reached over HTTP.
pub struct ReqwestTransport {
    base_url: String,
    api_key: String,
    client: Client,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: Client::new(),
        }
    }

    async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(TransportError::Status { status, message })
    }
}

#[async_trait]
impl StreamTransport for ReqwestTransport {
    async fn create_session(&self) -> Result<String, TransportError> {
        let url = format!("{}/api/sessions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| TransportError::SessionCreate(e.to_string()))?;

        let response = Self::error_for_status(response).await?;
        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| TransportError::SessionCreate(e.to_string()))?;
        Ok(session.id)
    }

    async fn open_stream(&self, request: &StreamRequest) -> Result<ByteStream, TransportError> {
        let url = format!("{}/api/chat/stream", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("Accept", "text/event-stream")
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        let response = Self::error_for_status(response).await?;
        let stream = response
            .bytes_stream()
            .map(|item| item.map_err(|e| TransportError::Read(e.to_string())));
        Ok(Box::pin(stream))
    }
}
