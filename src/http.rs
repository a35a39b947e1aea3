//! HTTP layer used by the API client and the transfer steps.
//!
//! [`Transport`] is the seam between request orchestration and the network;
//! [`HttpClient`] is the reqwest-backed implementation.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Body, Client};
use reqwest::multipart::{Form, Part};

use crate::error::{ClientError, Result};

/// Network operations needed by the client.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON body and return the response body as text.
    async fn post_json(&self, url: &str, body: &str) -> Result<String>;

    /// POST `data` as a single multipart file field and return the response body.
    async fn post_multipart(
        &self,
        url: &str,
        field: &str,
        file_name: &str,
        data: Bytes,
    ) -> Result<String>;

    /// GET `url` and return the raw body.
    async fn get_bytes(&self, url: &str) -> Result<Bytes>;
}

/// HTTP client for making requests to the gateway and transfer endpoints.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Option<Duration>,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            timeout: None,
        }
    }

    /// Create a client with an optional proxy and per-request timeout.
    pub fn with_options(proxy: Option<&str>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(proxy) = proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| ClientError::ConfigError(format!("Invalid proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::ConfigError(format!("Failed to build client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    fn apply_timeout(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = self.apply_timeout(request).send().await.map_err(map_send_error)?;

        if !response.status().is_success() {
            return Err(ClientError::HttpError(response.status().as_u16()));
        }

        Ok(response)
    }
}

/// Multipart file part over `data` without copying it.
fn file_part(file_name: &str, data: Bytes) -> Part {
    let len = data.len() as u64;
    Part::stream_with_length(Body::from(data), len).file_name(file_name.to_string())
}

fn map_send_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::TimeoutError
    } else {
        ClientError::ConnectivityError(err)
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn post_json(&self, url: &str, body: &str) -> Result<String> {
        let response = self
            .send(
                self.client
                    .post(url)
                    .header("Content-Type", "application/json")
                    .body(body.to_string()),
            )
            .await?;

        response.text().await.map_err(map_send_error)
    }

    async fn post_multipart(
        &self,
        url: &str,
        field: &str,
        file_name: &str,
        data: Bytes,
    ) -> Result<String> {
        let form = Form::new().part(field.to_string(), file_part(file_name, data));

        let response = self.send(self.client.post(url).multipart(form)).await?;
        response.text().await.map_err(map_send_error)
    }

    async fn get_bytes(&self, url: &str) -> Result<Bytes> {
        let response = self.send(self.client.get(url)).await?;
        response.bytes().await.map_err(map_send_error)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
