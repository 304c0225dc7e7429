//! HTTP transports behind the request gateway.
//!
//! Client-side (hydrate): `fetch` via `gloo-net`.
//! Native (`native-http`): `reqwest`.
//!
//! Transports only move bytes. Status interpretation, auth headers and error
//! normalization live in [`crate::net::api`].

use async_trait::async_trait;

use super::types::{OutboundRequest, RawResponse, TransportError};
#[cfg(any(feature = "hydrate", feature = "native-http"))]
use super::types::Method;

/// One HTTP exchange. An `Err` means no response was obtained.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, TransportError>;
}

// =============================================================================
// BROWSER
// =============================================================================

#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

#[cfg(feature = "hydrate")]
#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, TransportError> {
        use gloo_net::http::{Method as GlooMethod, RequestBuilder};

        let method = match request.method {
            Method::Get => GlooMethod::GET,
            Method::Post => GlooMethod::POST,
            Method::Put => GlooMethod::PUT,
            Method::Patch => GlooMethod::PATCH,
            Method::Delete => GlooMethod::DELETE,
        };
        let mut builder = RequestBuilder::new(&request.url).method(method);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        let prepared = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| TransportError(e.to_string()))?;

        let resp = prepared
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| TransportError(e.to_string()))?;
        Ok(RawResponse { status, body })
    }
}

// =============================================================================
// NATIVE
// =============================================================================

#[cfg(feature = "native-http")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

#[cfg(feature = "native-http")]
impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError(format!("HTTP client build failed: {e}")))?;
        Ok(Self { http })
    }
}

#[cfg(feature = "native-http")]
#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.http.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        Ok(RawResponse { status, body })
    }
}
