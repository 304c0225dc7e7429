//! Request gateway: authenticated REST calls against the configured API.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every outbound call goes through [`RequestGateway::request`]. The bearer
//! token is read from durable storage at call time rather than from the
//! session store's in-memory copy, so a token written by any code path is
//! honored and the gateway works even when built before the session store.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures become [`GatewayError::Network`]. Non-2xx responses
//! become [`GatewayError::Server`] carrying the server's `detail` message when
//! one can be extracted, else a status-derived message. A body that fails to
//! parse never hides the status failure.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::transport::Transport;
use super::types::{GatewayError, OutboundRequest, RawResponse, RequestOptions, ResponseBody};
use crate::util::storage::{DurableStore, TOKEN_KEY};

const NO_CONTENT: u16 = 204;
const DEFAULT_CONTENT_TYPE: &str = "application/json";

pub struct RequestGateway {
    base_url: String,
    storage: Rc<dyn DurableStore>,
    transport: Rc<dyn Transport>,
}

impl RequestGateway {
    pub fn new(base_url: impl Into<String>, storage: Rc<dyn DurableStore>, transport: Rc<dyn Transport>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { base_url, storage, transport }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a usable token is currently persisted.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.bearer_token().is_some()
    }

    /// Absolute URL for `path`. Paths that are already absolute pass through.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Perform one request and normalize the outcome.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Network`] when no response was obtained.
    /// - [`GatewayError::Server`] for non-2xx statuses.
    /// - [`GatewayError::Decode`] when a 2xx body is not valid JSON.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<ResponseBody, GatewayError> {
        let request = self.build_request(path, options);
        log::debug!("{} {}", request.method, request.url);

        let method = request.method;
        let url = request.url.clone();
        let response = self.transport.send(request).await.map_err(|e| {
            log::warn!("{method} {url} unreachable: {e}");
            GatewayError::Network(e.0)
        })?;

        interpret_response(response).inspect_err(|e| {
            if let Some(status) = e.status() {
                log::warn!("{method} {url} failed with {status}: {e}");
            }
        })
    }

    /// [`RequestGateway::request`] decoded into `T`. `NoContent` decodes from
    /// JSON `null`, so `()` and `Option<_>` targets accept it.
    ///
    /// # Errors
    ///
    /// Same as [`RequestGateway::request`], plus [`GatewayError::Decode`] when
    /// the body does not match `T`.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, GatewayError> {
        let value = match self.request(path, options).await? {
            ResponseBody::NoContent => Value::Null,
            ResponseBody::Json(value) => value,
        };
        serde_json::from_value(value).map_err(|e| GatewayError::Decode(e.to_string()))
    }

    fn bearer_token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).filter(|token| !token.is_empty())
    }

    fn build_request(&self, path: &str, options: RequestOptions) -> OutboundRequest {
        let mut headers = vec![("Content-Type".to_owned(), DEFAULT_CONTENT_TYPE.to_owned())];
        if let Some(token) = self.bearer_token() {
            headers.push(("Authorization".to_owned(), format!("Bearer {token}")));
        }
        for (name, value) in options.headers {
            merge_header(&mut headers, name, value);
        }
        OutboundRequest { method: options.method, url: self.endpoint(path), headers, body: options.body }
    }
}

/// Replace a header with the same case-insensitive name, or append it.
fn merge_header(headers: &mut Vec<(String, String)>, name: String, value: String) {
    match headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
        Some(existing) => *existing = (name, value),
        None => headers.push((name, value)),
    }
}

fn interpret_response(response: RawResponse) -> Result<ResponseBody, GatewayError> {
    let RawResponse { status, body } = response;
    if status == NO_CONTENT {
        return Ok(ResponseBody::NoContent);
    }
    if (200..300).contains(&status) {
        return serde_json::from_str(&body)
            .map(ResponseBody::Json)
            .map_err(|e| GatewayError::Decode(e.to_string()));
    }
    Err(GatewayError::Server { status, message: error_message(status, &body) })
}

/// Best human-readable message for a failed response.
///
/// Order: string `detail`, FastAPI validation `detail[].msg`, `message`,
/// then a status-derived fallback.
fn error_message(status: u16, body: &str) -> String {
    let payload = match serde_json::from_str::<Value>(body) {
        Ok(payload) => payload,
        Err(e) => {
            if !body.trim().is_empty() {
                log::debug!("error body for status {status} is not JSON: {e}");
            }
            return status_message(status);
        }
    };
    detail_message(&payload)
        .or_else(|| payload.get("message").and_then(Value::as_str).map(str::to_owned))
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| status_message(status))
}

fn detail_message(payload: &Value) -> Option<String> {
    match payload.get("detail")? {
        Value::String(detail) => Some(detail.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

fn status_message(status: u16) -> String {
    format!("Request failed with status {status}")
}
