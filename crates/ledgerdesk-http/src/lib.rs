//! ledgerdesk-http
//!
//! [`ApiTransport`] over HTTP using a blocking `reqwest` client.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use uuid::Uuid;

use ledgerdesk_config::Config;
use ledgerdesk_core::{ApiRequest, ApiResponse, ApiTransport, CoreError, CoreResult, Method};

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> CoreResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ledgerdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| CoreError::Transport(format!("cannot build HTTP client: {}", err)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> CoreResult<Self> {
        Self::new(
            config.api_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn builder(&self, request: &ApiRequest) -> RequestBuilder {
        let url = self.url(&request.path);
        let builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Patch => self.client.patch(url),
            Method::Delete => self.client.delete(url),
        };
        let mut builder = builder
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        builder
    }
}

impl ApiTransport for HttpTransport {
    fn execute(&self, request: &ApiRequest) -> CoreResult<ApiResponse> {
        let request_id = Uuid::new_v4().to_string();
        let span = tracing::debug_span!(
            "http",
            request_id = %request_id,
            method = %request.method,
            path = %request.path
        );
        let _entered = span.enter();

        let response = self
            .builder(request)
            .header(REQUEST_ID_HEADER, &request_id)
            .send()
            .map_err(|err| {
                tracing::warn!(error = %err, "request did not complete");
                CoreError::Transport(describe(&err))
            })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .map_err(|err| CoreError::Transport(format!("cannot read response: {}", err)))?;
        tracing::debug!(status, bytes = text.len(), "response received");
        Ok(ApiResponse::new(status, parse_body(&text)))
    }
}

/// Empty bodies become `null`; bodies that are not JSON are kept as a string.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.trim().to_string()))
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "the server did not answer in time".into()
    } else if err.is_connect() {
        "cannot connect to the server".into()
    } else {
        err.to_string()
    }
}
