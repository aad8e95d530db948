//! Request/response shapes and the transport seam behind every API call.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A JSON request against the API, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn with_optional_query<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with_query(key, value),
            None => self,
        }
    }

    pub fn with_json<B: serde::Serialize>(mut self, body: &B) -> CoreResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes requests. The HTTP implementation lives in `ledgerdesk-http`.
pub trait ApiTransport: Send + Sync {
    fn execute(&self, request: &ApiRequest) -> CoreResult<ApiResponse>;
}

impl<T: ApiTransport + ?Sized> ApiTransport for Box<T> {
    fn execute(&self, request: &ApiRequest) -> CoreResult<ApiResponse> {
        (**self).execute(request)
    }
}

/// `{ data, error }` outcome of a call; exactly one side is set.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult<T> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: DeserializeOwned> FetchResult<T> {
    pub fn from_response(response: ApiResponse) -> Self {
        let flagged_failure = response.body.get("success") == Some(&Value::Bool(false));
        if !response.is_success() || flagged_failure {
            let message = error_message(&response.body);
            let error = match message {
                Some(message) => ApiError::new(Some(response.status), message),
                None => ApiError::generic(Some(response.status)),
            };
            return Self::failure(error);
        }
        match serde_json::from_value(payload(response.body)) {
            Ok(data) => Self {
                data: Some(data),
                error: None,
            },
            Err(err) => {
                tracing::warn!(error = %err, "unexpected response shape");
                Self::failure(ApiError::generic(Some(response.status)))
            }
        }
    }
}

impl<T> FetchResult<T> {
    pub fn failure(error: ApiError) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }

    pub fn into_result(self) -> CoreResult<T> {
        match (self.data, self.error) {
            (_, Some(error)) => Err(match error.status {
                Some(401) => CoreError::Unauthenticated,
                Some(403) => CoreError::Forbidden(error.message),
                Some(404) => CoreError::NotFound(error.message),
                _ => CoreError::Api(error),
            }),
            (Some(data), None) => Ok(data),
            (None, None) => Err(CoreError::Api(ApiError::generic(None))),
        }
    }
}

/// Pulls the server-provided message out of an error body.
pub fn error_message(body: &Value) -> Option<String> {
    let candidates = [
        body.get("message"),
        body.get("error").filter(|value| value.is_string()),
        body.get("error").and_then(|error| error.get("message")),
        body.get("errors")
            .and_then(|errors| errors.get(0))
            .and_then(|first| first.get("message")),
    ];
    candidates
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(str::to_string)
        .or_else(|| body.as_str().map(str::to_string).filter(|s| !s.trim().is_empty()))
}

/// Unwraps a `{ "data": ... }` envelope when present.
fn payload(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}
