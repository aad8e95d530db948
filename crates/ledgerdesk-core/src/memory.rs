//! In-process implementations of the session and transport seams.
//!
//! `MemorySessionStore` backs one-shot shells that should not touch disk;
//! `ScriptedTransport` replays canned responses and records what was sent.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::error::{CoreError, CoreResult};
use crate::session::SessionStore;
use crate::transport::{ApiRequest, ApiResponse, ApiTransport, Method};

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    fn lock(&self) -> CoreResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|_| CoreError::Session("session store lock poisoned".into()))
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Canned-response transport keyed by method and path.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<ApiResponse>>>,
    sent: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response. The last response queued for a route is reused once
    /// the queue would otherwise run dry.
    pub fn respond(&self, method: Method, path: &str, response: ApiResponse) -> &Self {
        if let Ok(mut routes) = self.routes.lock() {
            routes
                .entry((method, path.to_string()))
                .or_default()
                .push_back(response);
        }
        self
    }

    pub fn sent(&self) -> Vec<ApiRequest> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    pub fn sent_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.sent()
            .into_iter()
            .filter(|request| request.method == method && request.path == path)
            .collect()
    }
}

impl ApiTransport for ScriptedTransport {
    fn execute(&self, request: &ApiRequest) -> CoreResult<ApiResponse> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(request.clone());
        }
        let mut routes = self
            .routes
            .lock()
            .map_err(|_| CoreError::Transport("scripted transport lock poisoned".into()))?;
        let queue = routes
            .get_mut(&(request.method, request.path.clone()))
            .ok_or_else(|| {
                CoreError::Transport(format!("no route for {} {}", request.method, request.path))
            })?;
        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        response.ok_or_else(|| {
            CoreError::Transport(format!("no response for {} {}", request.method, request.path))
        })
    }
}

