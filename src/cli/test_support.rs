//! Shell contexts wired to canned API responses for command tests.

use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;

use ledgerdesk_config::{Config, ConfigManager};
use ledgerdesk_core::memory::{MemorySessionStore, ScriptedTransport};
use ledgerdesk_core::{
    ApiRequest, ApiResponse, ApiTransport, CoreResult, ErpApi, Method, SessionStore,
    AUTH_TOKEN_KEY, CURRENT_USER_KEY,
};

use crate::cli::core::{CliMode, ShellContext};

/// Lets a test keep a handle on the transport the context owns.
pub(crate) struct SharedTransport(pub Arc<ScriptedTransport>);

impl ApiTransport for SharedTransport {
    fn execute(&self, request: &ApiRequest) -> CoreResult<ApiResponse> {
        self.0.execute(request)
    }
}

pub(crate) struct Fixture {
    pub transport: Arc<ScriptedTransport>,
    pub dir: TempDir,
}

impl Fixture {
    pub fn respond(&self, method: Method, path: &str, body: Value) -> &Self {
        self.transport.respond(method, path, ApiResponse::ok(body));
        self
    }

    pub fn sent_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.transport.sent_to(method, path)
    }
}

pub(crate) fn user_json() -> Value {
    json!({
        "id": 42,
        "name": "Dana",
        "email": "dana@example.com",
        "companies": [
            { "id": 1, "name": "Acme", "locations": [{ "id": 10, "name": "HQ" }] },
            { "id": 2, "name": "Beta", "locations": [
                { "id": 20, "name": "North" },
                { "id": 21, "name": "South" }
            ] }
        ],
        "voucherTypes": ["JOURNAL", "CASH"]
    })
}

fn context(signed_in: bool) -> (ShellContext, Fixture) {
    let dir = tempfile::tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().join("config")).expect("config manager");
    let transport = Arc::new(ScriptedTransport::new());

    let store = MemorySessionStore::default();
    if signed_in {
        store.set(AUTH_TOKEN_KEY, "tok-test").expect("token");
        store
            .set(CURRENT_USER_KEY, &user_json().to_string())
            .expect("user");
    }

    let transport_box: Box<dyn ApiTransport> = Box::new(SharedTransport(Arc::clone(&transport)));
    let store_box: Box<dyn SessionStore> = Box::new(store);
    let context = ShellContext::with_api(
        CliMode::Script,
        ErpApi::new(transport_box, store_box),
        manager,
        Config::default(),
    );
    (context, Fixture { transport, dir })
}

pub(crate) fn signed_in_context() -> (ShellContext, Fixture) {
    context(true)
}

pub(crate) fn signed_out_context() -> (ShellContext, Fixture) {
    context(false)
}
