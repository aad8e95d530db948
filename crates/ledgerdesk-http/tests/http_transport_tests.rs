use std::time::Duration;

use ledgerdesk_core::memory::MemorySessionStore;
use ledgerdesk_core::{ApiRequest, ApiTransport, CoreError, ErpApi, FetchResult, Method};
use ledgerdesk_http::HttpTransport;
use mockito::Matcher;
use serde_json::{json, Value};

fn transport(server: &mockito::Server) -> HttpTransport {
    HttpTransport::new(server.url(), Duration::from_secs(5)).expect("transport")
}

#[test]
fn sends_bearer_query_and_request_id() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/chart-of-accounts/get-all-coa")
        .match_header("authorization", "Bearer tok-1")
        .match_header("x-request-id", Matcher::Regex("^[0-9a-f-]{36}$".into()))
        .match_query(Matcher::UrlEncoded("companyId".into(), "4".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":[]}"#)
        .create();

    let request = ApiRequest::get("/api/chart-of-accounts/get-all-coa")
        .with_query("companyId", 4)
        .with_bearer("tok-1");
    let response = transport(&server).execute(&request).expect("response");

    mock.assert();
    assert_eq!(response.status, 200);
    assert_eq!(response.body, json!({ "data": [] }));
}

#[test]
fn posts_json_body() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/journal/reverseEntry")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({ "voucherId": 7, "reason": "duplicate" })))
        .with_status(201)
        .with_body(r#"{"success":true}"#)
        .create();

    let request = ApiRequest::post("/api/journal/reverseEntry")
        .with_json(&json!({ "voucherId": 7, "reason": "duplicate", "reversalDate": "2024-05-01" }))
        .expect("json");
    let response = transport(&server).execute(&request).expect("response");

    mock.assert();
    assert_eq!(response.status, 201);
}

#[test]
fn error_body_message_reaches_the_caller() {
    let mut server = mockito::Server::new();
    server
        .mock("PATCH", "/api/number-series/3")
        .with_status(409)
        .with_body(r#"{"message":"Series already used"}"#)
        .create();

    let request = ApiRequest::new(Method::Patch, "/api/number-series/3");
    let response = transport(&server).execute(&request).expect("response");
    let result: FetchResult<Value> = FetchResult::from_response(response);
    assert_eq!(result.error.expect("error").message, "Series already used");
}

#[test]
fn html_error_page_falls_back_to_its_text() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/dashboard/fundPosition")
        .with_status(502)
        .with_body("Bad Gateway")
        .create();

    let response = transport(&server)
        .execute(&ApiRequest::get("/api/dashboard/fundPosition"))
        .expect("response");
    assert_eq!(response.status, 502);
    assert_eq!(response.body, Value::String("Bad Gateway".into()));
}

#[test]
fn unreachable_server_is_a_transport_error() {
    let transport = HttpTransport::new("http://127.0.0.1:9", Duration::from_secs(2)).expect("transport");
    let err = transport
        .execute(&ApiRequest::get("/api/company/get-all-companies"))
        .unwrap_err();
    assert!(matches!(err, CoreError::Transport(_)));
}

#[test]
fn login_through_http_populates_session() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/api/auth/login")
        .match_body(Matcher::PartialJson(json!({ "email": "kim@example.com" })))
        .with_status(200)
        .with_body(
            json!({
                "token": "jwt-abc",
                "user": {
                    "id": 9,
                    "name": "Kim",
                    "companies": [{ "id": 1, "name": "Acme", "locations": [] }],
                    "voucherTypes": ["JOURNAL"]
                }
            })
            .to_string(),
        )
        .create();

    let api = ErpApi::new(transport(&server), MemorySessionStore::default());
    let user = api.login("kim@example.com", "pw").expect("login");
    assert_eq!(user.name, "Kim");
    assert!(api.session().is_signed_in().expect("signed in"));
}
