//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every client
//! method over real HTTP. The mock echoes back the decoded query
//! parameters and raw key order, which is what lets these tests check
//! the outgoing-request invariants (one token, one platform, one
//! version) as the server actually received them.

use std::net::SocketAddr;

use coreapi_core::{ApiError, CoreapiClient};
use serde_json::json;

/// Boot the mock server on a random port and return its address.
fn start_mock() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

/// An address nothing is listening on: bind, read the port, drop.
fn refused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

fn client_for(addr: SocketAddr) -> CoreapiClient {
    CoreapiClient::with_base_url("test-token", &format!("http://{addr}/api"))
}

#[test]
fn account_info_round_trip() {
    let addr = start_mock();
    let value = client_for(addr)
        .account_info("user@example.com", "hunter2")
        .unwrap();

    assert_eq!(value["status"], "ok");
    assert_eq!(value["account"]["email"], "user@example.com");

    // The server-side view of the query: credentials plus the three
    // parameters the client always adds, each exactly once.
    assert_eq!(value["params"]["email"], "user@example.com");
    assert_eq!(value["params"]["password"], "hunter2");
    assert_eq!(value["params"]["token"], "test-token");
    assert_eq!(value["params"]["platform"], "rust");
    assert_eq!(value["params"]["version"], env!("CARGO_PKG_VERSION"));

    let keys = value["keys"].as_array().unwrap();
    for key in ["token", "platform", "version"] {
        let count = keys.iter().filter(|k| *k == key).count();
        assert_eq!(count, 1, "expected exactly one {key} parameter");
    }
}

#[test]
fn user_geo_filters_scopes_over_the_wire() {
    let addr = start_mock();
    let value = client_for(addr)
        .user_geo("1.2.3.4", &["city", "bogus", "country"])
        .unwrap();

    assert_eq!(value["status"], "ok");
    assert_eq!(value["params"]["scope"], "city,country");
    assert_eq!(value["params"]["ip"], "1.2.3.4");
    assert_eq!(value["city"], "Amsterdam");
    assert_eq!(value["country"], "Netherlands");
    assert!(value.get("currency").is_none());
}

#[test]
fn user_geo_with_no_valid_scopes_requests_all() {
    let addr = start_mock();
    let value = client_for(addr).user_geo("1.2.3.4", &[]).unwrap();

    assert_eq!(value["params"]["scope"], "all");
    assert_eq!(value["city"], "Amsterdam");
    assert_eq!(value["currency"], "EUR");
    assert_eq!(value["latitude"], 52.3728);
}

#[test]
fn email_info_round_trip() {
    let addr = start_mock();
    let value = client_for(addr).email_info("user@example.com").unwrap();

    assert_eq!(value["status"], "ok");
    assert_eq!(value["valid"], true);
    assert_eq!(value["params"]["email"], "user@example.com");
}

#[test]
fn send_sms_auth_with_six_character_code_reaches_the_server() {
    let addr = start_mock();
    let value = client_for(addr)
        .send_sms_auth("31612345678", "123456", "en")
        .unwrap();

    assert_eq!(value["status"], "ok");
    assert_eq!(value["message"], "Code sent");
    assert_eq!(value["params"]["code"], "123456");
    assert_eq!(value["params"]["language"], "en");
}

#[test]
fn phone_info_round_trip() {
    let addr = start_mock();
    let value = client_for(addr).phone_info("31612345678").unwrap();

    assert_eq!(value["status"], "ok");
    assert_eq!(value["carrier"], "KPN");
    assert_eq!(value["params"]["phone"], "31612345678");
}

#[test]
fn remote_error_body_passes_through_unchanged() {
    let addr = start_mock();
    let client = CoreapiClient::with_base_url("expired", &format!("http://{addr}/api"));
    let value = client.phone_info("31612345678").unwrap();

    assert_eq!(value, json!({ "status": "error", "message": "Invalid token" }));
}

#[test]
fn non_200_response_becomes_request_error() {
    let addr = start_mock();
    let client = CoreapiClient::with_base_url("test-token", &format!("http://{addr}/wrong"));
    let value = client.account_info("a@b.c", "pw").unwrap();

    assert_eq!(value, json!({ "status": "error", "message": "Request error" }));
}

#[test]
fn connection_failure_is_a_transport_error() {
    let addr = refused_addr();
    let client = client_for(addr);
    let err = client.email_info("a@b.c").unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
}

#[test]
fn empty_token_never_touches_the_network() {
    // Pointing at a dead address proves the short-circuit: any network
    // attempt would surface as a transport error instead.
    let addr = refused_addr();
    let client = CoreapiClient::with_base_url("", &format!("http://{addr}/api"));
    let value = client.account_info("a@b.c", "pw").unwrap();

    assert_eq!(value, json!({ "status": "error", "message": "Token not set" }));
}
