//! In-process stand-in for the coreapi.tech API, used by the core
//! crate's integration tests. Handlers are stateless: each decodes the
//! query string, answers with a canned payload, and echoes the decoded
//! parameters (`params`) plus the raw key order (`keys`) so tests can
//! assert on exactly what the client sent.

use axum::{extract::Query, routing::get, Json, Router};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;

/// Query pairs as received, duplicates and order preserved.
type QueryPairs = Vec<(String, String)>;

pub fn app() -> Router {
    Router::new()
        .route("/api/v1/account/info", get(account_info))
        .route("/api/v1/geo/user", get(geo_user))
        .route("/api/v1/email/check", get(email_check))
        .route("/api/v1/sms/auth", get(sms_auth))
        .route("/api/v1/phone/check", get(phone_check))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn param<'a>(pairs: &'a QueryPairs, key: &str) -> &'a str {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .unwrap_or_default()
}

fn params_object(pairs: &QueryPairs) -> Map<String, Value> {
    let mut params = Map::new();
    for (key, value) in pairs {
        params.insert(key.clone(), Value::String(value.clone()));
    }
    params
}

/// A missing or empty token yields the service's own error shape with
/// status 200. The token "expired" is reserved so tests can exercise
/// error-payload pass-through with an otherwise well-formed request.
fn token_error(pairs: &QueryPairs) -> Option<Value> {
    match param(pairs, "token") {
        "" | "expired" => Some(json!({ "status": "error", "message": "Invalid token" })),
        _ => None,
    }
}

/// Wrap a handler payload in the common response envelope.
fn respond(pairs: QueryPairs, payload: Value) -> Json<Value> {
    if let Some(error) = token_error(&pairs) {
        return Json(error);
    }
    let mut body = Map::new();
    body.insert("status".to_string(), Value::String("ok".to_string()));
    if let Some(fields) = payload.as_object() {
        for (key, value) in fields {
            body.insert(key.clone(), value.clone());
        }
    }
    body.insert("params".to_string(), Value::Object(params_object(&pairs)));
    body.insert(
        "keys".to_string(),
        Value::Array(pairs.iter().map(|(k, _)| Value::String(k.clone())).collect()),
    );
    Json(Value::Object(body))
}

async fn account_info(Query(pairs): Query<QueryPairs>) -> Json<Value> {
    let email = param(&pairs, "email").to_string();
    respond(
        pairs,
        json!({
            "account": { "email": email, "plan": "free", "active": true }
        }),
    )
}

async fn geo_user(Query(pairs): Query<QueryPairs>) -> Json<Value> {
    let scope = param(&pairs, "scope").to_string();
    let mut geo = Map::new();
    for name in scope.split(',') {
        for (key, value) in scope_fields(name) {
            geo.insert(key.to_string(), value);
        }
    }
    respond(pairs, Value::Object(geo))
}

async fn email_check(Query(pairs): Query<QueryPairs>) -> Json<Value> {
    let email = param(&pairs, "email").to_string();
    let valid = email.contains('@');
    respond(
        pairs,
        json!({ "email": email, "valid": valid, "disposable": false }),
    )
}

async fn sms_auth(Query(pairs): Query<QueryPairs>) -> Json<Value> {
    respond(pairs, json!({ "message": "Code sent" }))
}

async fn phone_check(Query(pairs): Query<QueryPairs>) -> Json<Value> {
    let phone = param(&pairs, "phone").to_string();
    respond(
        pairs,
        json!({
            "phone": phone,
            "carrier": "KPN",
            "country_code": "NL",
            "line_type": "mobile"
        }),
    )
}

/// Canned geolocation record, grouped by scope name. Unknown names
/// contribute nothing; `all` expands to every group.
fn scope_fields(scope: &str) -> Vec<(&'static str, Value)> {
    match scope {
        "country" => vec![
            ("country", json!("Netherlands")),
            ("country_code", json!("NL")),
        ],
        "region" => vec![("region", json!("North Holland"))],
        "city" => vec![("city", json!("Amsterdam"))],
        "currency" => vec![("currency", json!("EUR"))],
        "location" => vec![("latitude", json!(52.3728)), ("longitude", json!(4.8936))],
        "postal" => vec![("postal", json!("1012"))],
        "call" => vec![("calling_code", json!("31"))],
        "all" => ["country", "region", "city", "currency", "location", "postal", "call"]
            .iter()
            .flat_map(|s| scope_fields(s))
            .collect(),
        _ => Vec::new(),
    }
}
