//! Client type and endpoint methods for the coreapi.tech API.
//!
//! # Design
//! `CoreapiClient` holds the bearer token, the base URL and one
//! preconfigured agent; nothing is mutated per call. Every endpoint
//! method validates its inputs, then delegates to a single private
//! `api` path that builds the request, executes it and interprets the
//! response. Validation failures short-circuit before any I/O and
//! return the same `{"status": "error", "message": ...}` value the
//! remote service uses, so callers handle one error shape.

use std::fmt;

use serde_json::{json, Value};

use crate::error::ApiError;
use crate::http::{self, ApiRequest, ApiResponse};

const DEFAULT_BASE_URL: &str = "https://coreapi.tech/api";
const API_VERSION: &str = "v1";

/// Identifies this client implementation in every request.
const PLATFORM: &str = "rust";
/// The client's own version, sent as the `version` query parameter.
const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Geolocation field groups the `geo/user` endpoint can return.
const GEO_SCOPES: [&str; 8] = [
    "country", "region", "city", "currency", "location", "postal", "call", "all",
];

/// Languages the `sms/auth` endpoint accepts.
const SMS_LANGUAGES: [&str; 3] = ["en", "ru", "ua"];

/// Query keys the client always supplies itself. Caller parameters
/// under these names are discarded before the canonical values are
/// appended.
const RESERVED_KEYS: [&str; 3] = ["token", "platform", "version"];

/// Synchronous client for the coreapi.tech API.
///
/// Constructed once with a bearer token and shared freely afterwards.
/// Each method performs exactly one blocking GET and returns the
/// decoded JSON body verbatim; the library never interprets
/// success-path payload fields.
#[derive(Clone)]
pub struct CoreapiClient {
    token: String,
    base_url: String,
    agent: ureq::Agent,
}

impl fmt::Debug for CoreapiClient {
    // The token is a credential; keep it out of debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreapiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl CoreapiClient {
    /// Create a client for the production API.
    ///
    /// The token is not validated here; an empty token is reported
    /// per-request as `{"status": "error", "message": "Token not set"}`.
    pub fn new(token: &str) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL, e.g. a local test
    /// server. A trailing `/` on the base URL is stripped.
    pub fn with_base_url(token: &str, base_url: &str) -> Self {
        Self {
            token: token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: http::agent(),
        }
    }

    /// Look up account details by credentials.
    ///
    /// No local validation; malformed input is forwarded as-is.
    pub fn account_info(&self, email: &str, password: &str) -> Result<Value, ApiError> {
        self.api(
            "account",
            "info",
            &[("email", email), ("password", password)],
        )
    }

    /// Geolocate an IP address.
    ///
    /// `scopes` selects which field groups to return. Unrecognized
    /// entries are silently dropped; if none survive (or the list is
    /// empty) the request asks for `all`. Survivors are sent
    /// comma-joined in input order as one `scope` parameter.
    pub fn user_geo(&self, ip: &str, scopes: &[&str]) -> Result<Value, ApiError> {
        let scope = filter_scopes(scopes);
        self.api("geo", "user", &[("ip", ip), ("scope", &scope)])
    }

    /// Check whether an email address is valid and deliverable.
    pub fn email_info(&self, email: &str) -> Result<Value, ApiError> {
        self.api("email", "check", &[("email", email)])
    }

    /// Send an SMS authentication code.
    ///
    /// `code` must be non-empty and at most 6 characters; `language`
    /// must be one of `en`, `ru`, `ua`. Violations return the tagged
    /// error value without touching the network.
    pub fn send_sms_auth(&self, phone: &str, code: &str, language: &str) -> Result<Value, ApiError> {
        if code.is_empty() {
            return Ok(error_value("Code is empty"));
        }
        if code.chars().count() > 6 {
            return Ok(error_value("Code is too long. Max 6 characters"));
        }
        if language.is_empty() {
            return Ok(error_value("Language is empty"));
        }
        if !SMS_LANGUAGES.contains(&language) {
            return Ok(error_value(&format!(
                "Supported only these language: {}",
                SMS_LANGUAGES.join(", ")
            )));
        }
        self.api(
            "sms",
            "auth",
            &[("phone", phone), ("code", code), ("language", language)],
        )
    }

    /// Look up carrier and line information for a phone number.
    pub fn phone_info(&self, phone: &str) -> Result<Value, ApiError> {
        if phone.is_empty() {
            return Ok(error_value("Phone is empty"));
        }
        self.api("phone", "check", &[("phone", phone)])
    }

    /// The single build-execute-interpret path every endpoint uses.
    ///
    /// An empty token short-circuits here, uniformly for all
    /// endpoints, before any I/O.
    fn api(&self, service: &str, method: &str, params: &[(&str, &str)]) -> Result<Value, ApiError> {
        if self.token.is_empty() {
            return Ok(error_value("Token not set"));
        }
        let request = self.build_request(service, method, params);
        let response = http::execute(&self.agent, &request)?;
        interpret(response)
    }

    /// Assemble the URL path and query pairs for one call.
    ///
    /// The query always carries exactly one `token` (first), one
    /// `platform` and one `version` (last); same-named caller keys
    /// are dropped so the canonical values win.
    fn build_request(&self, service: &str, method: &str, params: &[(&str, &str)]) -> ApiRequest {
        let mut query = Vec::with_capacity(params.len() + 3);
        query.push(("token".to_string(), self.token.clone()));
        for (key, value) in params {
            if RESERVED_KEYS.contains(key) {
                continue;
            }
            query.push((key.to_string(), value.to_string()));
        }
        query.push(("platform".to_string(), PLATFORM.to_string()));
        query.push(("version".to_string(), CLIENT_VERSION.to_string()));

        ApiRequest {
            path: format!("{}/{API_VERSION}/{service}/{method}", self.base_url),
            query,
        }
    }
}

/// Keep recognized scopes in input order; an empty survivor list
/// becomes `all`. Invalid entries are dropped, never rejected.
fn filter_scopes(scopes: &[&str]) -> String {
    let valid: Vec<&str> = scopes
        .iter()
        .copied()
        .filter(|s| GEO_SCOPES.contains(s))
        .collect();
    if valid.is_empty() {
        "all".to_string()
    } else {
        valid.join(",")
    }
}

/// The error shape shared by local validation and the remote service.
fn error_value(message: &str) -> Value {
    json!({ "status": "error", "message": message })
}

/// Turn a raw response into the caller-facing value: any non-200
/// status collapses to "Request error" regardless of body, a 200 body
/// is decoded and passed through verbatim.
fn interpret(response: ApiResponse) -> Result<Value, ApiError> {
    if response.status != 200 {
        return Ok(error_value("Request error"));
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}
