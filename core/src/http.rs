//! HTTP transport: request data, response data, and the blocking
//! executor.
//!
//! # Design
//! `ApiRequest` and `ApiResponse` are plain owned data so request
//! assembly and response interpretation can be unit tested without a
//! network. `execute` performs the single blocking GET round trip;
//! query-string encoding is left to ureq. Non-2xx statuses come back
//! as data, not as errors, so the caller owns status interpretation.

use std::time::Duration;

use ureq::Agent;

use crate::error::ApiError;

/// Connect and total timeout applied to every request.
const TIMEOUT: Duration = Duration::from_secs(5);

/// One outgoing API call described as plain data: the full URL path
/// (base, API version, service and method already joined) plus the
/// query parameters in send order.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
}

/// The raw outcome of an executed `ApiRequest`, before any JSON
/// decoding or status interpretation.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Build the agent every client holds: fixed 5-second connect and
/// total timeouts, and status codes reported as data rather than
/// `Err` so 4xx/5xx responses reach the status check.
pub(crate) fn agent() -> Agent {
    Agent::config_builder()
        .http_status_as_error(false)
        .timeout_connect(Some(TIMEOUT))
        .timeout_global(Some(TIMEOUT))
        .build()
        .new_agent()
}

/// Execute one blocking GET and return status plus body.
///
/// Fails only when no HTTP status was obtained (connection failure,
/// timeout) or the body could not be read.
pub(crate) fn execute(agent: &Agent, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
    let mut response = agent
        .get(&request.path)
        .query_pairs(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .call()
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    Ok(ApiResponse { status, body })
}
