//! Synchronous client for the coreapi.tech web API.
//!
//! # Overview
//! `CoreapiClient` wraps the remote geolocation, account and
//! verification endpoints behind typed methods. Each call builds one
//! authenticated GET request, executes it with fixed 5-second timeouts,
//! and returns the decoded JSON body as a `serde_json::Value`.
//!
//! # Design
//! - `CoreapiClient` is an immutable value object holding the token,
//!   the base URL and a preconfigured agent. One instance can be shared
//!   across threads because no call mutates client state.
//! - Request construction is separated from I/O: endpoint methods
//!   produce an `ApiRequest` (plain data) that the `http` module
//!   executes, so URL and query assembly stay testable offline.
//! - Input-validation failures and remote API errors share one shape,
//!   the JSON value `{"status": "error", "message": ...}`. `Err` is
//!   reserved for transport failures and undecodable bodies.

pub mod client;
pub mod error;
pub mod http;

pub use client::CoreapiClient;
pub use error::ApiError;
pub use http::{ApiRequest, ApiResponse};
