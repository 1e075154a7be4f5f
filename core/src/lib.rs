//! Blocking client for the OTP provisioning service.
//!
//! # Overview
//! Fetches, creates, verifies, validates, disables and deletes OTP
//! registrations for a numeric user id, translating HTTP responses into typed
//! results or `OtpError`s.
//!
//! # Design
//! - `http` describes requests and responses as plain data.
//! - `transport` executes them (`UreqTransport` by default) and classifies the
//!   response. 404 passes through as a bodyless success; other failing
//!   statuses carry a decoded `ErrorBody`.
//! - `client` builds the per-operation requests and maps classified responses
//!   onto the domain errors.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::OtpClient;
pub use config::ClientConfig;
pub use error::{ConfigError, OtpError, TransportError};
pub use http::{ErrorBody, HttpMethod, HttpRequest, HttpResponse};
pub use transport::{HttpTransport, Response, ResponseMeta, UreqTransport, USER_AGENT};
pub use types::{CreateUserOtpResponse, GetUserOtpResponse, OtpTokenRequest};
