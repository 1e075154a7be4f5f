//! Domain client for the OTP provisioning service.
//!
//! # Design
//! `OtpClient` holds an immutable `base_url`, the shared secret and a
//! transport, so one instance can be shared across threads. Each operation is
//! split into a pure `build_*` method that produces an `HttpRequest` (with
//! `X-Secret` already attached) and a method that sends it through the
//! transport helper and maps the classified response onto `OtpError`.

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::OtpError;
use crate::http::{HttpMethod, HttpRequest};
use crate::transport::{self, HttpTransport, Response, ResponseMeta, UreqTransport};
use crate::types::{CreateUserOtpResponse, GetUserOtpResponse, OtpTokenRequest};

pub const SECRET_HEADER: &str = "X-Secret";

/// Client for the OTP service.
#[derive(Clone)]
pub struct OtpClient<T = UreqTransport> {
    base_url: String,
    secret: String,
    transport: T,
}

impl OtpClient<UreqTransport> {
    pub fn new(base_url: &str, secret: &str) -> Self {
        Self::with_transport(base_url, secret, UreqTransport::new())
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.base_url(), config.secret())
    }
}

impl<T: HttpTransport> OtpClient<T> {
    pub fn with_transport(base_url: &str, secret: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            secret: secret.to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest::new(method, format!("{}{path}", self.base_url))
            .header(SECRET_HEADER, self.secret.as_str())
    }

    pub fn build_get_user_otp(&self, user_id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/users/{user_id}/otp"))
    }

    pub fn build_create_user_otp(&self, user_id: i64) -> HttpRequest {
        self.request(HttpMethod::Post, &format!("/users/{user_id}/otp"))
    }

    pub fn build_disable_user_otp(&self, user_id: i64) -> HttpRequest {
        self.request(HttpMethod::Post, &format!("/users/{user_id}/otp/disable"))
    }

    pub fn build_delete_user_otp(&self, user_id: i64) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/users/{user_id}/otp"))
    }

    pub fn build_verify_otp(&self, user_id: i64, token: &str) -> Result<HttpRequest, OtpError> {
        self.request(HttpMethod::Post, "/otp/verify")
            .json(&token_request(user_id, token))
    }

    pub fn build_validate_otp(&self, user_id: i64, token: &str) -> Result<HttpRequest, OtpError> {
        self.request(HttpMethod::Post, "/otp/validate")
            .json(&token_request(user_id, token))
    }

    /// Fetch the OTP registration for `user_id`.
    pub fn get_user_otp(&self, user_id: i64) -> Result<GetUserOtpResponse, OtpError> {
        self.send_json(self.build_get_user_otp(user_id))
    }

    /// Provision a new OTP secret for `user_id`.
    pub fn create_user_otp(&self, user_id: i64) -> Result<CreateUserOtpResponse, OtpError> {
        self.send_json(self.build_create_user_otp(user_id))
    }

    pub fn disable_user_otp(&self, user_id: i64) -> Result<(), OtpError> {
        self.send_no_content(self.build_disable_user_otp(user_id))
    }

    pub fn delete_user_otp(&self, user_id: i64) -> Result<(), OtpError> {
        self.send_no_content(self.build_delete_user_otp(user_id))
    }

    /// Confirm a freshly created registration with a token from the user's
    /// authenticator.
    pub fn verify_otp(&self, user_id: i64, token: &str) -> Result<(), OtpError> {
        self.send_no_content(self.build_verify_otp(user_id, token)?)
    }

    /// Check a token against an enabled registration.
    pub fn validate_otp(&self, user_id: i64, token: &str) -> Result<(), OtpError> {
        self.send_no_content(self.build_validate_otp(user_id, token)?)
    }

    fn send_json<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, OtpError> {
        let response = transport::send_json(&self.transport, request)?;
        handle_response_with_body(response)
    }

    fn send_no_content(&self, request: HttpRequest) -> Result<(), OtpError> {
        let meta = transport::send_no_content(&self.transport, request)?;
        handle_response(&meta)
    }
}

fn token_request(user_id: i64, token: &str) -> OtpTokenRequest {
    OtpTokenRequest {
        user_id,
        token: token.to_string(),
    }
}

/// Map a classified response onto the domain error model.
pub fn handle_response(meta: &ResponseMeta) -> Result<(), OtpError> {
    if meta.status == 404 {
        return Err(OtpError::NotFound);
    }
    if !meta.has_error {
        return Ok(());
    }

    let problem = meta
        .error_body
        .as_ref()
        .map(|body| body.problem.clone())
        .unwrap_or_default();
    Err(match meta.status {
        400 => OtpError::BadRequest { problem },
        409 => OtpError::Conflict { problem },
        _ => OtpError::Unknown { problem },
    })
}

fn handle_response_with_body<R>(response: Response<R>) -> Result<R, OtpError> {
    handle_response(&response.meta)?;
    response.body.ok_or(OtpError::MissingBody {
        status: response.meta.status,
    })
}
