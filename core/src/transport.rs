//! Transport helper: executes `HttpRequest`s and classifies the responses.
//!
//! # Design
//! `HttpTransport` is the only place that performs I/O. `UreqTransport` is the
//! default implementation; tests plug in stubs that return canned
//! `HttpResponse`s. `send_json` and `send_no_content` sit on top of any
//! transport and turn a raw response into a `Response<T>`:
//!
//! - 404 is returned as a bodyless, non-error response. Whether it means
//!   "not found" is decided by the caller.
//! - Any other status outside 200..=299 is decoded as an `ErrorBody` and
//!   flagged with `has_error`; the success body is not decoded.
//! - 204 never carries a body.

use serde::de::DeserializeOwned;

use crate::error::{OtpError, TransportError};
use crate::http::{ErrorBody, HttpMethod, HttpRequest, HttpResponse};

pub const USER_AGENT: &str = "otp-service-client-go";

/// Executes a single HTTP round-trip.
///
/// Implementations must read the whole response body before returning and
/// must not treat non-2xx statuses as errors.
pub trait HttpTransport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `HttpTransport` backed by a blocking `ureq::Agent`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Use a preconfigured agent. The agent must be built with
    /// `http_status_as_error(false)` so failing statuses reach the classifier.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut response = match request.method {
            HttpMethod::Get => apply(self.agent.get(&request.url), request).call(),
            HttpMethod::Delete => apply(self.agent.delete(&request.url), request).call(),
            HttpMethod::Post => {
                let builder = apply(self.agent.post(&request.url), request);
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        }?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Merge query parameters and headers onto a ureq builder.
fn apply<B>(mut builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (key, value) in &request.query {
        builder = builder.query(key, value);
    }
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Status, headers and error state of a classified response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMeta {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub has_error: bool,
    pub error_body: Option<ErrorBody>,
}

/// A classified response with an optionally decoded body.
#[derive(Debug, Clone)]
pub struct Response<T> {
    pub meta: ResponseMeta,
    pub body: Option<T>,
}

/// Append the fixed `User-Agent`, replacing any value the caller set.
pub fn prepare(request: HttpRequest) -> HttpRequest {
    request.header("User-Agent", USER_AGENT)
}

/// Execute `request` and decode a JSON body of type `T` on success.
pub fn send_json<T, X>(transport: &X, request: HttpRequest) -> Result<Response<T>, OtpError>
where
    T: DeserializeOwned,
    X: HttpTransport + ?Sized,
{
    let raw = dispatch(transport, request)?;
    let meta = classify(&raw)?;

    if meta.status == 404 || meta.status == 204 || meta.has_error {
        return Ok(Response { meta, body: None });
    }

    let body = serde_json::from_str(&raw.body).map_err(|e| {
        tracing::warn!(status = meta.status, error = %e, "undecodable response body");
        OtpError::Decode(e)
    })?;
    Ok(Response {
        meta,
        body: Some(body),
    })
}

/// Execute `request` for an operation whose success carries no body.
pub fn send_no_content<X>(transport: &X, request: HttpRequest) -> Result<ResponseMeta, OtpError>
where
    X: HttpTransport + ?Sized,
{
    let raw = dispatch(transport, request)?;
    classify(&raw)
}

fn dispatch<X>(transport: &X, request: HttpRequest) -> Result<HttpResponse, OtpError>
where
    X: HttpTransport + ?Sized,
{
    let request = prepare(request);
    match transport.execute(&request) {
        Ok(response) => {
            tracing::debug!(
                method = request.method.as_str(),
                url = %request.url,
                status = response.status,
                "otp service call"
            );
            Ok(response)
        }
        Err(e) => {
            tracing::warn!(
                method = request.method.as_str(),
                url = %request.url,
                error = %e,
                "otp service call failed"
            );
            Err(e.into())
        }
    }
}

fn classify(raw: &HttpResponse) -> Result<ResponseMeta, OtpError> {
    let mut meta = ResponseMeta {
        status: raw.status,
        headers: raw.headers.clone(),
        has_error: false,
        error_body: None,
    };

    if !(200..=299).contains(&raw.status) && raw.status != 404 {
        let error_body: ErrorBody = serde_json::from_str(&raw.body).map_err(|e| {
            tracing::warn!(status = raw.status, error = %e, "undecodable error payload");
            OtpError::Decode(e)
        })?;
        meta.has_error = true;
        meta.error_body = Some(error_body);
    }

    Ok(meta)
}
