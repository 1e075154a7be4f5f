//! HTTP request and response descriptors.
//!
//! # Design
//! Requests and responses are plain data. The domain client builds
//! `HttpRequest` values through one builder shared by every call site, and an
//! `HttpTransport` turns them into `HttpResponse` values. Nothing in this
//! module touches the network, so request shapes can be asserted in tests
//! without a server.
//!
//! All fields use owned types so descriptors can be moved across threads and
//! recorded by test transports.

use serde::{Deserialize, Serialize};

use crate::error::OtpError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An outbound HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Set a header, replacing any existing header with the same name.
    /// Header names compare case-insensitively.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Append a query parameter, replacing an earlier one with the same key.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.query.retain(|(existing, _)| *existing != key);
        self.query.push((key, value.into()));
        self
    }

    /// Serialize `payload` as the JSON request body.
    pub fn json<P: Serialize>(self, payload: &P) -> Result<Self, OtpError> {
        let body = serde_json::to_string(payload).map_err(OtpError::Encode)?;
        let mut request = self.header("Content-Type", "application/json");
        request.body = Some(body);
        Ok(request)
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A fully-read HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn header_value(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Error payload returned by the OTP service on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub problem: String,
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_request_is_empty() {
        let req = HttpRequest::new(HttpMethod::Get, "http://localhost/users/1/otp");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost/users/1/otp");
        assert!(req.query.is_empty());
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn header_replaces_case_insensitively() {
        let req = HttpRequest::new(HttpMethod::Get, "http://x")
            .header("x-secret", "old")
            .header("X-Secret", "new");
        assert_eq!(req.headers, vec![("X-Secret".to_string(), "new".to_string())]);
        assert_eq!(req.header_value("X-SECRET"), Some("new"));
    }

    #[test]
    fn headers_keep_insertion_order() {
        let req = HttpRequest::new(HttpMethod::Get, "http://x")
            .header("A", "1")
            .header("B", "2");
        let names: Vec<&str> = req.headers.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn query_replaces_same_key() {
        let req = HttpRequest::new(HttpMethod::Get, "http://x")
            .query("page", "1")
            .query("page", "2");
        assert_eq!(req.query, vec![("page".to_string(), "2".to_string())]);
    }

    #[test]
    fn json_sets_body_and_content_type() {
        let req = HttpRequest::new(HttpMethod::Post, "http://x")
            .json(&ErrorBody { problem: "p".to_string() })
            .unwrap();
        assert_eq!(req.header_value("content-type"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some(r#"{"problem":"p"}"#));
    }

    #[test]
    fn method_names() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }

    #[test]
    fn error_body_decodes_problem() {
        let body: ErrorBody = serde_json::from_str(r#"{"problem":"invalid token"}"#).unwrap();
        assert_eq!(body.problem, "invalid token");
    }
}
