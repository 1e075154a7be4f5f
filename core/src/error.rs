//! Error types for the OTP service client.
//!
//! # Design
//! The service reports failures as a status code plus a `problem` string.
//! Statuses the caller commonly branches on (404, 400, 409) get their own
//! variants; every other failing status lands in `Unknown`. Transport and
//! JSON failures are passed through unchanged so they stay distinguishable
//! from service-reported errors.

/// Errors returned by `OtpClient` operations.
#[derive(Debug, thiserror::Error)]
pub enum OtpError {
    /// The service returned 404. The response body is never inspected.
    #[error("not found")]
    NotFound,

    #[error("bad request: {problem}")]
    BadRequest { problem: String },

    #[error("conflict: {problem}")]
    Conflict { problem: String },

    /// Any other failing status, carrying the service's problem string.
    #[error("unknown error: {problem}")]
    Unknown { problem: String },

    /// A body-bearing operation received a successful response without a body.
    #[error("response with status {status} carried no body")]
    MissingBody { status: u16 },

    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

impl OtpError {
    /// The service-provided problem detail, if this error carries one.
    pub fn problem(&self) -> Option<&str> {
        match self {
            OtpError::BadRequest { problem }
            | OtpError::Conflict { problem }
            | OtpError::Unknown { problem } => Some(problem),
            _ => None,
        }
    }
}

/// Failures raised before a response could be read.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] ureq::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Failure reported by a custom `HttpTransport` implementation.
    #[error("{0}")]
    Other(String),
}

/// Errors raised while loading `ClientConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_service_wording() {
        assert_eq!(OtpError::NotFound.to_string(), "not found");
        assert_eq!(
            OtpError::BadRequest { problem: "x".to_string() }.to_string(),
            "bad request: x"
        );
        assert_eq!(
            OtpError::Conflict { problem: "y".to_string() }.to_string(),
            "conflict: y"
        );
        assert_eq!(
            OtpError::Unknown { problem: "z".to_string() }.to_string(),
            "unknown error: z"
        );
    }

    #[test]
    fn problem_accessor() {
        assert_eq!(OtpError::NotFound.problem(), None);
        assert_eq!(
            OtpError::Conflict { problem: "taken".to_string() }.problem(),
            Some("taken")
        );
    }

    #[test]
    fn transport_error_converts() {
        let err: OtpError = TransportError::Other("connection refused".to_string()).into();
        assert!(matches!(err, OtpError::Transport(TransportError::Other(_))));
        assert_eq!(err.to_string(), "transport failed: connection refused");
    }

    #[test]
    fn config_error_names_variable() {
        assert_eq!(
            ConfigError::Missing("OTP_SERVICE_URL").to_string(),
            "environment variable OTP_SERVICE_URL is not set"
        );
    }
}
