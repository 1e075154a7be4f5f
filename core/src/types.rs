//! Wire DTOs for the OTP service.
//!
//! # Design
//! Defined independently of the mock-server crate; integration tests catch
//! any schema drift between the two.

use serde::{Deserialize, Serialize};

/// OTP registration state for a user, returned by `GET /users/{id}/otp`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GetUserOtpResponse {
    pub verified: bool,
    pub enabled: bool,
    pub secret: String,
    pub auth_url: String,
}

/// Freshly provisioned OTP secret, returned by `POST /users/{id}/otp`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateUserOtpResponse {
    pub secret: String,
    pub auth_url: String,
}

/// Request payload for `/otp/verify` and `/otp/validate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OtpTokenRequest {
    pub user_id: i64,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_request_uses_wire_names() {
        let req = OtpTokenRequest {
            user_id: 42,
            token: "123456".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"user_id":42,"token":"123456"}"#
        );
    }

    #[test]
    fn get_response_decodes() {
        let resp: GetUserOtpResponse = serde_json::from_str(
            r#"{"verified":true,"enabled":false,"secret":"ABC","auth_url":"otpauth://totp/x"}"#,
        )
        .unwrap();
        assert!(resp.verified);
        assert!(!resp.enabled);
        assert_eq!(resp.secret, "ABC");
        assert_eq!(resp.auth_url, "otpauth://totp/x");
    }

    #[test]
    fn create_response_rejects_missing_secret() {
        let result: Result<CreateUserOtpResponse, _> =
            serde_json::from_str(r#"{"auth_url":"otpauth://totp/x"}"#);
        assert!(result.is_err());
    }
}
