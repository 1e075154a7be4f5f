//! Client configuration.

use std::{env, fmt};

use crate::error::ConfigError;

pub const URL_VAR: &str = "OTP_SERVICE_URL";
pub const SECRET_VAR: &str = "OTP_SERVICE_SECRET";

/// Base URL and shared secret for the OTP service. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    secret: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            secret: secret.into(),
        }
    }

    /// Load from `OTP_SERVICE_URL` and `OTP_SERVICE_SECRET`, reading a `.env`
    /// file first when one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(URL_VAR).ok_or(ConfigError::Missing(URL_VAR))?;
        let secret = lookup(SECRET_VAR).ok_or(ConfigError::Missing(SECRET_VAR))?;
        Ok(Self::new(base_url, secret))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("secret", &"<redacted>")
            .finish()
    }
}
