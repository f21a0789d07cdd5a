//! Alpaca Markets REST backend (market data v2).
//!
//! The same key pair authenticates both the bars endpoint and the news endpoint,
//! so credentials live here and are shared with [`crate::news::alpaca_news`].

pub mod params;
pub mod provider;
pub mod response;

use reqwest::header::{self, HeaderMap};
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::get_env_var;
use snafu::ResultExt;

use crate::providers::{InvalidApiKeySnafu, MissingEnvVarSnafu, ProviderInitError};

pub const API_KEY_VAR: &str = "APCA_API_KEY_ID";
pub const SECRET_KEY_VAR: &str = "APCA_API_SECRET_KEY";

/// Alpaca API key pair.
pub struct AlpacaCredentials {
    api_key: SecretString,
    secret_key: SecretString,
}

impl AlpacaCredentials {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            secret_key: SecretString::from(secret_key.into()),
        }
    }

    /// Reads keys from the `APCA_API_KEY_ID` and `APCA_API_SECRET_KEY`
    /// environment variables.
    pub fn from_env() -> Result<Self, ProviderInitError> {
        let api_key = get_env_var(API_KEY_VAR).context(MissingEnvVarSnafu)?;
        let secret_key = get_env_var(SECRET_KEY_VAR).context(MissingEnvVarSnafu)?;
        Ok(Self::new(api_key, secret_key))
    }

    /// Auth headers expected by every Alpaca data endpoint.
    pub(crate) fn headers(&self) -> Result<HeaderMap, ProviderInitError> {
        let mut headers = HeaderMap::new();
        let mut key = header::HeaderValue::from_str(self.api_key.expose_secret())
            .context(InvalidApiKeySnafu)?;
        key.set_sensitive(true);
        let mut secret = header::HeaderValue::from_str(self.secret_key.expose_secret())
            .context(InvalidApiKeySnafu)?;
        secret.set_sensitive(true);
        headers.insert("APCA-API-KEY-ID", key);
        headers.insert("APCA-API-SECRET-KEY", secret);
        Ok(headers)
    }
}

impl std::fmt::Debug for AlpacaCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlpacaCredentials").finish_non_exhaustive()
    }
}
