//! Client configuration.
//!
//! The environment is only consulted by `Config::from_env`; everything else
//! takes the token and options explicitly.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::{ApiError, ApiResult};

/// Default base URL of the suggestion service.
pub const DEFAULT_BASE_URL: &str = "https://suggestions.dadata.ru/suggestions/api";

/// API version segment inserted after the base URL.
pub const API_VERSION: &str = "4_1";

pub const TOKEN_ENV: &str = "DADATA_TOKEN";
pub const BASE_URL_ENV: &str = "DADATA_BASE_URL";
pub const TIMEOUT_ENV: &str = "DADATA_TIMEOUT";

/// Headers every request carries; custom headers may not repeat them.
pub const RESERVED_HEADERS: [&str; 3] = ["Content-Type", "Accept", "Authorization"];

/// Immutable client configuration.
#[derive(Clone)]
pub struct Config {
    token: SecretString,
    pub base_url: String,
    pub timeout: Option<Duration>,
    pub custom_headers: Vec<(String, String)>,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Shorthand for a config with only a token.
    pub fn with_token(token: impl Into<String>) -> ApiResult<Self> {
        Self::builder().token(token).build()
    }

    /// Reads `DADATA_TOKEN` (required), `DADATA_BASE_URL` and
    /// `DADATA_TIMEOUT` (whole seconds).
    pub fn from_env() -> ApiResult<Self> {
        let token = std::env::var(TOKEN_ENV).map_err(|_| ApiError::Configuration {
            message: format!("{TOKEN_ENV} environment variable not set"),
        })?;

        let mut builder = Self::builder().token(token);

        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            builder = builder.base_url(base_url);
        }

        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            let secs = raw.parse::<u64>().map_err(|_| ApiError::Configuration {
                message: format!("{TIMEOUT_ENV} must be a whole number of seconds, got {raw:?}"),
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    pub(crate) fn token(&self) -> &str {
        self.token.expose_secret()
    }

    /// Last four characters of the token, for diagnostics.
    pub fn token_hint(&self) -> String {
        let token = self.token.expose_secret();
        let chars: Vec<char> = token.chars().collect();
        if chars.len() > 4 {
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("...{tail}")
        } else {
            "****".to_string()
        }
    }

    /// `{base}/{version}/{path}`
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            API_VERSION,
            path.trim_start_matches('/')
        )
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("custom_headers", &self.custom_headers)
            .finish()
    }
}

#[derive(Default)]
pub struct ConfigBuilder {
    token: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    custom_headers: Vec<(String, String)>,
}

impl ConfigBuilder {
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds a header sent after the standard ones. `build` rejects any of
    /// `RESERVED_HEADERS`.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    pub fn build(self) -> ApiResult<Config> {
        let token = self.token.ok_or_else(|| ApiError::Configuration {
            message: "token is required".to_string(),
        })?;
        if token.trim().is_empty() {
            return Err(ApiError::Configuration {
                message: "token cannot be empty".to_string(),
            });
        }

        if let Some((name, _)) = self.custom_headers.iter().find(|(name, _)| {
            RESERVED_HEADERS
                .iter()
                .any(|reserved| reserved.eq_ignore_ascii_case(name))
        }) {
            return Err(ApiError::Configuration {
                message: format!("header {name} is set by the client"),
            });
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if base_url.is_empty() {
            return Err(ApiError::Configuration {
                message: "base URL cannot be empty".to_string(),
            });
        }

        Ok(Config {
            token: SecretString::new(token),
            base_url,
            timeout: self.timeout,
            custom_headers: self.custom_headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn builder_defaults() {
        let config = Config::with_token("secret-token").unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, None);
        assert!(config.custom_headers.is_empty());
        assert_eq!(config.token(), "secret-token");
    }

    #[test]
    fn missing_token_is_rejected() {
        let err = Config::builder().build().unwrap_err();
        assert!(matches!(err, ApiError::Configuration { .. }));
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = Config::with_token("  ").unwrap_err();
        assert!(matches!(err, ApiError::Configuration { .. }));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = Config::builder()
            .token("t")
            .base_url("http://localhost:3000/suggestions/api/")
            .build()
            .unwrap();
        assert_eq!(
            config.endpoint_url("rs/suggest/address"),
            "http://localhost:3000/suggestions/api/4_1/rs/suggest/address"
        );
    }

    #[test]
    fn debug_redacts_token() {
        let config = Config::with_token("super-secret-value").unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn reserved_headers_are_rejected() {
        for name in ["Authorization", "content-type", "ACCEPT"] {
            let err = Config::builder()
                .token("t")
                .header(name, "other")
                .build()
                .unwrap_err();
            assert!(matches!(err, ApiError::Configuration { .. }), "{name}");
        }
        let config = Config::builder()
            .token("t")
            .header("X-Secret", "abc")
            .build()
            .unwrap();
        assert_eq!(config.custom_headers.len(), 1);
    }

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Sets the given variables, clears the rest of the `DADATA_*` set, and
    /// restores a clean environment afterwards.
    fn with_env<R>(vars: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let all = [TOKEN_ENV, BASE_URL_ENV, TIMEOUT_ENV];
        for key in all {
            std::env::remove_var(key);
        }
        for (key, value) in vars {
            std::env::set_var(key, value);
        }
        let result = f();
        for key in all {
            std::env::remove_var(key);
        }
        result
    }

    #[test]
    fn from_env_requires_token() {
        let err = with_env(&[], Config::from_env).unwrap_err();
        assert!(matches!(err, ApiError::Configuration { ref message } if message.contains(TOKEN_ENV)));
    }

    #[test]
    fn from_env_token_only_uses_defaults() {
        let config = with_env(&[(TOKEN_ENV, "env-token")], Config::from_env).unwrap();
        assert_eq!(config.token(), "env-token");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn from_env_reads_overrides() {
        let config = with_env(
            &[
                (TOKEN_ENV, "env-token"),
                (BASE_URL_ENV, "http://127.0.0.1:3000/suggestions/api/"),
                (TIMEOUT_ENV, "7"),
            ],
            Config::from_env,
        )
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:3000/suggestions/api");
        assert_eq!(config.timeout, Some(Duration::from_secs(7)));
    }

    #[test]
    fn from_env_rejects_bad_timeout() {
        let err = with_env(
            &[(TOKEN_ENV, "env-token"), (TIMEOUT_ENV, "soon")],
            Config::from_env,
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Configuration { ref message } if message.contains(TIMEOUT_ENV)));
    }

    #[cfg(feature = "ureq")]
    #[test]
    fn client_from_env() {
        use crate::client::SuggestionClient;
        use crate::transport::UreqTransport;

        let err = with_env(&[], SuggestionClient::<UreqTransport>::from_env).unwrap_err();
        assert!(matches!(err, ApiError::Configuration { .. }));

        let client = with_env(
            &[(TOKEN_ENV, "env-token"), (TIMEOUT_ENV, "3")],
            SuggestionClient::<UreqTransport>::from_env,
        )
        .unwrap();
        assert_eq!(client.api().config().timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn token_hint_shows_tail_only() {
        assert_eq!(Config::with_token("abcdef123").unwrap().token_hint(), "...f123");
        assert_eq!(Config::with_token("abc").unwrap().token_hint(), "****");
    }
}
