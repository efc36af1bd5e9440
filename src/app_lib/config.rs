//! Client configuration for the API endpoint, the ambient cookie credential and
//! the request timeout. Values usually come from CLI flags or `AUTHAPP_*`
//! environment variables. The cookie is a credential and is kept in a
//! `SecretString`.

use super::errors::ApiError;
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

/// Default request timeout applied by the transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolved client configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: Url,
    pub cookie: Option<SecretString>,
    pub timeout: Duration,
}

impl AppConfig {
    /// Builds a config for the given API origin with no cookie and the default timeout.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if the URL does not parse, has no host, or is
    /// not http(s).
    pub fn new(api_base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            api_base_url: parse_base_url(api_base_url)?,
            cookie: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Applies optional overrides; blank values are ignored.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(cookie) = overrides.cookie {
            self.cookie = Some(SecretString::from(cookie));
        }
        if let Some(seconds) = overrides.timeout_seconds.filter(|seconds| *seconds > 0) {
            self.timeout = Duration::from_secs(seconds);
        }
    }
}

/// Optional values layered on top of the base config.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub cookie: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl ConfigOverrides {
    #[must_use]
    pub fn new(cookie: Option<&str>, timeout_seconds: Option<u64>) -> Self {
        Self {
            cookie: cookie.and_then(normalize_value),
            timeout_seconds,
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let trimmed = normalize_value(raw)
        .ok_or_else(|| ApiError::Config("API base URL is not configured.".to_string()))?;
    let url = Url::parse(&trimmed)
        .map_err(|err| ApiError::Config(format!("Invalid API base URL: {err}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::Config(format!(
            "Invalid API base URL: unsupported scheme {}",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(ApiError::Config(
            "Invalid API base URL: no host specified".to_string(),
        ));
    }

    Ok(url)
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigOverrides, DEFAULT_TIMEOUT, normalize_value};
    use secrecy::ExposeSecret;
    use std::time::Duration;

    #[test]
    fn normalize_value_trims_and_rejects_empty() {
        assert_eq!(normalize_value(""), None);
        assert_eq!(normalize_value("   "), None);
        assert_eq!(
            normalize_value("  https://api.authapp.dev "),
            Some("https://api.authapp.dev".to_string())
        );
    }

    #[test]
    fn new_rejects_bad_urls() {
        assert!(AppConfig::new("").is_err());
        assert!(AppConfig::new("not a url").is_err());
        assert!(AppConfig::new("ftp://api.authapp.dev").is_err());
    }

    #[test]
    fn new_uses_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let config = AppConfig::new(" http://localhost:5000 ")?;
        assert_eq!(config.api_base_url.as_str(), "http://localhost:5000/");
        assert!(config.cookie.is_none());
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        Ok(())
    }

    #[test]
    fn apply_overrides_ignores_empty_values() -> Result<(), Box<dyn std::error::Error>> {
        let mut config = AppConfig::new("https://api.default")?;
        config.apply_overrides(ConfigOverrides::new(Some("   "), Some(0)));

        assert!(config.cookie.is_none());
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        Ok(())
    }

    #[test]
    fn apply_overrides_overwrites_when_present() -> Result<(), Box<dyn std::error::Error>> {
        let mut config = AppConfig::new("https://api.default")?;
        config.apply_overrides(ConfigOverrides::new(Some(" refreshToken=abc "), Some(3)));

        assert_eq!(
            config.cookie.as_ref().map(|c| c.expose_secret().to_string()),
            Some("refreshToken=abc".to_string())
        );
        assert_eq!(config.timeout, Duration::from_secs(3));
        Ok(())
    }
}
