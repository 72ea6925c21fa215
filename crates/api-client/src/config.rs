//! Configuration for the fincode API client
//!
//! A [`ClientConfig`] is built once and never mutated afterwards. The base URL
//! is not configurable: it is derived from the [`Environment`].

use crate::error::SdkError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Origin of the test (sandbox) API
const TEST_BASE_URL: &str = "https://api.test.fincode.jp";

/// Origin of the live API
const LIVE_BASE_URL: &str = "https://api.fincode.jp";

/// Target environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Sandbox environment
    #[default]
    Test,
    /// Production environment
    Live,
}

impl Environment {
    /// Base URL every request in this environment is sent to
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Test => TEST_BASE_URL,
            Self::Live => LIVE_BASE_URL,
        }
    }

    /// Whether this is the live environment
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Live)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Test => f.write_str("test"),
            Self::Live => f.write_str("live"),
        }
    }
}

impl FromStr for Environment {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "test" => Ok(Self::Test),
            "live" => Ok(Self::Live),
            other => Err(SdkError::config(format!(
                "unknown environment '{other}', expected 'test' or 'live'"
            ))),
        }
    }
}

/// Outbound proxy settings
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Proxy URL, e.g. `http://proxy.internal:3128`
    pub url: String,
    /// Basic auth username
    pub username: Option<String>,
    /// Basic auth password
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Proxy without authentication
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
        }
    }

    /// Add basic auth credentials
    #[must_use]
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Client configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Target environment; selects the base URL
    pub environment: Environment,
    /// Secret API key, sent as a bearer token
    pub secret_key: String,
    /// Value for the `Api-Version` header, if any
    pub api_version: Option<String>,
    /// Outbound proxy
    pub proxy: Option<ProxyConfig>,
    /// Transport-level request timeout; none means no timeout
    #[serde(default, with = "duration_secs")]
    pub timeout: Option<Duration>,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        duration: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        duration.map(|d| d.as_secs()).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("environment", &self.environment)
            .field("secret_key", &"***")
            .field("api_version", &self.api_version)
            .field("proxy", &self.proxy)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration for the given environment and secret key
    pub fn new(environment: Environment, secret_key: impl Into<String>) -> Self {
        Self {
            environment,
            secret_key: secret_key.into(),
            api_version: None,
            proxy: None,
            timeout: None,
        }
    }

    /// Test environment configuration
    pub fn test(secret_key: impl Into<String>) -> Self {
        Self::new(Environment::Test, secret_key)
    }

    /// Live environment configuration
    pub fn live(secret_key: impl Into<String>) -> Self {
        Self::new(Environment::Live, secret_key)
    }

    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `FINCODE_SECRET_KEY`: secret API key (required)
    /// - `FINCODE_ENV`: `test` (default) or `live`
    /// - `FINCODE_API_VERSION`: value for the `Api-Version` header
    /// - `FINCODE_PROXY_URL`: outbound proxy URL
    /// - `FINCODE_TIMEOUT_SECS`: request timeout in seconds
    pub fn from_env() -> Result<Self, SdkError> {
        let secret_key = env::var("FINCODE_SECRET_KEY")
            .map_err(|_| SdkError::missing_env("FINCODE_SECRET_KEY"))?;

        let environment = match env::var("FINCODE_ENV") {
            Ok(value) if !value.trim().is_empty() => value.parse()?,
            _ => Environment::default(),
        };

        let timeout = env::var("FINCODE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs);

        Ok(Self {
            environment,
            secret_key,
            api_version: env::var("FINCODE_API_VERSION").ok(),
            proxy: env::var("FINCODE_PROXY_URL").ok().map(ProxyConfig::new),
            timeout,
        })
    }

    /// Base URL derived from the environment
    #[must_use]
    pub fn base_url(&self) -> &'static str {
        self.environment.base_url()
    }

    /// Builder-style method to set the API version header
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Builder-style method to set the proxy
    #[must_use]
    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), SdkError> {
        if self.secret_key.trim().is_empty() {
            return Err(SdkError::config("secret_key cannot be empty"));
        }

        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(SdkError::config("timeout cannot be zero"));
        }

        if let Some(ref proxy) = self.proxy {
            if !proxy.url.starts_with("http://") && !proxy.url.starts_with("https://") {
                return Err(SdkError::config("proxy url must start with http:// or https://"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_selection() {
        assert_eq!(Environment::Test.base_url(), "https://api.test.fincode.jp");
        assert_eq!(Environment::Live.base_url(), "https://api.fincode.jp");
        assert_eq!(ClientConfig::live("sk").base_url(), LIVE_BASE_URL);
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!("test".parse::<Environment>().unwrap(), Environment::Test);
        assert_eq!(" LIVE ".parse::<Environment>().unwrap(), Environment::Live);
        assert!("staging".parse::<Environment>().is_err());
        assert!("production".parse::<Environment>().is_err());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::test("m_test_key")
            .with_api_version("20211001")
            .with_timeout(Duration::from_secs(15))
            .with_proxy(ProxyConfig::new("http://localhost:3128"));

        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.api_version.as_deref(), Some("20211001"));
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::test("").validate().is_err());
        assert!(ClientConfig::test("sk")
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());
        assert!(ClientConfig::test("sk")
            .with_proxy(ProxyConfig::new("localhost:3128"))
            .validate()
            .is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = ClientConfig::test("m_test_secret")
            .with_proxy(ProxyConfig::new("http://p:1").with_basic_auth("u", "hunter2"));
        let debug = format!("{config:?}");
        assert!(!debug.contains("m_test_secret"));
        assert!(!debug.contains("hunter2"));
    }
}
