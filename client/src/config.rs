//! Client configuration.
//!
//! A [`ClientConfig`] is built in code, read from TOML, or both, with
//! `FDP_*` environment variables applied on top:
//!
//! ```toml
//! base_url = "https://fdp.example.org"
//! email = "albert.einstein@example.com"
//! password = "password"
//! timeout_secs = 30
//! insecure = false
//! graph_format = "turtle"
//! reauthenticate_on_401 = true
//! ```

use std::fmt;
use std::path::Path;
use std::time::Duration;

use fdp_vocab::GraphFormat;
use serde::Deserialize;

use crate::error::ConfigError;

/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for one repository.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Repository base URL, without trailing slash.
    pub base_url: String,
    /// Login email.
    pub email: String,
    /// Login password.
    pub password: String,
    /// Upper bound on every request.
    pub timeout: Duration,
    /// Skip TLS certificate verification.
    pub insecure: bool,
    /// Graph serialization used when a request does not name one.
    pub graph_format: GraphFormat,
    /// Log in again and retry once when a request is answered with 401.
    pub reauthenticate_on_401: bool,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("insecure", &self.insecure)
            .field("graph_format", &self.graph_format)
            .field("reauthenticate_on_401", &self.reauthenticate_on_401)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    email: Option<String>,
    password: Option<String>,
    timeout_secs: Option<u64>,
    insecure: Option<bool>,
    graph_format: Option<GraphFormat>,
    reauthenticate_on_401: Option<bool>,
    user_agent: Option<String>,
}

impl ClientConfig {
    /// Settings for `base_url` with the given credentials and defaults for
    /// everything else.
    pub fn new(
        base_url: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: trim_base(base_url.into()),
            email: email.into(),
            password: password.into(),
            timeout: DEFAULT_TIMEOUT,
            insecure: false,
            graph_format: GraphFormat::default(),
            reauthenticate_on_401: false,
            user_agent: concat!("fdp-client/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables or disables TLS certificate verification.
    #[must_use]
    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Sets the default graph serialization.
    #[must_use]
    pub fn with_graph_format(mut self, format: GraphFormat) -> Self {
        self.graph_format = format;
        self
    }

    /// Enables the re-login-and-retry-once behavior on 401.
    #[must_use]
    pub fn with_reauthentication(mut self, enabled: bool) -> Self {
        self.reauthenticate_on_401 = enabled;
        self
    }

    /// Sets the `User-Agent` header value.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Parses TOML settings. Missing keys take their defaults; credentials
    /// and base URL may be left out and supplied later.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] for malformed or unknown keys and
    /// [`ConfigError::Invalid`] for an unusable timeout.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        let mut config = ClientConfig::new(
            file.base_url.unwrap_or_default(),
            file.email.unwrap_or_default(),
            file.password.unwrap_or_default(),
        );
        if let Some(secs) = file.timeout_secs {
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    field: "timeout_secs",
                    message: "must be greater than zero".to_owned(),
                });
            }
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(insecure) = file.insecure {
            config.insecure = insecure;
        }
        if let Some(format) = file.graph_format {
            config.graph_format = format;
        }
        if let Some(enabled) = file.reauthenticate_on_401 {
            config.reauthenticate_on_401 = enabled;
        }
        if let Some(user_agent) = file.user_agent {
            config.user_agent = user_agent;
        }
        Ok(config)
    }

    /// Reads TOML settings from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Applies `FDP_BASE_URL`, `FDP_EMAIL`, `FDP_PASSWORD` and
    /// `FDP_INSECURE` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `FDP_INSECURE` is not a boolean.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(base_url) = lookup("FDP_BASE_URL") {
            self.base_url = trim_base(base_url);
        }
        if let Some(email) = lookup("FDP_EMAIL") {
            self.email = email;
        }
        if let Some(password) = lookup("FDP_PASSWORD") {
            self.password = password;
        }
        if let Some(insecure) = lookup("FDP_INSECURE") {
            self.insecure = parse_flag(&insecure).ok_or_else(|| ConfigError::Invalid {
                field: "FDP_INSECURE",
                message: format!("expected true or false, found {insecure:?}"),
            })?;
        }
        Ok(self)
    }

    /// Checks that the settings are complete enough to connect.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first unusable setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| ConfigError::Invalid {
            field: "base_url",
            message: format!("{:?}: {e}", self.base_url),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                field: "base_url",
                message: format!("unsupported scheme {}", url.scheme()),
            });
        }
        if self.email.is_empty() {
            return Err(ConfigError::Invalid {
                field: "email",
                message: "must not be empty".to_owned(),
            });
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid {
                field: "timeout",
                message: "must be greater than zero".to_owned(),
            });
        }
        Ok(())
    }
}

fn trim_base(base_url: String) -> String {
    base_url.trim_end_matches('/').to_owned()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_overrides_defaults() {
        let config = ClientConfig::from_toml_str(
            r#"
            base_url = "https://fdp.example.org/"
            email = "albert.einstein@example.com"
            password = "password"
            timeout_secs = 5
            graph_format = "n-triples"
            reauthenticate_on_401 = true
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url, "https://fdp.example.org");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.graph_format, GraphFormat::NTriples);
        assert!(config.reauthenticate_on_401);
        assert!(!config.insecure);
        config.validate().unwrap();
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            ClientConfig::from_toml_str("token = \"abc\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(matches!(
            ClientConfig::from_toml_str("timeout_secs = 0"),
            Err(ConfigError::Invalid { field: "timeout_secs", .. })
        ));
    }

    #[test]
    fn env_values_take_precedence() {
        let config = ClientConfig::new("https://a.example.org", "a@example.org", "a")
            .with_overrides(|key| match key {
                "FDP_BASE_URL" => Some("https://b.example.org/".to_owned()),
                "FDP_INSECURE" => Some("true".to_owned()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.base_url, "https://b.example.org");
        assert_eq!(config.email, "a@example.org");
        assert!(config.insecure);

        let err = ClientConfig::new("https://a.example.org", "a@example.org", "a")
            .with_overrides(|key| (key == "FDP_INSECURE").then(|| "maybe".to_owned()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "FDP_INSECURE", .. }));
    }

    #[test]
    fn validation_catches_missing_settings() {
        assert!(ClientConfig::new("", "a@example.org", "a").validate().is_err());
        assert!(ClientConfig::new("ftp://fdp.example.org", "a@example.org", "a")
            .validate()
            .is_err());
        assert!(ClientConfig::new("https://fdp.example.org", "", "a").validate().is_err());
    }

    #[test]
    fn debug_redacts_password() {
        let config = ClientConfig::new("https://fdp.example.org", "a@example.org", "s3cret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fdp.toml");
        std::fs::write(&path, "base_url = \"http://localhost:8080\"\ninsecure = true\n").unwrap();
        let config = ClientConfig::from_file(&path).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert!(config.insecure);
        assert!(matches!(
            ClientConfig::from_file(dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
