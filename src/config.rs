//! Client configuration
//!
//! `ClientConfig` is loaded from YAML and carries everything the data layer
//! needs at construction time: base URL, header policy, the envelope
//! success sentinel, paging defaults and per-kind endpoint overrides.

use crate::auth::AuthorizerConfig;
use crate::envelope::DEFAULT_SUCCESS_CODE;
use crate::error::{Error, Result};
use crate::resource::ResourceKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Complete client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every endpoint path is joined onto
    pub base_url: String,

    /// Value of the `Accept-Language` header on authorized requests
    #[serde(default = "default_locale")]
    pub locale: String,

    /// URL substrings whose requests never carry a credential
    #[serde(default = "default_exempt_hosts")]
    pub exempt_hosts: Vec<String>,

    /// Envelope code that means success
    #[serde(default = "default_success_code")]
    pub success_code: i64,

    /// Page size used when the caller gives none
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Transport timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-kind endpoint overrides
    #[serde(default)]
    pub endpoints: HashMap<ResourceKind, EndpointOverride>,
}

/// Override of a kind's default path or fixed code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointOverride {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub code: Option<i32>,
}

fn default_locale() -> String {
    "zh".to_string()
}

fn default_exempt_hosts() -> Vec<String> {
    vec!["aliyuncs.com".to_string()]
}

fn default_success_code() -> i64 {
    DEFAULT_SUCCESS_CODE
}

fn default_page_size() -> u32 {
    20
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("devpage/{}", env!("CARGO_PKG_VERSION"))
}

impl ClientConfig {
    /// Create a config with defaults for everything but the base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            locale: default_locale(),
            exempt_hosts: default_exempt_hosts(),
            success_code: default_success_code(),
            default_page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            endpoints: HashMap::new(),
        }
    }

    /// Create a new config builder
    pub fn builder(base_url: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::new(base_url),
        }
    }

    /// Load and validate a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parse and validate a config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field constraints
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.default_page_size == 0 {
            return Err(Error::config("default_page_size must be at least 1"));
        }
        if self.exempt_hosts.iter().any(String::is_empty) {
            return Err(Error::config("exempt_hosts must not contain empty entries"));
        }
        Ok(())
    }

    /// Header policy for the request authorizer
    pub fn authorizer_config(&self) -> AuthorizerConfig {
        AuthorizerConfig {
            exempt_hosts: self.exempt_hosts.clone(),
            locale: self.locale.clone(),
        }
    }

    /// Transport timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Builder for client config
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the locale header value
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.config.locale = locale.into();
        self
    }

    /// Add an exempt host substring
    pub fn exempt_host(mut self, host: impl Into<String>) -> Self {
        self.config.exempt_hosts.push(host.into());
        self
    }

    /// Set the envelope success code
    pub fn success_code(mut self, code: i64) -> Self {
        self.config.success_code = code;
        self
    }

    /// Set the default page size
    pub fn default_page_size(mut self, size: u32) -> Self {
        self.config.default_page_size = size;
        self
    }

    /// Set the transport timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_secs = timeout.as_secs();
        self
    }

    /// Override a kind's endpoint
    pub fn endpoint(mut self, kind: ResourceKind, path: Option<&str>, code: Option<i32>) -> Self {
        self.config.endpoints.insert(
            kind,
            EndpointOverride {
                path: path.map(String::from),
                code,
            },
        );
        self
    }

    /// Validate and build the config
    pub fn build(self) -> Result<ClientConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
