//! Configuration types for the DDNS refresh
//!
//! This module defines all configuration structures used throughout the crate.
//! The binary fills them from CLI flags and environment variables.

use serde::{Deserialize, Serialize};

/// Default IPv4-only lookup endpoint
pub const DEFAULT_IPV4_URL: &str = "https://ipv4.icanhazip.com";

/// Default IPv6-only lookup endpoint
pub const DEFAULT_IPV6_URL: &str = "https://ipv6.icanhazip.com";

/// Main refresh configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Which hostname and domain to refresh
    #[serde(default)]
    pub target: TargetConfig,

    /// Whether created/updated records are proxied
    #[serde(default)]
    pub proxied: bool,

    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// IP lookup configuration
    #[serde(default)]
    pub ip_source: IpSourceConfig,
}

impl RefreshConfig {
    /// Create a configuration for a provider with all other settings defaulted
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            target: TargetConfig::default(),
            proxied: false,
            provider,
            ip_source: IpSourceConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.provider.validate()?;
        self.ip_source.validate()?;

        Ok(())
    }
}

/// Hostname and domain overrides
///
/// `None` or an empty string means "derive it".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Hostname to refresh (default: machine hostname)
    pub hostname: Option<String>,

    /// Domain to refresh (default: registrable domain of the hostname)
    pub domain: Option<String>,
}

impl TargetConfig {
    /// Hostname override, if one was actually given
    pub fn hostname_override(&self) -> Option<&str> {
        non_empty(self.hostname.as_deref())
    }

    /// Domain override, if one was actually given
    pub fn domain_override(&self) -> Option<&str> {
        non_empty(self.domain.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// DNS provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Cloudflare provider
    Cloudflare {
        /// Cloudflare API token
        api_token: String,
        /// Perform reads only, log intended changes
        #[serde(default)]
        dry_run: bool,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Cloudflare { api_token, .. } => {
                if api_token.trim().is_empty() {
                    return Err(crate::Error::config(
                        "Missing --token flag or CLOUDFLARE_API_TOKEN environment variable",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Cloudflare { .. } => "cloudflare",
        }
    }
}

/// IP lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpSourceConfig {
    /// URL returning the IPv4 address as plain text
    #[serde(default = "default_ipv4_url")]
    pub ipv4_url: String,

    /// URL returning the IPv6 address as plain text
    #[serde(default = "default_ipv6_url")]
    pub ipv6_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl IpSourceConfig {
    /// Validate the IP lookup configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        for (name, url) in [("IPv4", &self.ipv4_url), ("IPv6", &self.ipv6_url)] {
            if url.is_empty() {
                return Err(crate::Error::config(format!(
                    "{} lookup URL cannot be empty",
                    name
                )));
            }
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(crate::Error::config(format!(
                    "{} lookup URL must use HTTP or HTTPS scheme. Got: {}",
                    name, url
                )));
            }
        }

        if !(1..=300).contains(&self.timeout_secs) {
            return Err(crate::Error::config(format!(
                "IP lookup timeout must be between 1 and 300 seconds. Got: {}",
                self.timeout_secs
            )));
        }

        Ok(())
    }
}

impl Default for IpSourceConfig {
    fn default() -> Self {
        Self {
            ipv4_url: default_ipv4_url(),
            ipv6_url: default_ipv6_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_ipv4_url() -> String {
    DEFAULT_IPV4_URL.to_string()
}

fn default_ipv6_url() -> String {
    DEFAULT_IPV6_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}
