// # HTTP IP Source
//
// This crate provides an HTTP-based IP source for the DDNS refresh.
//
// ## Architecture
//
// Fetches the machine's public address from a plain-text "what is my IP"
// service (e.g. ipv4.icanhazip.com / ipv6.icanhazip.com). Each source
// serves one family: the endpoint is expected to be reachable only over
// that family, and any answer of the other family is rejected.
//
// One request per `current()` call. No polling, no caching, no fallback
// endpoints.

use ddns_core::config::IpSourceConfig;
use ddns_core::traits::{IpSource, IpVersion};
use ddns_core::{Error, Result};

use std::net::IpAddr;
use std::time::Duration;

/// Default request timeout for lookups
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based IP source for one address family
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// IP version this source answers for
    version: IpVersion,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source with the default timeout
    ///
    /// # Parameters
    ///
    /// - `url`: URL returning the address as plain text
    /// - `version`: Family the URL answers for
    pub fn new(url: impl Into<String>, version: IpVersion) -> Result<Self> {
        Self::with_timeout(url, version, DEFAULT_TIMEOUT)
    }

    /// Create with a custom request timeout
    pub fn with_timeout(
        url: impl Into<String>,
        version: IpVersion,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            version,
            client,
        })
    }

    /// Create the source for `version` from configuration
    pub fn from_config(config: &IpSourceConfig, version: IpVersion) -> Result<Self> {
        let url = match version {
            IpVersion::V4 => &config.ipv4_url,
            IpVersion::V6 => &config.ipv6_url,
        };

        Self::with_timeout(url.clone(), version, Duration::from_secs(config.timeout_secs))
    }

    /// URL this source queries
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch current IP from HTTP service
    async fn fetch_ip(&self) -> Result<IpAddr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::ip_source(format!("Request to {} failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(Error::ip_source(format!(
                "{} returned HTTP {}",
                self.url,
                response.status()
            )));
        }

        let ip_text = response
            .text()
            .await
            .map_err(|e| Error::ip_source(format!("Failed to read response: {}", e)))?;

        parse_ip(&ip_text, self.version)
    }
}

/// Parse a lookup response body as an address of `version`
pub fn parse_ip(body: &str, version: IpVersion) -> Result<IpAddr> {
    let ip_text = body.trim();

    let ip: IpAddr = ip_text
        .parse()
        .map_err(|_| Error::ip_source(format!("Invalid IP address: {:?}", ip_text)))?;

    if !version.matches(&ip) {
        return Err(Error::ip_source(format!("Expected {}, got: {}", version, ip)));
    }

    Ok(ip)
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<IpAddr> {
        let ip = self.fetch_ip().await?;
        tracing::debug!("{} lookup via {} returned {}", self.version, self.url, ip);
        Ok(ip)
    }

    fn version(&self) -> IpVersion {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_ip_trims_whitespace() {
        assert_eq!(
            parse_ip("203.0.113.5\n", IpVersion::V4).unwrap(),
            IpAddr::from([203, 0, 113, 5])
        );
        assert_eq!(
            parse_ip("  2001:db8::1 \r\n", IpVersion::V6).unwrap(),
            "2001:db8::1".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn test_parse_ip_rejects_wrong_family() {
        assert!(parse_ip("2001:db8::1", IpVersion::V4).is_err());
        assert!(parse_ip("203.0.113.5", IpVersion::V6).is_err());
    }

    #[test]
    fn test_parse_ip_rejects_garbage() {
        assert!(parse_ip("", IpVersion::V4).is_err());
        assert!(parse_ip("<html>blocked</html>", IpVersion::V4).is_err());
        assert!(parse_ip("203.0.113.5 203.0.113.6", IpVersion::V4).is_err());
    }

    #[test]
    fn test_from_config_picks_family_url() {
        let config = IpSourceConfig::default();

        let v4 = HttpIpSource::from_config(&config, IpVersion::V4).unwrap();
        let v6 = HttpIpSource::from_config(&config, IpVersion::V6).unwrap();

        assert_eq!(v4.url(), "https://ipv4.icanhazip.com");
        assert_eq!(v4.version(), IpVersion::V4);
        assert_eq!(v6.url(), "https://ipv6.icanhazip.com");
        assert_eq!(v6.version(), IpVersion::V6);
    }

    #[tokio::test]
    async fn test_current_reads_plain_text_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("203.0.113.5\n"))
            .expect(1)
            .mount(&server)
            .await;

        let source = HttpIpSource::new(server.uri(), IpVersion::V4).unwrap();
        assert_eq!(source.current().await.unwrap(), IpAddr::from([203, 0, 113, 5]));
    }

    #[tokio::test]
    async fn test_current_fails_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("203.0.113.5"))
            .expect(1)
            .mount(&server)
            .await;

        let source = HttpIpSource::new(server.uri(), IpVersion::V4).unwrap();
        let err = source.current().await.unwrap_err();
        assert!(matches!(err, Error::IpSource(_)));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_current_fails_on_wrong_family() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("203.0.113.5"))
            .mount(&server)
            .await;

        let source = HttpIpSource::new(server.uri(), IpVersion::V6).unwrap();
        assert!(source.current().await.is_err());
    }

    #[tokio::test]
    async fn test_current_fails_when_unreachable() {
        let source = HttpIpSource::with_timeout(
            "http://127.0.0.1:9/",
            IpVersion::V4,
            Duration::from_secs(1),
        )
        .unwrap();

        let err = source.current().await.unwrap_err();
        assert!(matches!(err, Error::IpSource(_)));
    }

    #[tokio::test]
    async fn test_current_honours_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("203.0.113.5")
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let source =
            HttpIpSource::with_timeout(server.uri(), IpVersion::V4, Duration::from_millis(200))
                .unwrap();
        assert!(source.current().await.is_err());
    }
}
