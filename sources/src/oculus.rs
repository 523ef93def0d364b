//! Multi-pull, API-based provider adapter (archetype: Oculus).
//!
//! `fetch(n)` POSTs an order against the vendor's REST endpoint and
//! parses a JSON array of `host:port:user:pass` strings into
//! `ProxyItem`s. `release` is a documented no-op: Oculus-style vendors
//! expire sessions server-side, so there is nothing for the core to
//! tell them.

use async_trait::async_trait;
use serde::Serialize;
use socker_core::error::{Error, Result};
use socker_core::{Classification, Endpoint, ProxyItem, ProxySource, Scheme};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Construction-time settings for an Oculus-style order.
#[derive(Debug, Clone)]
pub struct OculusConfig {
    pub tag: String,
    pub endpoint: String,
    pub auth_header_value: String,
    pub order_token: String,
    pub plan_type: String,
    pub country: Option<String>,
    pub enable_socks5: bool,
    pub white_list_ip: Vec<String>,
    pub classification: Option<Classification>,
}

#[derive(Debug, Serialize)]
struct OrderRequest<'a> {
    #[serde(rename = "orderToken")]
    order_token: &'a str,
    #[serde(rename = "planType")]
    plan_type: &'a str,
    #[serde(rename = "numberOfProxies")]
    number_of_proxies: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<&'a str>,
    #[serde(rename = "enableSocks5")]
    enable_socks5: bool,
    #[serde(rename = "whiteListIP")]
    white_list_ip: &'a [String],
}

pub struct OculusSource {
    config: OculusConfig,
    client: reqwest::Client,
}

impl OculusSource {
    pub fn new(config: OculusConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(config: OculusConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn parse_proxy_string(&self, raw: &str) -> Option<ProxyItem> {
        // Expected vendor format: "host:port:user:pass"
        let mut parts = raw.splitn(4, ':');
        let host = parts.next()?;
        let port: u16 = parts.next()?.parse().ok()?;
        let username = parts.next();
        let password = parts.next();

        let mut endpoint = Endpoint::new(
            host,
            port,
            if self.config.enable_socks5 {
                Scheme::Socks5
            } else {
                Scheme::Http
            },
        );
        endpoint.username = username.map(str::to_string);
        endpoint.password = password.map(str::to_string);
        endpoint.classification = self.config.classification;
        endpoint.country = self.config.country.clone();

        // host:port can recur across separate orders (the vendor reassigns
        // exit nodes), but each order grants a distinct session, so the id
        // can't be derived from the endpoint alone.
        let id = format!("{}-{}", self.config.tag, Uuid::new_v4());
        Some(ProxyItem::new(id, self.config.tag.clone(), endpoint))
    }
}

#[async_trait]
impl ProxySource for OculusSource {
    fn tag(&self) -> &str {
        &self.config.tag
    }

    #[instrument(skip(self), fields(tag = %self.config.tag, count))]
    async fn fetch(&self, count: usize) -> Result<Vec<ProxyItem>> {
        let body = OrderRequest {
            order_token: &self.config.order_token,
            plan_type: &self.config.plan_type,
            number_of_proxies: count,
            country: self.config.country.as_deref(),
            enable_socks5: self.config.enable_socks5,
            white_list_ip: &self.config.white_list_ip,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Authorization", &self.config.auth_header_value)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::source_fetch(&self.config.tag, e))?;

        if !response.status().is_success() {
            let err_code = response
                .headers()
                .get("x-tlp-err-code")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            let err_msg = response
                .headers()
                .get("x-tlp-err-msg")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("no message")
                .to_string();
            warn!(err_code, err_msg = %err_msg, "oculus order rejected");
            return Err(Error::source_fetch(
                &self.config.tag,
                format!("[{err_code}] {err_msg}"),
            ));
        }

        let raw: Vec<String> = response
            .json()
            .await
            .map_err(|e| Error::source_fetch(&self.config.tag, e))?;

        let items: Vec<ProxyItem> = raw.iter().filter_map(|s| self.parse_proxy_string(s)).collect();
        debug!(returned = raw.len(), parsed = items.len(), "oculus fetch complete");

        // Don't return more than requested even if the vendor over-delivers.
        Ok(items.into_iter().take(count).collect())
    }

    fn supports_release(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> OculusSource {
        OculusSource::new(OculusConfig {
            tag: "oculus".to_string(),
            endpoint: "https://example.invalid/order".to_string(),
            auth_header_value: "token".to_string(),
            order_token: "ORD-1".to_string(),
            plan_type: "residential".to_string(),
            country: Some("US".to_string()),
            enable_socks5: false,
            white_list_ip: vec![],
            classification: Some(Classification::Residential),
        })
    }

    #[test]
    fn parses_host_port_user_pass() {
        let item = source()
            .parse_proxy_string("proxy.example.com:8000:alice:s3cr3t")
            .expect("should parse");
        assert_eq!(item.endpoint.host, "proxy.example.com");
        assert_eq!(item.endpoint.port, 8000);
        assert_eq!(item.endpoint.username.as_deref(), Some("alice"));
        assert_eq!(item.endpoint.password.as_deref(), Some("s3cr3t"));
        assert_eq!(item.endpoint.country.as_deref(), Some("US"));
    }

    #[test]
    fn rejects_malformed_entries() {
        assert!(source().parse_proxy_string("not-a-valid-entry").is_none());
        assert!(source().parse_proxy_string("host:not-a-port:u:p").is_none());
    }

    #[test]
    fn never_implements_release() {
        assert!(!source().supports_release());
    }
}
