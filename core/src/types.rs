//! The pool's data model: `ProxyItem`, `Endpoint`, and the caller-facing
//! `ProxyConnection` projection.

use chrono::{DateTime, Utc};

/// Wire-level protocol a proxy endpoint speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Scheme {
    Http,
    Https,
    Socks5,
}

/// Vendor classification of the IP behind a proxy endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Classification {
    Datacenter,
    Residential,
}

/// Host/port/credentials for a single proxy endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub scheme: Scheme,
    pub username: Option<String>,
    pub password: Option<String>,
    pub classification: Option<Classification>,
    pub country: Option<String>,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16, scheme: Scheme) -> Self {
        Self {
            host: host.into(),
            port,
            scheme,
            username: None,
            password: None,
            classification: None,
            country: None,
        }
    }
}

/// The pool's internal record of a usable proxy.
///
/// `in_use` starts `false`, is set by exclusive acquisition, and is
/// never cleared back — items are removed from the pool, not recycled.
#[derive(Debug, Clone)]
pub struct ProxyItem {
    pub id: String,
    pub source: String,
    pub endpoint: Endpoint,
    pub ttl_seconds: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub in_use: bool,
}

impl ProxyItem {
    pub fn new(id: impl Into<String>, source: impl Into<String>, endpoint: Endpoint) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            endpoint,
            ttl_seconds: None,
            created_at: Utc::now(),
            in_use: false,
        }
    }

    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.created_at
    }
}

/// The external view handed to callers: a projection of `ProxyItem`
/// that never exposes `in_use` or `source` internals beyond the tag.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProxyConnection {
    pub id: String,
    pub endpoint: Endpoint,
    pub classification: Option<Classification>,
    pub country: Option<String>,
}

impl From<&ProxyItem> for ProxyConnection {
    fn from(item: &ProxyItem) -> Self {
        Self {
            id: item.id.clone(),
            endpoint: item.endpoint.clone(),
            classification: item.endpoint.classification,
            country: item.endpoint.country.clone(),
        }
    }
}
