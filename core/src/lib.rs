//! Pool manager and multi-source orchestrator for a rotating,
//! authenticated HTTP/SOCKS5 proxy pool.
//!
//! `Proxy` (the bounded pool manager) sits on top of `Socker`
//! (the multi-source orchestrator), which in turn multiplexes an
//! ordered list of `ProxySource` adapters. Concrete vendor
//! adapters, the downstream HTTP client consuming a `ProxyConnection`,
//! and active health-check validators are all external collaborators
//! injected through the `ProxySource` and `Validator` traits — this
//! crate only implements the coordination logic between them.

pub mod error;
pub mod events;
pub mod orchestrator;
pub mod pool;
pub mod source;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{Error, Result};
pub use events::{Event, EventBus};
pub use orchestrator::{Socker, SourceHealth};
pub use pool::{ItemStatus, PoolStats, PoolStatus, Proxy, ProxyConfig};
pub use source::{NullValidator, ProxySource, Validator};
pub use types::{Classification, Endpoint, ProxyConnection, ProxyItem, Scheme};
