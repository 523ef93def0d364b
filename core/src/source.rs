//! `ProxySource` — the external contract the core consumes from
//! per-provider adapters.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ProxyItem;

/// Per-provider adapter. `fetch` is required; `release` and `validate`
/// are optional extension points gated by capability reflection, so
/// the orchestrator only routes calls to sources that implement them.
#[async_trait]
pub trait ProxySource: Send + Sync {
    /// A short tag identifying this provider in events and errors.
    fn tag(&self) -> &str;

    /// Request up to `count` items. May return fewer; must never
    /// return more than requested. Fails with a fetch error when the
    /// provider is unreachable, denies the request, returns malformed
    /// data, or has nothing to serve.
    async fn fetch(&self, count: usize) -> Result<Vec<ProxyItem>>;

    /// Whether this source implements `release`. Default `false`.
    fn supports_release(&self) -> bool {
        false
    }

    /// Inform the source that the core has dropped this item.
    /// Best-effort; the default implementation is a no-op and is never
    /// called unless `supports_release()` returns `true`.
    async fn release(&self, _id: &str) -> Result<()> {
        Ok(())
    }

    /// Whether this source implements `validate`. Default `false`.
    fn supports_validate(&self) -> bool {
        false
    }

    /// Source-level sanity check (e.g. "this id belongs to me"). Not
    /// used for active liveness in the current design.
    async fn validate(&self, _item: &ProxyItem) -> bool {
        true
    }
}

/// Reserved extension point for active health checks. The current
/// design ships only a stub that always returns `false`.
#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(&self, connection: &crate::types::ProxyConnection) -> bool;
}

/// Default `Validator`: always reports the connection as invalid. A
/// real validator (e.g. probing the endpoint) can replace this later;
/// until then nothing gets a free pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullValidator;

#[async_trait]
impl Validator for NullValidator {
    async fn validate(&self, _connection: &crate::types::ProxyConnection) -> bool {
        false
    }
}
