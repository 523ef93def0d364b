//! `Socker` — multiplexes a list of heterogeneous `ProxySource`s behind
//! one `fetch`/`release` surface.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};
use crate::events::{Event, EventBus};
use crate::source::ProxySource;
use crate::types::ProxyItem;

/// Diagnostic probe result for a single source.
#[derive(Debug, Clone)]
pub struct SourceHealth {
    pub source_tag: String,
    pub healthy: bool,
    pub probed_at: DateTime<Utc>,
    pub error: Option<String>,
}

/// Holds an ordered, immutable list of sources. Order is semantic: the
/// first source is primary, subsequent ones are strict fallbacks. The
/// orchestrator never retries internally — retry discipline belongs to
/// the pool manager or the caller.
pub struct Socker {
    sources: Vec<Arc<dyn ProxySource>>,
    events: Arc<EventBus>,
}

impl Socker {
    pub fn new(sources: Vec<Arc<dyn ProxySource>>, events: Arc<EventBus>) -> Self {
        Self { sources, events }
    }

    /// Iterate sources in configured order. Return the first
    /// non-empty batch; do not aggregate across sources — a partial
    /// batch from multiple sources would complicate attribution and
    /// release.
    #[instrument(skip(self), fields(n))]
    pub async fn replenish(&self, n: usize) -> Result<Vec<ProxyItem>> {
        let mut last_error = String::new();

        for source in &self.sources {
            match source.fetch(n).await {
                Ok(items) if !items.is_empty() => {
                    debug!(source = source.tag(), count = items.len(), "replenish succeeded");
                    return Ok(items);
                }
                Ok(_) => {
                    let msg = "returned an empty batch".to_string();
                    self.emit_source_failed(source.tag(), &msg);
                    last_error = format!("{}: {}", source.tag(), msg);
                }
                Err(e) => {
                    self.emit_source_failed(source.tag(), &e.to_string());
                    last_error = format!("{}: {}", source.tag(), e);
                }
            }
        }

        Err(Error::AllSourcesExhausted(last_error))
    }

    /// Dispatch `release(id)` to every source that implements it,
    /// concurrently; await all completions. Per-source failures are
    /// captured as events but never fail the call — an item's true
    /// origin may be unknown by discard time, and vendor release
    /// endpoints are idempotent.
    #[instrument(skip(self))]
    pub async fn release(&self, id: &str) {
        let capable: Vec<_> = self
            .sources
            .iter()
            .filter(|s| s.supports_release())
            .collect();

        let calls = capable.iter().map(|source| {
            let id = id.to_string();
            async move {
                if let Err(e) = source.release(&id).await {
                    Err(Error::source_release(source.tag(), e))
                } else {
                    Ok(())
                }
            }
        });

        for result in join_all(calls).await {
            if let Err(e) = result {
                warn!(error = %e, "source release failed");
                self.events.emit(Event::ProxyReleaseFailed {
                    at: Utc::now(),
                    error: e.to_string(),
                });
            }
        }
    }

    /// For each source, attempt `fetch(1)` and report health. A
    /// diagnostic call, not used by the hot path.
    pub async fn health(&self) -> Vec<SourceHealth> {
        let mut out = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let probed_at = Utc::now();
            match source.fetch(1).await {
                Ok(items) if !items.is_empty() => out.push(SourceHealth {
                    source_tag: source.tag().to_string(),
                    healthy: true,
                    probed_at,
                    error: None,
                }),
                Ok(_) => out.push(SourceHealth {
                    source_tag: source.tag().to_string(),
                    healthy: false,
                    probed_at,
                    error: Some("empty batch".to_string()),
                }),
                Err(e) => out.push(SourceHealth {
                    source_tag: source.tag().to_string(),
                    healthy: false,
                    probed_at,
                    error: Some(e.to_string()),
                }),
            }
        }
        out
    }

    fn emit_source_failed(&self, source_tag: &str, error: &str) {
        self.events.emit(Event::SourceFailed {
            at: Utc::now(),
            source_tag: source_tag.to_string(),
            error: error.to_string(),
        });
    }
}
