//! `Proxy` — the bounded, low-water-refilling pool manager.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result};
use crate::events::{Event, EventBus};
use crate::orchestrator::Socker;
use crate::source::{NullValidator, Validator};
use crate::types::{ProxyConnection, ProxyItem};

/// Construction-time configuration.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub pool_size: usize,
    pub low_water_fraction: f64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            pool_size: 20,
            low_water_fraction: 0.3,
        }
    }
}

/// Read-only aggregate counters.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PoolStats {
    pub size: usize,
    pub unused_count: usize,
    pub target_size: usize,
    pub low_water_fraction: f64,
    pub last_refresh: Option<DateTime<Utc>>,
    pub refilling: bool,
}

/// Per-item introspection record.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ItemStatus {
    pub id: String,
    pub source: String,
    pub in_use: bool,
    pub age_seconds: i64,
}

/// Full pool + flag snapshot.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PoolStatus {
    pub initialized: bool,
    pub refilling: bool,
    pub last_refresh: Option<DateTime<Utc>>,
    pub items: Vec<ItemStatus>,
}

struct PoolState {
    items: Vec<ProxyItem>,
    last_refresh: Option<DateTime<Utc>>,
}

struct Shared {
    orchestrator: Socker,
    events: Arc<EventBus>,
    validator: Arc<dyn Validator>,
    target_size: usize,
    low_water_fraction: f64,
    /// Gates concurrent `init()` attempts; held across the `await` so
    /// only one caller actually replenishes the initial pool.
    init_lock: tokio::sync::Mutex<()>,
    initialized: AtomicBool,
    /// At most one refill task outstanding at a time (invariant 4).
    refilling: AtomicBool,
    pool: parking_lot::Mutex<PoolState>,
}

/// RAII guard clearing the `refilling` latch on drop, so a panic
/// inside the refill task never permanently blocks future refills.
struct RefillGuard {
    shared: Arc<Shared>,
}

impl Drop for RefillGuard {
    fn drop(&mut self) {
        self.shared.refilling.store(false, Ordering::Release);
    }
}

/// The bounded pool manager. Cheap to clone: internally an `Arc`.
#[derive(Clone)]
pub struct Proxy {
    shared: Arc<Shared>,
}

impl Proxy {
    pub fn new(orchestrator: Socker, events: Arc<EventBus>, config: ProxyConfig) -> Self {
        Self::with_validator(orchestrator, events, config, Arc::new(NullValidator))
    }

    pub fn with_validator(
        orchestrator: Socker,
        events: Arc<EventBus>,
        config: ProxyConfig,
        validator: Arc<dyn Validator>,
    ) -> Self {
        let shared = Shared {
            orchestrator,
            events,
            validator,
            target_size: config.pool_size,
            low_water_fraction: config.low_water_fraction,
            init_lock: tokio::sync::Mutex::new(()),
            initialized: AtomicBool::new(false),
            refilling: AtomicBool::new(false),
            pool: parking_lot::Mutex::new(PoolState {
                items: Vec::new(),
                last_refresh: None,
            }),
        };
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Idempotent. If already initialized, returns immediately without
    /// touching the orchestrator.
    #[instrument(skip(self))]
    pub async fn init(&self) -> Result<()> {
        if self.shared.initialized.load(Ordering::Acquire) {
            return Ok(());
        }

        let _guard = self.shared.init_lock.lock().await;
        // Re-check: another caller may have finished init while we
        // waited for the lock.
        if self.shared.initialized.load(Ordering::Acquire) {
            return Ok(());
        }

        match self.shared.orchestrator.replenish(self.shared.target_size).await {
            Ok(items) => {
                let size = items.len();
                {
                    let mut pool = self.shared.pool.lock();
                    pool.items = items;
                    pool.last_refresh = Some(Utc::now());
                }
                self.shared.initialized.store(true, Ordering::Release);
                info!(size, "pool initialized");
                self.shared.events.emit(Event::PoolInitialized {
                    at: Utc::now(),
                    size,
                });
                Ok(())
            }
            Err(cause) => {
                warn!(error = %cause, "pool init failed");
                self.shared.events.emit(Event::PoolInitFailed {
                    at: Utc::now(),
                    error: cause.to_string(),
                });
                Err(Error::init_failed(cause))
            }
        }
    }

    /// Non-exclusive peek: returns the first unused item without
    /// mutating state.
    pub fn acquire(&self) -> Result<ProxyConnection> {
        self.require_initialized()?;
        let pool = self.shared.pool.lock();
        pool.items
            .iter()
            .find(|item| !item.in_use)
            .map(ProxyConnection::from)
            .ok_or(Error::PoolExhausted)
    }

    /// Marks the chosen item `in_use` and, if the post-marking unused
    /// count has crossed the low-water line, fires a background
    /// refill. Never waits on I/O itself.
    #[instrument(skip(self))]
    pub fn acquire_exclusive(&self) -> Result<ProxyConnection> {
        self.require_initialized()?;

        let (connection, should_refill) = {
            let mut pool = self.shared.pool.lock();
            let idx = pool
                .items
                .iter()
                .position(|item| !item.in_use)
                .ok_or(Error::PoolExhausted)?;

            pool.items[idx].in_use = true;
            let connection = ProxyConnection::from(&pool.items[idx]);

            let unused_count = pool.items.iter().filter(|i| !i.in_use).count();
            let low_water = (self.shared.target_size as f64) * self.shared.low_water_fraction;
            let should_refill = (unused_count as f64) <= low_water;

            (connection, should_refill)
        };

        if should_refill
            && self
                .shared
                .refilling
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
        {
            debug!("low-water line crossed, spawning background refill");
            Self::spawn_refill(self.shared.clone());
        }

        Ok(connection)
    }

    /// Local-only eviction: removes the item on failure but does not
    /// notify sources (a client-side symptom shouldn't punish the
    /// provider). Fails with `NotInitialized` per invariant 3; this is
    /// the only failure mode — a source can never reject a call that
    /// reaches the pool.
    pub fn reject(&self, connection: &ProxyConnection) -> Result<()> {
        self.require_initialized()?;
        let mut pool = self.shared.pool.lock();
        pool.items.retain(|item| item.id != connection.id);
        Ok(())
    }

    /// Local eviction plus source notification. No-op locally if the
    /// id is not in the pool, but source release is still dispatched.
    /// Fails with `NotInitialized` per invariant 3; once past that
    /// check, discard itself never fails — a source release failure
    /// only ever surfaces as a `proxy.release.failed` event.
    pub fn discard(&self, connection: &ProxyConnection) -> Result<()> {
        self.require_initialized()?;
        {
            let mut pool = self.shared.pool.lock();
            pool.items.retain(|item| item.id != connection.id);
        }

        let shared = self.shared.clone();
        let id = connection.id.clone();
        tokio::spawn(async move {
            shared.orchestrator.release(&id).await;
        });
        Ok(())
    }

    /// Delegates to the injected `Validator`. Reserved extension
    /// point; the default validator always returns `false`.
    pub async fn validate(&self, connection: &ProxyConnection) -> bool {
        self.shared.validator.validate(connection).await
    }

    pub fn stats(&self) -> PoolStats {
        let pool = self.shared.pool.lock();
        let unused_count = pool.items.iter().filter(|i| !i.in_use).count();
        PoolStats {
            size: pool.items.len(),
            unused_count,
            target_size: self.shared.target_size,
            low_water_fraction: self.shared.low_water_fraction,
            last_refresh: pool.last_refresh,
            refilling: self.shared.refilling.load(Ordering::Acquire),
        }
    }

    pub fn status(&self) -> PoolStatus {
        let pool = self.shared.pool.lock();
        let items = pool
            .items
            .iter()
            .map(|item| ItemStatus {
                id: item.id.clone(),
                source: item.source.clone(),
                in_use: item.in_use,
                age_seconds: item.age().num_seconds(),
            })
            .collect();

        PoolStatus {
            initialized: self.shared.initialized.load(Ordering::Acquire),
            refilling: self.shared.refilling.load(Ordering::Acquire),
            last_refresh: pool.last_refresh,
            items,
        }
    }

    fn require_initialized(&self) -> Result<()> {
        if self.shared.initialized.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    fn spawn_refill(shared: Arc<Shared>) {
        tokio::spawn(async move {
            let guard = RefillGuard {
                shared: shared.clone(),
            };
            Self::run_refill(&shared).await;
            drop(guard);
        });
    }

    async fn run_refill(shared: &Arc<Shared>) {
        let deficit = {
            let pool = shared.pool.lock();
            shared.target_size.saturating_sub(pool.items.len())
        };

        if deficit == 0 {
            debug!("refill observed no deficit, skipping");
            return;
        }

        match shared.orchestrator.replenish(deficit).await {
            Ok(items) => {
                let added = items.len();
                {
                    let mut pool = shared.pool.lock();
                    pool.items.extend(items);
                    pool.last_refresh = Some(Utc::now());
                }
                info!(added, "background refill replenished pool");
                shared.events.emit(Event::PoolReplenished {
                    at: Utc::now(),
                    added,
                });
            }
            Err(cause) => {
                warn!(error = %cause, "background refill failed");
                shared.events.emit(Event::PoolReplenishFailed {
                    at: Utc::now(),
                    error: cause.to_string(),
                });
            }
        }
    }
}
