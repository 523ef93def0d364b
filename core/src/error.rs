//! Error taxonomy for the pool core.
//!
//! One flat enum per crate, `thiserror`-derived, matching the rest of
//! this workspace. Variants map directly onto the taxonomy in the
//! design (`NotInitialized`, `PoolInitError`, ...); the hot path
//! (`acquire`, `acquireExclusive`) only ever surfaces `NotInitialized`
//! and `PoolExhausted` — everything else is either retryable by the
//! caller (`PoolInitError`) or consumed internally by the orchestrator.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("[proxy] pool is not initialized")]
    NotInitialized,

    #[error("[proxy] init failed: {0}")]
    PoolInitError(#[source] Box<Error>),

    #[error("[proxy] pool exhausted: no unused proxy available")]
    PoolExhausted,

    #[error("[socker] all sources exhausted: {0}")]
    AllSourcesExhausted(String),

    #[error("[source:{source_tag}] fetch failed: {cause}")]
    SourceFetchError { source_tag: String, cause: String },

    #[error("[source:{source_tag}] release failed: {cause}")]
    SourceReleaseError { source_tag: String, cause: String },
}

impl Error {
    pub fn init_failed(cause: Error) -> Self {
        Error::PoolInitError(Box::new(cause))
    }

    pub fn source_fetch(source_tag: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Error::SourceFetchError {
            source_tag: source_tag.into(),
            cause: cause.to_string(),
        }
    }

    pub fn source_release(source_tag: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Error::SourceReleaseError {
            source_tag: source_tag.into(),
            cause: cause.to_string(),
        }
    }
}
