//! Reference `ProxySource` adapters for two vendor archetypes named in
//! the design: a multi-pull API provider (Oculus) and a single static
//! endpoint provider (ProxyMesh). Both are ordinary external
//! collaborators consumed through `socker_core::ProxySource` — nothing
//! here is special-cased by the pool core.

pub mod oculus;
pub mod proxymesh;

pub use oculus::{OculusConfig, OculusSource};
pub use proxymesh::{ProxyMeshConfig, ProxyMeshSource};
