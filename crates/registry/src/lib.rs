#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Registry Client (component F).
//!
//! Looks up package metadata by name against a TOML-cached mirror of a
//! remote index, refreshing over HTTP when the cache is stale. Read-only
//! from the perspective of the rest of the pipeline (§4.6).

mod cache;
mod client;
mod entry;
mod transport;

pub use cache::RegistryCache;
pub use client::{RegistryClient, RegistryLookup};
pub use entry::{CmakeIntegration, RegistryEntry, RegistryVersionEntry, SetupCommands};
pub use transport::{IndexTransport, ReqwestTransport};
