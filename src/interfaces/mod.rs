//! Abstract interfaces for rostrum components.
//!
//! These traits define the contracts for:
//! - Edition registry (the authoritative store of edition records)

pub mod edition_registry;

pub use edition_registry::{EditionRegistry, RegistryError};
