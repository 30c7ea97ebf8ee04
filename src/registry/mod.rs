//! Edition registry implementations.
//!
//! - `remote`: HTTP calls against the content service (production)
//! - `memory`: in-memory store for tests (`test-utils` feature)

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod remote;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryRegistry;
pub use remote::RemoteRegistry;
