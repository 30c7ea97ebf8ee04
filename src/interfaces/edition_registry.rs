//! Edition registry interface.

use async_trait::async_trait;

use crate::client::ClientError;
use crate::edition::{Edition, EditionId, NewEdition, Transition};

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("not found: {0}")]
    NotFound(String),

    /// The store refused the operation (uniqueness or lifecycle rule).
    #[error("registry rejected the operation: {0}")]
    Rejected(String),

    #[error("content client error: {0}")]
    Client(#[from] ClientError),
}

/// Interface for the authoritative store of edition records.
///
/// The remote content service owns durable storage and is the source of
/// truth for the single-active-edition invariant: at most one edition
/// holds `is_active_edition = true`, and only while published.
///
/// Implementations:
/// - `RemoteRegistry`: HTTP calls against the content service
/// - `MemoryRegistry`: in-memory store for tests (`test-utils` feature)
#[async_trait]
pub trait EditionRegistry: Send + Sync {
    /// Create a new edition in `Draft` with the active flag clear.
    ///
    /// Fails with [`RegistryError::Rejected`] if the year is taken.
    async fn create(&self, draft: NewEdition) -> Result<Edition>;

    /// Fetch an edition by id.
    async fn get(&self, id: EditionId) -> Result<Edition>;

    /// Fetch an edition by calendar year, regardless of status or the
    /// active flag. Past and archived editions stay reachable this way.
    async fn by_year(&self, year: i32) -> Result<Edition>;

    /// The edition currently holding the active flag, if any.
    async fn active(&self) -> Result<Option<Edition>>;

    /// All editions.
    async fn list(&self) -> Result<Vec<Edition>>;

    /// Apply a status transition that already passed machine validation.
    async fn transition(&self, id: EditionId, transition: Transition) -> Result<Edition>;

    /// Move the active flag to the given published edition.
    ///
    /// Must be a single atomic swap against the backing store: clear the
    /// current holder and set the target in one operation. No observer
    /// may see two editions active, or none while one logically holds it.
    async fn activate(&self, id: EditionId) -> Result<Edition>;

    /// Remove a non-active edition.
    async fn delete(&self, id: EditionId) -> Result<()>;
}
