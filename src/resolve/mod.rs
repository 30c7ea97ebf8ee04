//! Edition resolution.
//!
//! Maps a "year or nothing" request onto a concrete edition context. The
//! two cases are explicit request variants so the default-year fallback
//! is a first-class path, not an implicit null check:
//!
//! - [`ResolveRequest::ByYear`]: that year's edition, regardless of
//!   status or the active flag (past and archived editions stay
//!   browsable)
//! - [`ResolveRequest::Active`]: the active edition, else the configured
//!   default year, else not found
//!
//! Resolution holds no state of its own; repeated calls are independent
//! reads and safe to issue concurrently.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::edition::{Edition, EditionId, EditionStatus};
use crate::interfaces::{EditionRegistry, RegistryError};

/// Result type for resolution.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors surfaced by resolution.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No edition satisfies the request. Distinguishable from generic
    /// failures so callers can render a "no such edition" state.
    #[error("no edition found for {0}")]
    NotFound(String),

    /// Registry failure below the resolution layer.
    #[error(transparent)]
    Registry(RegistryError),
}

impl From<RegistryError> for ResolveError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(what) => ResolveError::NotFound(what),
            other => ResolveError::Registry(other),
        }
    }
}

/// What the caller wants resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveRequest {
    /// A specific calendar year.
    ByYear(i32),
    /// Whatever edition currently holds the active flag.
    Active,
}

impl fmt::Display for ResolveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveRequest::ByYear(year) => write!(f, "year {year}"),
            ResolveRequest::Active => f.write_str("active edition"),
        }
    }
}

/// The resolved handle every content query in a session is scoped to.
///
/// Immutable once produced; reusing one context for all queries in a
/// session guarantees the fetched content belongs to one edition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditionContext {
    pub edition_id: EditionId,
    pub year: i32,
    pub status: EditionStatus,
}

impl EditionContext {
    fn of(edition: &Edition) -> Self {
        Self {
            edition_id: edition.id,
            year: edition.year,
            status: edition.status,
        }
    }

    /// Resource path for a content collection scoped to this edition,
    /// e.g. `speakers` -> `editions/{id}/speakers`.
    pub fn scoped_resource(&self, collection: &str) -> String {
        format!(
            "editions/{}/{}",
            self.edition_id,
            collection.trim_start_matches('/')
        )
    }
}

/// Resolves requests to edition contexts.
pub struct EditionResolver {
    registry: Arc<dyn EditionRegistry>,
    default_year: i32,
}

impl EditionResolver {
    pub fn new(registry: Arc<dyn EditionRegistry>, default_year: i32) -> Self {
        Self {
            registry,
            default_year,
        }
    }

    /// Resolve a request to an edition context.
    pub async fn resolve(&self, request: ResolveRequest) -> Result<EditionContext> {
        match request {
            ResolveRequest::ByYear(year) => self.by_year(year).await,
            ResolveRequest::Active => {
                if let Some(edition) = self.registry.active().await.map_err(ResolveError::from)? {
                    debug!(year = edition.year, id = %edition.id, "resolved active edition");
                    return Ok(EditionContext::of(&edition));
                }

                debug!(
                    default_year = self.default_year,
                    "no active edition, falling back to default year"
                );
                self.by_year(self.default_year).await
            }
        }
    }

    async fn by_year(&self, year: i32) -> Result<EditionContext> {
        let edition = self.registry.by_year(year).await?;
        Ok(EditionContext::of(&edition))
    }
}
