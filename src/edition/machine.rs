//! Edition lifecycle state machine.
//!
//! Client-side mirror of the lifecycle contract the content service
//! enforces: validates the transition table and the active-edition guards
//! before issuing the operation, and surfaces failures synchronously.
//! Nothing here is retried; guard and transition failures are business
//! outcomes, not transient faults.

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use super::{Edition, EditionId, EditionStatus, NewEdition};
use crate::interfaces::{EditionRegistry, RegistryError};

/// Result type for state machine operations.
pub type Result<T> = std::result::Result<T, EditionError>;

/// Errors surfaced by lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum EditionError {
    /// Malformed input, rejected before any transition was attempted.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The requested transition is not defined for the current status.
    #[error("transition {transition} is not defined for status {from}")]
    InvalidTransition {
        transition: Transition,
        from: EditionStatus,
    },

    /// The transition exists but a guard blocks it.
    #[error("guard violation: {reason}")]
    GuardViolation { reason: String },

    /// Unknown edition id or year.
    #[error("edition not found: {0}")]
    NotFound(String),

    /// Registry failure below the lifecycle layer.
    #[error(transparent)]
    Registry(RegistryError),
}

impl From<RegistryError> for EditionError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(what) => EditionError::NotFound(what),
            other => EditionError::Registry(other),
        }
    }
}

/// Status transitions an edition can be asked to make.
///
/// `activate` and `delete` are not transitions: they leave the status
/// untouched and are modeled as separate operations on
/// [`EditionStateMachine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Publish,
    Unpublish,
    Archive,
    RestoreToDraft,
    Cancel,
}

impl Transition {
    /// Whether the transition is defined from the given status.
    pub fn permitted_from(&self, status: EditionStatus) -> bool {
        match self {
            Transition::Publish => matches!(status, EditionStatus::Draft),
            Transition::Unpublish => matches!(status, EditionStatus::Published),
            Transition::Archive => matches!(status, EditionStatus::Published),
            Transition::RestoreToDraft => matches!(status, EditionStatus::Archived),
            Transition::Cancel => matches!(
                status,
                EditionStatus::Draft | EditionStatus::Published | EditionStatus::Archived
            ),
        }
    }

    /// Status the edition holds after the transition.
    pub fn target(&self) -> EditionStatus {
        match self {
            Transition::Publish => EditionStatus::Published,
            Transition::Unpublish => EditionStatus::Draft,
            Transition::Archive => EditionStatus::Archived,
            Transition::RestoreToDraft => EditionStatus::Draft,
            Transition::Cancel => EditionStatus::Cancelled,
        }
    }

    /// Whether the "must not be the active edition" guard applies.
    pub fn requires_inactive(&self) -> bool {
        match self {
            Transition::Unpublish | Transition::Archive | Transition::Cancel => true,
            Transition::Publish | Transition::RestoreToDraft => false,
        }
    }

    /// Action segment of the service endpoint (`POST /editions/{id}/{action}`).
    pub fn action(&self) -> &'static str {
        match self {
            Transition::Publish => "publish",
            Transition::Unpublish => "unpublish",
            Transition::Archive => "archive",
            Transition::RestoreToDraft => "restore-to-draft",
            Transition::Cancel => "cancel",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

/// Lifecycle operations over an [`EditionRegistry`].
///
/// The registry performs the durable mutation; the machine checks the
/// transition table and guards against the edition's current state first
/// so illegal requests never reach the wire.
pub struct EditionStateMachine {
    registry: Arc<dyn EditionRegistry>,
}

impl EditionStateMachine {
    pub fn new(registry: Arc<dyn EditionRegistry>) -> Self {
        Self { registry }
    }

    /// Create a new edition in `Draft`.
    pub async fn create(&self, draft: NewEdition) -> Result<Edition> {
        draft.validate()?;
        Ok(self.registry.create(draft).await?)
    }

    /// Draft -> Published.
    pub async fn publish(&self, id: EditionId) -> Result<Edition> {
        self.step(id, Transition::Publish).await
    }

    /// Published -> Draft. Blocked on the active edition.
    pub async fn unpublish(&self, id: EditionId) -> Result<Edition> {
        self.step(id, Transition::Unpublish).await
    }

    /// Published -> Archived. Blocked on the active edition.
    pub async fn archive(&self, id: EditionId) -> Result<Edition> {
        self.step(id, Transition::Archive).await
    }

    /// Archived -> Draft.
    pub async fn restore_to_draft(&self, id: EditionId) -> Result<Edition> {
        self.step(id, Transition::RestoreToDraft).await
    }

    /// Draft/Published/Archived -> Cancelled. Blocked on the active edition.
    pub async fn cancel(&self, id: EditionId) -> Result<Edition> {
        self.step(id, Transition::Cancel).await
    }

    /// Make the given published edition the single active one.
    ///
    /// The registry moves the active flag in one atomic swap: the old
    /// holder loses it and the target gains it with no observable state
    /// in between holding two active editions or none.
    pub async fn activate(&self, id: EditionId) -> Result<Edition> {
        let current = self.fetch(id).await?;
        if current.status != EditionStatus::Published {
            warn!(%id, status = %current.status, "activation rejected for non-published edition");
            return Err(EditionError::GuardViolation {
                reason: format!(
                    "only published editions can be activated, edition {} is {}",
                    id, current.status
                ),
            });
        }
        Ok(self.registry.activate(id).await?)
    }

    /// Remove an edition. Blocked on the active edition.
    pub async fn delete(&self, id: EditionId) -> Result<()> {
        let current = self.fetch(id).await?;
        if current.is_active_edition {
            warn!(%id, "delete rejected for the active edition");
            return Err(EditionError::GuardViolation {
                reason: "the active edition cannot be deleted".into(),
            });
        }
        Ok(self.registry.delete(id).await?)
    }

    async fn step(&self, id: EditionId, transition: Transition) -> Result<Edition> {
        let current = self.fetch(id).await?;

        if !transition.permitted_from(current.status) {
            return Err(EditionError::InvalidTransition {
                transition,
                from: current.status,
            });
        }

        if transition.requires_inactive() && current.is_active_edition {
            warn!(%id, %transition, "transition rejected on the active edition");
            return Err(EditionError::GuardViolation {
                reason: format!("{} is not allowed on the active edition", transition),
            });
        }

        Ok(self.registry.transition(id, transition).await?)
    }

    async fn fetch(&self, id: EditionId) -> Result<Edition> {
        Ok(self.registry.get(id).await?)
    }
}
