//! Edition model: one calendar-year instance of the conference.
//!
//! This layer owns identity, lifecycle status, and the active flag.
//! Content payload fields (theme, dates, venue, ...) are opaque here;
//! the editing surfaces own and mutate them.

mod machine;


pub use machine::{EditionError, EditionStateMachine, Transition};

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Opaque identifier assigned to an edition by the content service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditionId(pub i64);

impl fmt::Display for EditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle status of an edition. `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditionStatus {
    Draft,
    Published,
    Archived,
    Cancelled,
}

impl EditionStatus {
    /// Wire/display name.
    pub fn label(&self) -> &'static str {
        match self {
            EditionStatus::Draft => "draft",
            EditionStatus::Published => "published",
            EditionStatus::Archived => "archived",
            EditionStatus::Cancelled => "cancelled",
        }
    }

    /// Terminal states have no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EditionStatus::Cancelled)
    }
}

impl fmt::Display for EditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An edition as the content service represents it.
///
/// At most one edition across the registry has `is_active_edition =
/// true`, and only while `status` is [`EditionStatus::Published`]. The
/// service's storage enforces that invariant; this type just carries it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edition {
    pub id: EditionId,
    /// Calendar year, unique across the registry.
    pub year: i32,
    /// Ordinal of the edition, not necessarily equal to the year.
    pub edition_number: u32,
    pub name: String,
    pub slug: String,
    pub status: EditionStatus,
    pub is_active_edition: bool,
    #[serde(default)]
    pub conference_date: Option<NaiveDate>,
    #[serde(default)]
    pub venue_type: Option<String>,
    #[serde(default)]
    pub venue_location: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub general_email: Option<String>,
    #[serde(default)]
    pub copyright_year: Option<i32>,
}

/// Payload for creating a new edition. Created editions start in
/// [`EditionStatus::Draft`] with the active flag clear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEdition {
    pub year: i32,
    pub edition_number: u32,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub conference_date: Option<NaiveDate>,
    #[serde(default)]
    pub theme: Option<String>,
}

impl NewEdition {
    /// Reject malformed input before any service call is made.
    pub fn validate(&self) -> Result<(), EditionError> {
        if !(2000..=9999).contains(&self.year) {
            return Err(EditionError::Validation(format!(
                "year {} is outside the supported range",
                self.year
            )));
        }
        if self.name.trim().is_empty() {
            return Err(EditionError::Validation("name must not be empty".into()));
        }
        if self.slug.trim().is_empty() {
            return Err(EditionError::Validation("slug must not be empty".into()));
        }
        Ok(())
    }
}
