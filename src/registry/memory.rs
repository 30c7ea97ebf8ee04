//! In-memory edition registry for tests and local development.
//!
//! Mirrors the store-level contract the remote service enforces. All
//! state lives behind one lock: `activate` clears the old holder and sets
//! the new one inside a single critical section, so the swap is atomic
//! and no reader ever observes two active editions, or none while one
//! logically holds the flag. The lifecycle and uniqueness rules are
//! re-checked here even though the state machine validates them first,
//! matching a store that does not trust its callers.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::edition::{Edition, EditionId, EditionStatus, NewEdition, Transition};
use crate::interfaces::edition_registry::{EditionRegistry, RegistryError, Result};

#[derive(Default)]
struct State {
    editions: BTreeMap<i64, Edition>,
    next_id: i64,
}

/// Mutex-guarded registry with the same observable contract as the
/// remote service.
#[derive(Default)]
pub struct MemoryRegistry {
    state: Mutex<State>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with existing editions (ids preserved).
    pub fn with_editions(editions: Vec<Edition>) -> Self {
        let next_id = editions.iter().map(|e| e.id.0).max().unwrap_or(0) + 1;
        let editions = editions.into_iter().map(|e| (e.id.0, e)).collect();
        Self {
            state: Mutex::new(State { editions, next_id }),
        }
    }

    /// Consistent snapshot of every edition, for invariant assertions.
    pub async fn snapshot(&self) -> Vec<Edition> {
        self.state.lock().await.editions.values().cloned().collect()
    }
}

#[async_trait]
impl EditionRegistry for MemoryRegistry {
    async fn create(&self, draft: NewEdition) -> Result<Edition> {
        let mut state = self.state.lock().await;

        if state.editions.values().any(|e| e.year == draft.year) {
            return Err(RegistryError::Rejected(format!(
                "year {} already has an edition",
                draft.year
            )));
        }

        let id = state.next_id;
        state.next_id += 1;

        let edition = Edition {
            id: EditionId(id),
            year: draft.year,
            edition_number: draft.edition_number,
            name: draft.name,
            slug: draft.slug,
            status: EditionStatus::Draft,
            is_active_edition: false,
            conference_date: draft.conference_date,
            venue_type: None,
            venue_location: None,
            theme: draft.theme,
            description: None,
            general_email: None,
            copyright_year: Some(draft.year),
        };

        state.editions.insert(id, edition.clone());
        Ok(edition)
    }

    async fn get(&self, id: EditionId) -> Result<Edition> {
        self.state
            .lock()
            .await
            .editions
            .get(&id.0)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(format!("edition {id}")))
    }

    async fn by_year(&self, year: i32) -> Result<Edition> {
        self.state
            .lock()
            .await
            .editions
            .values()
            .find(|e| e.year == year)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(format!("edition year {year}")))
    }

    async fn active(&self) -> Result<Option<Edition>> {
        Ok(self
            .state
            .lock()
            .await
            .editions
            .values()
            .find(|e| e.is_active_edition)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Edition>> {
        Ok(self.snapshot().await)
    }

    async fn transition(&self, id: EditionId, transition: Transition) -> Result<Edition> {
        let mut state = self.state.lock().await;
        let edition = state
            .editions
            .get_mut(&id.0)
            .ok_or_else(|| RegistryError::NotFound(format!("edition {id}")))?;

        if !transition.permitted_from(edition.status) {
            return Err(RegistryError::Rejected(format!(
                "{} is not defined for status {}",
                transition, edition.status
            )));
        }
        if transition.requires_inactive() && edition.is_active_edition {
            return Err(RegistryError::Rejected(format!(
                "{} is not allowed on the active edition",
                transition
            )));
        }

        edition.status = transition.target();
        Ok(edition.clone())
    }

    async fn activate(&self, id: EditionId) -> Result<Edition> {
        // One critical section covers the whole swap.
        let mut state = self.state.lock().await;

        let target = state
            .editions
            .get(&id.0)
            .ok_or_else(|| RegistryError::NotFound(format!("edition {id}")))?;
        if target.status != EditionStatus::Published {
            return Err(RegistryError::Rejected(
                "only published editions can hold the active flag".to_string(),
            ));
        }

        for edition in state.editions.values_mut() {
            edition.is_active_edition = edition.id == id;
        }

        Ok(state.editions[&id.0].clone())
    }

    async fn delete(&self, id: EditionId) -> Result<()> {
        let mut state = self.state.lock().await;

        match state.editions.get(&id.0) {
            None => return Err(RegistryError::NotFound(format!("edition {id}"))),
            Some(edition) if edition.is_active_edition => {
                return Err(RegistryError::Rejected(
                    "the active edition cannot be deleted".to_string(),
                ));
            }
            Some(_) => {}
        }

        state.editions.remove(&id.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(year: i32) -> NewEdition {
        NewEdition {
            year,
            edition_number: (year - 2000) as u32,
            name: format!("Conference {year}"),
            slug: format!("conference-{year}"),
            conference_date: None,
            theme: None,
        }
    }

    #[tokio::test]
    async fn create_starts_in_draft_and_inactive() {
        let registry = MemoryRegistry::new();
        let edition = registry.create(draft(2026)).await.unwrap();

        assert_eq!(edition.status, EditionStatus::Draft);
        assert!(!edition.is_active_edition);
        assert_eq!(edition.year, 2026);
    }

    #[tokio::test]
    async fn create_rejects_duplicate_year() {
        let registry = MemoryRegistry::new();
        registry.create(draft(2026)).await.unwrap();

        let err = registry.create(draft(2026)).await.unwrap_err();
        assert!(matches!(err, RegistryError::Rejected(_)));
    }

    #[tokio::test]
    async fn activate_swaps_in_one_step() {
        let registry = MemoryRegistry::new();
        let a = registry.create(draft(2025)).await.unwrap();
        let b = registry.create(draft(2026)).await.unwrap();
        registry.transition(a.id, Transition::Publish).await.unwrap();
        registry.transition(b.id, Transition::Publish).await.unwrap();

        registry.activate(a.id).await.unwrap();
        registry.activate(b.id).await.unwrap();

        let snapshot = registry.snapshot().await;
        let active: Vec<_> = snapshot.iter().filter(|e| e.is_active_edition).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, b.id);
    }

    #[tokio::test]
    async fn activate_refuses_non_published() {
        let registry = MemoryRegistry::new();
        let edition = registry.create(draft(2026)).await.unwrap();

        let err = registry.activate(edition.id).await.unwrap_err();
        assert!(matches!(err, RegistryError::Rejected(_)));
    }

    #[tokio::test]
    async fn store_level_guards_hold_without_the_machine() {
        let registry = MemoryRegistry::new();
        let edition = registry.create(draft(2026)).await.unwrap();
        registry
            .transition(edition.id, Transition::Publish)
            .await
            .unwrap();
        registry.activate(edition.id).await.unwrap();

        // Straight to the store, bypassing client-side validation.
        let archive = registry
            .transition(edition.id, Transition::Archive)
            .await
            .unwrap_err();
        assert!(matches!(archive, RegistryError::Rejected(_)));

        let delete = registry.delete(edition.id).await.unwrap_err();
        assert!(matches!(delete, RegistryError::Rejected(_)));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let registry = MemoryRegistry::new();
        let err = registry.get(EditionId(404)).await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }
}
