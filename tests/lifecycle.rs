//! Lifecycle and resolution scenarios over the in-memory registry.
//!
//! Exercises the whole stack the way an editor session does: create and
//! publish editions, move the active flag, and resolve public requests
//! against the resulting registry state.

use std::sync::Arc;

use rostrum::edition::{EditionStateMachine, EditionStatus, NewEdition};
use rostrum::interfaces::EditionRegistry;
use rostrum::registry::MemoryRegistry;
use rostrum::resolve::{EditionResolver, ResolveRequest};

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

/// Assert the registry-wide invariants: at most one active edition, and
/// whoever holds the flag is published.
async fn assert_invariants(registry: &MemoryRegistry) {
    let snapshot = registry.snapshot().await;
    let active: Vec<_> = snapshot.iter().filter(|e| e.is_active_edition).collect();
    assert!(active.len() <= 1, "two editions hold the active flag");
    for edition in active {
        assert_eq!(
            edition.status,
            EditionStatus::Published,
            "active edition must be published"
        );
    }
}

#[tokio::test]
async fn editor_session_end_to_end() {
    let registry = Arc::new(MemoryRegistry::new());
    let machine = EditionStateMachine::new(registry.clone());
    let resolver = EditionResolver::new(registry.clone(), 2026);

    // Year one: create, publish, activate.
    let first = machine.create(draft(2025)).await.unwrap();
    machine.publish(first.id).await.unwrap();
    machine.activate(first.id).await.unwrap();
    assert_invariants(&registry).await;

    let context = resolver.resolve(ResolveRequest::Active).await.unwrap();
    assert_eq!(context.year, 2025);

    // Year two goes live; year one rotates out and gets archived.
    let second = machine.create(draft(2026)).await.unwrap();
    machine.publish(second.id).await.unwrap();
    machine.activate(second.id).await.unwrap();
    assert_invariants(&registry).await;

    machine.archive(first.id).await.unwrap();
    assert_invariants(&registry).await;

    // Public site follows the flag; past edition stays browsable by year.
    let context = resolver.resolve(ResolveRequest::Active).await.unwrap();
    assert_eq!(context.year, 2026);

    let past = resolver.resolve(ResolveRequest::ByYear(2025)).await.unwrap();
    assert_eq!(past.status, EditionStatus::Archived);

    // Every content query in the session reuses the same context.
    assert_eq!(
        context.scoped_resource("speakers"),
        format!("editions/{}/speakers", context.edition_id)
    );
    assert_eq!(
        context.scoped_resource("committees"),
        format!("editions/{}/committees", context.edition_id)
    );
}

#[tokio::test]
async fn racing_activations_leave_exactly_one_winner() {
    let registry = Arc::new(MemoryRegistry::new());
    let machine = Arc::new(EditionStateMachine::new(registry.clone()));

    let a = machine.create(draft(2025)).await.unwrap();
    let b = machine.create(draft(2026)).await.unwrap();
    machine.publish(a.id).await.unwrap();
    machine.publish(b.id).await.unwrap();

    // Editors double-clicking and racing each other.
    let tasks: Vec<_> = (0..50)
        .map(|round| {
            let machine = machine.clone();
            let id = if round % 2 == 0 { a.id } else { b.id };
            tokio::spawn(async move { machine.activate(id).await })
        })
        .collect();

    // Sample the registry while activations are in flight; no observer
    // may ever see two active editions or a published-less flag holder.
    let observer = {
        let registry = registry.clone();
        tokio::spawn(async move {
            for _ in 0..100 {
                assert_invariants(&registry).await;
                tokio::task::yield_now().await;
            }
        })
    };

    for result in futures::future::join_all(tasks).await {
        result.unwrap().unwrap();
    }
    observer.await.unwrap();

    let snapshot = registry.snapshot().await;
    let active: Vec<_> = snapshot.iter().filter(|e| e.is_active_edition).collect();
    assert_eq!(active.len(), 1, "exactly one edition ends up active");
    assert!(active[0].id == a.id || active[0].id == b.id);
}

#[tokio::test]
async fn swapping_the_flag_never_drops_it() {
    let registry = Arc::new(MemoryRegistry::new());
    let machine = EditionStateMachine::new(registry.clone());

    let a = machine.create(draft(2025)).await.unwrap();
    let b = machine.create(draft(2026)).await.unwrap();
    machine.publish(a.id).await.unwrap();
    machine.publish(b.id).await.unwrap();

    machine.activate(a.id).await.unwrap();

    // From the first activation on, exactly one edition holds the flag
    // through any number of swaps.
    for _ in 0..10 {
        machine.activate(b.id).await.unwrap();
        let active = registry.active().await.unwrap().expect("flag dropped");
        assert_eq!(active.id, b.id);

        machine.activate(a.id).await.unwrap();
        let active = registry.active().await.unwrap().expect("flag dropped");
        assert_eq!(active.id, a.id);
    }
}

#[tokio::test]
async fn cancelled_year_is_resolvable_but_frozen() {
    let registry = Arc::new(MemoryRegistry::new());
    let machine = EditionStateMachine::new(registry.clone());
    let resolver = EditionResolver::new(registry.clone(), 2026);

    let edition = machine.create(draft(2024)).await.unwrap();
    machine.cancel(edition.id).await.unwrap();

    // Explicit-year requests still reach it.
    let context = resolver.resolve(ResolveRequest::ByYear(2024)).await.unwrap();
    assert_eq!(context.status, EditionStatus::Cancelled);

    // But its lifecycle is over.
    assert!(machine.publish(edition.id).await.is_err());
    assert!(machine.activate(edition.id).await.is_err());
}
