//! Multi-client session tests against the in-process store

use std::sync::Arc;

use hearthlist::shared::{AppConfig, ItemId, ListError};
use hearthlist::sync::{
    CategoryFilter, DragGesture, EditForm, ListSession, NewItemForm, StatusFilter, ViewFilter,
};
use hearthlist::shared::Category;
use pretty_assertions::assert_eq;

use crate::common::*;

#[tokio::test]
async fn test_second_client_sees_first_clients_add() {
    let (store, alice) = seeded_session(&household_items()).await;
    let bob = crate::assert_ok!(ListSession::open(store.clone(), &AppConfig::default()).await);
    wait_until(&bob, |v| v.len() == 5).await;

    let id = crate::assert_ok!(alice.add(&NewItemForm::new("Bin bags", "Kitchen").with_price("2,10")).await);

    let view = wait_until(&bob, |v| v.contains(&id)).await;
    let added = view.get(&id).unwrap();
    assert_eq!(added.position, 5);
    assert_eq!(added.price, Some(2.1));
    crate::assert_contiguous!(view.items);
}

#[tokio::test]
async fn test_filtered_reorder_interleaves_hidden_items() {
    let (store, session) = seeded_session(&household_items()).await;
    let projector = session.projector();
    projector.set_category(CategoryFilter::Only(Category::Bathroom));

    let displayed = projector.projection().ids();
    assert_eq!(displayed, ids(&["soap", "towels"]));

    crate::assert_ok!(session.reorder(&displayed, &DragGesture::new("towels", 0)).await);

    let view = wait_until(&session, |v| !v.optimistic && v.revision > 1).await;
    assert_eq!(order(&view), vec!["milk", "towels", "soap", "bulbs", "soil"]);
    crate::assert_contiguous!(view.items);
    assert_eq!(store.committed_batches().len(), 1);
    // milk and soil keep their positions
    assert_eq!(store.committed_batches()[0].len(), 3);
}

#[tokio::test]
async fn test_projection_aggregates_follow_filter() {
    let (_store, session) = seeded_session(&household_items()).await;
    let projector = session.projector();

    let all = projector.projection();
    assert_eq!(all.count, 5);
    assert_eq!(all.completed_count, 1);
    crate::assert_approx_eq!(all.total_price, 12.75, 1e-9);

    projector.set_filter(ViewFilter::new(StatusFilter::Active, CategoryFilter::All));
    let active = projector.projection();
    assert_eq!(active.count, 4);
    assert_eq!(active.completed_count, 0);
    crate::assert_approx_eq!(active.total_price, 4.75, 1e-9);
}

#[tokio::test]
async fn test_concurrent_collision_repair_converges() {
    let mut items = household_items();
    for item in &mut items {
        item.position = 0;
    }
    let (store, alice) = seeded_session(&items).await;
    let bob = crate::assert_ok!(ListSession::open(store.clone(), &AppConfig::default()).await);

    let expected = vec!["milk", "soap", "bulbs", "towels", "soil"];
    for session in [&alice, &bob] {
        let view = wait_until(session, |v| {
            v.items.iter().map(|i| i.position).collect::<Vec<_>>() == vec![0, 1, 2, 3, 4]
        })
        .await;
        assert_eq!(order(&view), expected);
    }
}

#[tokio::test]
async fn test_repair_disabled_leaves_collisions() {
    let items = vec![item("a", 0, 0), item("b", 0, 1)];
    let store = Arc::new(hearthlist::sync::MemoryStore::new());
    store.seed(COLLECTION, &items).await.unwrap();
    let config = AppConfig::builder().repair_collisions(false).build().unwrap();

    let session = crate::assert_ok!(ListSession::open(store.clone(), &config).await);
    let view = wait_until(&session, |v| v.len() == 2).await;
    assert_eq!(order(&view), vec!["a", "b"]);
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(store.committed_batches().is_empty());
}

#[tokio::test]
async fn test_remote_removal_mid_edit_is_unknown_item() {
    let (store, alice) = seeded_session(&household_items()).await;
    let bob = crate::assert_ok!(ListSession::open(store.clone(), &AppConfig::default()).await);
    wait_until(&bob, |v| v.len() == 5).await;

    crate::assert_ok!(bob.remove(&ItemId::new("soap")).await);
    wait_until(&alice, |v| !v.contains(&ItemId::new("soap"))).await;

    crate::assert_err!(
        alice.edit(&ItemId::new("soap"), &EditForm::new().title("Hand soap")).await,
        ListError::UnknownItem { .. }
    );
    crate::assert_err!(alice.toggle(&ItemId::new("soap")), ListError::UnknownItem { .. });
}

#[tokio::test]
async fn test_invalid_forms_never_reach_the_store() {
    let (store, session) = seeded_session(&household_items()).await;

    crate::assert_err!(
        session.add(&NewItemForm::new("   ", "Kitchen")).await,
        ListError::Validation { .. }
    );
    crate::assert_err!(
        session.add(&NewItemForm::new("Rake", "Shed")).await,
        ListError::Validation { .. }
    );
    crate::assert_err!(
        session.add(&NewItemForm::new("Rake", "Garden").with_price("-3")).await,
        ListError::Validation { .. }
    );
    crate::assert_err!(
        session.add(&NewItemForm::new("Rake", "Garden").with_link("not a url")).await,
        ListError::Validation { .. }
    );
    assert_eq!(store.items(COLLECTION).await.len(), 5);
}

#[tokio::test]
async fn test_failed_remove_reappears_with_next_snapshot() {
    let (store, session) = seeded_session(&household_items()).await;
    store.fail_next_writes(1);

    crate::assert_err!(session.remove(&ItemId::new("milk")).await, ListError::RemoteWrite { .. });
    assert!(!session.view().contains(&ItemId::new("milk")));

    // Any later committed write pushes a snapshot that restores it
    crate::assert_ok!(session.edit(&ItemId::new("soil"), &EditForm::new().note("peat free")).await);
    let view = wait_until(&session, |v| v.contains(&ItemId::new("milk")) && !v.optimistic).await;
    assert_eq!(view.get(&ItemId::new("soil")).unwrap().note.as_deref(), Some("peat free"));
}
