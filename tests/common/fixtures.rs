//! Item fixtures and session helpers

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use hearthlist::shared::{AppConfig, Category, Item, ItemId};
use hearthlist::sync::{ListSession, LocalView, MemoryStore};
use tokio::time::timeout;

pub const COLLECTION: &str = "shopping";

fn created(seq: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::seconds(seq)
}

/// Item titled after its id
pub fn item(id: &str, position: i64, seq: i64) -> Item {
    Item {
        id: ItemId::new(id),
        title: id.to_uppercase(),
        completed: false,
        position,
        category: Category::Kitchen,
        note: None,
        price: None,
        image_ref: None,
        link: None,
        created_at: created(seq),
    }
}

/// A small mixed household list
pub fn household_items() -> Vec<Item> {
    let mut items = vec![
        item("milk", 0, 0),
        item("soap", 1, 1),
        item("bulbs", 2, 2),
        item("towels", 3, 3),
        item("soil", 4, 4),
    ];
    items[0].price = Some(1.25);
    items[1].category = Category::Bathroom;
    items[1].price = Some(3.5);
    items[2].category = Category::LivingRoom;
    items[2].completed = true;
    items[2].price = Some(8.0);
    items[3].category = Category::Bathroom;
    items[4].category = Category::Garden;
    items
}

pub fn ids(raw: &[&str]) -> Vec<ItemId> {
    raw.iter().map(|id| ItemId::new(*id)).collect()
}

pub fn order(view: &LocalView) -> Vec<String> {
    view.items.iter().map(|item| item.id.to_string()).collect()
}

/// Store seeded with `items` and a session that has seen them
pub async fn seeded_session(items: &[Item]) -> (Arc<MemoryStore>, ListSession) {
    let store = Arc::new(MemoryStore::new());
    store.seed(COLLECTION, items).await.unwrap();
    let session = ListSession::open(store.clone(), &AppConfig::default()).await.unwrap();
    let expected = items.len();
    wait_until(&session, |view| view.len() == expected && view.revision > 0).await;
    (store, session)
}

/// Wait (bounded) until the session view satisfies `predicate`
pub async fn wait_until(session: &ListSession, predicate: impl FnMut(&LocalView) -> bool) -> LocalView {
    timeout(Duration::from_secs(2), session.wait_for(predicate))
        .await
        .expect("view did not converge")
        .expect("session closed")
}
