//! Local fallback store tests

use hearthlist::fallback::{FallbackStore, SqliteFallback};
use hearthlist::shared::AppConfig;
use pretty_assertions::assert_eq;

use crate::common::*;

#[tokio::test]
async fn test_fallback_at_configured_path() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::builder()
        .fallback_path(dir.path().join("lists").join("fallback.sqlite"))
        .build()
        .unwrap();

    let store = crate::assert_ok!(SqliteFallback::open(&config.fallback_path).await);
    assert!(crate::assert_ok!(store.load().await).is_empty());

    crate::assert_ok!(store.save(&household_items()).await);
    assert_eq!(crate::assert_ok!(store.load().await), household_items());
    assert!(config.fallback_path.exists());
}

#[tokio::test]
async fn test_fallback_through_trait_object() {
    let store: Box<dyn FallbackStore> = Box::new(crate::assert_ok!(SqliteFallback::in_memory().await));
    let mut items = household_items();
    items.retain(|item| !item.completed);

    crate::assert_ok!(store.save(&items).await);
    let loaded = crate::assert_ok!(store.load().await);
    assert_eq!(loaded.len(), 4);
    assert!(loaded.iter().all(|item| !item.completed));
}
