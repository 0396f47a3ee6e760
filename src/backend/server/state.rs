/**
 * Application State
 *
 * Holds the canned item list served by the sample endpoint. The list is
 * immutable for the life of the server, so handlers share it through an
 * `Arc` without locking.
 */
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::shared::item::{Category, Item, ItemId};

/// 2024-03-01T09:00:00Z
const SAMPLE_EPOCH: i64 = 1_709_283_600;

#[derive(Debug, Clone)]
pub struct AppState {
    /// Items returned by `GET /api/items`
    pub items: Arc<Vec<Item>>,
}

impl AppState {
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_items(sample_items())
    }
}

fn sample_item(seq: i64, title: &str, category: Category, price: Option<f64>, note: Option<&str>) -> Item {
    Item {
        id: ItemId::new(format!("sample-{}", seq + 1)),
        title: title.to_string(),
        completed: false,
        position: seq,
        category,
        note: note.map(str::to_string),
        price,
        image_ref: None,
        link: None,
        created_at: DateTime::<Utc>::from_timestamp(SAMPLE_EPOCH + seq * 60, 0).unwrap_or_default(),
    }
}

/// Four household items in list order
pub fn sample_items() -> Vec<Item> {
    vec![
        sample_item(0, "Dish soap", Category::Kitchen, Some(2.49), None),
        sample_item(1, "Toilet paper", Category::Bathroom, Some(6.99), Some("12 rolls")),
        sample_item(2, "Light bulbs", Category::LivingRoom, Some(8.5), Some("E27, warm white")),
        sample_item(3, "Potting soil", Category::Garden, None, None),
    ]
}
