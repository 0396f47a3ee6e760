/**
 * List Item Data Structure
 *
 * This module defines the `Item` tracked by a shared household list, the
 * room taxonomy it is filed under, and the document-level change set used
 * to describe writes against the remote store.
 *
 * Items are shared between the sync engine, the local fallback store and
 * the sample-data endpoint, so every type here is serializable. Optional
 * attributes are omitted from the serialized form when absent; a document
 * never carries `null` for a cleared field.
 */
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::error::{ListError, ListResult};

/// Raw document as held by the remote store (every field except the id)
pub type Document = serde_json::Map<String, Value>;

/// Field names as they appear in stored documents
pub mod fields {
    pub const TITLE: &str = "title";
    pub const COMPLETED: &str = "completed";
    pub const POSITION: &str = "position";
    pub const CATEGORY: &str = "category";
    pub const NOTE: &str = "note";
    pub const PRICE: &str = "price";
    pub const IMAGE_REF: &str = "imageRef";
    pub const LINK: &str = "link";
    pub const CREATED_AT: &str = "createdAt";
}

/// Prefix for ids minted locally before the remote store confirms a create
const PROVISIONAL_PREFIX: &str = "local-";

/// Opaque item identifier assigned by the remote store
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wrap an id handed out by the remote store
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a local placeholder id for an optimistic add
    pub fn provisional() -> Self {
        Self(format!("{}{}", PROVISIONAL_PREFIX, uuid::Uuid::new_v4()))
    }

    /// Whether this id was minted locally and never confirmed
    pub fn is_provisional(&self) -> bool {
        self.0.starts_with(PROVISIONAL_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Room taxonomy an item is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Kitchen,
    Bathroom,
    Bedroom,
    LivingRoom,
    Office,
    Garage,
    Garden,
    Laundry,
    Other,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Category; 9] = [
        Category::Kitchen,
        Category::Bathroom,
        Category::Bedroom,
        Category::LivingRoom,
        Category::Office,
        Category::Garage,
        Category::Garden,
        Category::Laundry,
        Category::Other,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Kitchen => "Kitchen",
            Category::Bathroom => "Bathroom",
            Category::Bedroom => "Bedroom",
            Category::LivingRoom => "Living Room",
            Category::Office => "Office",
            Category::Garage => "Garage",
            Category::Garden => "Garden",
            Category::Laundry => "Laundry",
            Category::Other => "Other",
        }
    }

    /// Stored (serialized) name
    pub fn as_stored(&self) -> Value {
        // Unit variants always serialize to a string
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        Category::ALL
            .iter()
            .copied()
            .find(|category| {
                let label: String = category
                    .label()
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .flat_map(char::to_lowercase)
                    .collect();
                label == key
            })
            .ok_or_else(|| {
                ListError::validation(fields::CATEGORY, format!("Unknown category '{}'", s.trim()))
            })
    }
}

/// A single entry on a shared list
///
/// `id` and `created_at` are assigned by the remote store. `position`
/// defines the total order within a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub position: i64,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Decode a stored document
    pub fn from_document(id: ItemId, document: &Document) -> ListResult<Self> {
        let mut document = document.clone();
        document.insert("id".to_string(), Value::String(id.0));
        Ok(serde_json::from_value(Value::Object(document))?)
    }

    /// Encode as a stored document (the id lives outside the document)
    pub fn to_document(&self) -> ListResult<Document> {
        match serde_json::to_value(self)? {
            Value::Object(mut document) => {
                document.remove("id");
                Ok(document)
            }
            other => Err(ListError::serialization(format!(
                "item encoded as non-object: {}",
                other
            ))),
        }
    }
}

/// A single field instruction sent to the remote store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum FieldChange {
    /// Store a new value
    Set(Value),
    /// Delete the field from the document entirely
    Remove,
}

/// Field name to change mapping for one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldChanges(BTreeMap<String, FieldChange>);

impl FieldChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `field` to `value`
    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), FieldChange::Set(value.into()));
        self
    }

    /// Remove `field` from the document
    pub fn remove(mut self, field: &str) -> Self {
        self.0.insert(field.to_string(), FieldChange::Remove);
        self
    }

    pub fn insert(&mut self, field: &str, change: FieldChange) {
        self.0.insert(field.to_string(), change);
    }

    pub fn get(&self, field: &str) -> Option<&FieldChange> {
        self.0.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldChange)> {
        self.0.iter()
    }

    /// Apply to a stored document, deleting keys marked `Remove`
    pub fn apply_to(&self, document: &mut Document) {
        for (field, change) in &self.0 {
            match change {
                FieldChange::Set(value) => {
                    document.insert(field.clone(), value.clone());
                }
                FieldChange::Remove => {
                    document.remove(field);
                }
            }
        }
    }

    /// Apply to a decoded item (used for optimistic local updates)
    pub fn apply_to_item(&self, item: &mut Item) -> ListResult<()> {
        let mut document = item.to_document()?;
        self.apply_to(&mut document);
        *item = Item::from_document(item.id.clone(), &document)?;
        Ok(())
    }
}
