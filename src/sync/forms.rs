//! # Item Forms
//!
//! Raw user input for creating and editing items, and its validation.
//! Validation happens before any remote call; a rejected form never
//! touches the local view.
//!
//! Edits distinguish "untouched" (`None`) from "cleared" (`Some("")`). A
//! cleared optional attribute becomes a field-removal instruction, so the
//! stored document loses the key instead of holding `null` or zero.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::error::{ListError, ListResult};
use crate::shared::item::{fields, Category, Document, FieldChange, FieldChanges, Item, ItemId};

/// Input for a new item, as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewItemForm {
    pub title: String,
    pub category: String,
    pub note: String,
    pub price: String,
    pub image_ref: String,
    pub link: String,
}

impl NewItemForm {
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = price.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    pub fn with_image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = image_ref.into();
        self
    }

    /// Check every field and parse it into its stored type
    pub fn validate(&self) -> ListResult<ValidItem> {
        Ok(ValidItem {
            title: parse_title(&self.title)?,
            category: parse_category(&self.category)?,
            note: parse_note(&self.note),
            price: parse_price(&self.price)?,
            image_ref: parse_url(fields::IMAGE_REF, &self.image_ref)?,
            link: parse_url(fields::LINK, &self.link)?,
        })
    }
}

/// A validated new item, ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct ValidItem {
    pub title: String,
    pub category: Category,
    pub note: Option<String>,
    pub price: Option<f64>,
    pub image_ref: Option<String>,
    pub link: Option<String>,
}

impl ValidItem {
    /// Local stand-in shown until the store confirms the create
    pub fn provisional_item(&self, position: i64) -> Item {
        Item {
            id: ItemId::provisional(),
            title: self.title.clone(),
            completed: false,
            position,
            category: self.category,
            note: self.note.clone(),
            price: self.price,
            image_ref: self.image_ref.clone(),
            link: self.link.clone(),
            created_at: Utc::now(),
        }
    }

    /// Document sent with the create request (the store adds `createdAt`)
    pub fn to_document(&self, position: i64) -> ListResult<Document> {
        let mut document = self.provisional_item(position).to_document()?;
        document.remove(fields::CREATED_AT);
        Ok(document)
    }
}

/// Partial edit; `None` leaves a field untouched, `Some("")` clears it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditForm {
    pub title: Option<String>,
    pub category: Option<String>,
    pub completed: Option<bool>,
    pub note: Option<String>,
    pub price: Option<String>,
    pub image_ref: Option<String>,
    pub link: Option<String>,
}

impl EditForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    pub fn image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Validate touched fields and translate them into field changes
    pub fn to_changes(&self) -> ListResult<FieldChanges> {
        let mut changes = FieldChanges::new();

        if let Some(title) = &self.title {
            changes.insert(fields::TITLE, FieldChange::Set(Value::String(parse_title(title)?)));
        }
        if let Some(category) = &self.category {
            changes.insert(fields::CATEGORY, FieldChange::Set(parse_category(category)?.as_stored()));
        }
        if let Some(completed) = self.completed {
            changes.insert(fields::COMPLETED, FieldChange::Set(Value::Bool(completed)));
        }
        if let Some(note) = &self.note {
            changes.insert(fields::NOTE, optional(parse_note(note).map(Value::String)));
        }
        if let Some(price) = &self.price {
            let price = parse_price(price)?;
            changes.insert(fields::PRICE, optional(price.map(Value::from)));
        }
        if let Some(image_ref) = &self.image_ref {
            let image_ref = parse_url(fields::IMAGE_REF, image_ref)?;
            changes.insert(fields::IMAGE_REF, optional(image_ref.map(Value::String)));
        }
        if let Some(link) = &self.link {
            let link = parse_url(fields::LINK, link)?;
            changes.insert(fields::LINK, optional(link.map(Value::String)));
        }

        Ok(changes)
    }
}

fn optional(value: Option<Value>) -> FieldChange {
    match value {
        Some(value) => FieldChange::Set(value),
        None => FieldChange::Remove,
    }
}

fn parse_title(raw: &str) -> ListResult<String> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ListError::validation(fields::TITLE, "Title is required"));
    }
    Ok(title.to_string())
}

fn parse_category(raw: &str) -> ListResult<Category> {
    if raw.trim().is_empty() {
        return Err(ListError::validation(fields::CATEGORY, "Category is required"));
    }
    raw.parse()
}

fn parse_note(raw: &str) -> Option<String> {
    let note = raw.trim();
    (!note.is_empty()).then(|| note.to_string())
}

/// Empty means "no price"; a comma decimal separator is accepted
fn parse_price(raw: &str) -> ListResult<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.replace(',', ".").parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(Some(price)),
        _ => Err(ListError::validation(
            fields::PRICE,
            format!("Price must be a non-negative number, got '{}'", raw),
        )),
    }
}

/// Empty means "no URL"; otherwise an absolute http(s) URL
fn parse_url(field: &str, raw: &str) -> ListResult<Option<String>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match reqwest::Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Some(raw.to_string())),
        _ => Err(ListError::validation(
            field,
            format!("'{}' is not a valid http(s) URL", raw),
        )),
    }
}
