//! # View Projector
//!
//! Derives the displayed subset of a local view (status and category
//! filters) together with its aggregates. Aggregates always describe the
//! currently filtered set and are recomputed whenever the view or the
//! filter changes.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::shared::error::{ListError, ListResult};
use crate::shared::item::{Category, Item, ItemId};
use crate::sync::reconciliation::LocalView;

/// Completion filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    fn matches(&self, item: &Item) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !item.completed,
            StatusFilter::Completed => item.completed,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "completed" => Ok(StatusFilter::Completed),
            other => Err(ListError::validation("status", format!("Unknown status filter '{}'", other))),
        }
    }
}

/// Category filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    fn matches(&self, item: &Item) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => item.category == *category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Only(s.parse()?))
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewFilter {
    pub status: StatusFilter,
    pub category: CategoryFilter,
}

impl ViewFilter {
    pub fn new(status: StatusFilter, category: CategoryFilter) -> Self {
        Self { status, category }
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.status.matches(item) && self.category.matches(item)
    }
}

/// Filtered items and their aggregates
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub items: Vec<Item>,
    pub count: usize,
    pub completed_count: usize,
    /// Sum of `price` over the filtered items; missing prices count as zero
    pub total_price: f64,
    /// Revision of the view this projection was derived from
    pub revision: u64,
}

impl Projection {
    /// Displayed ids in display order, as expected by drag gestures
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }
}

/// Filter a view and compute its aggregates
pub fn project(view: &LocalView, filter: &ViewFilter) -> Projection {
    let items: Vec<Item> = view
        .items
        .iter()
        .filter(|item| filter.matches(item))
        .cloned()
        .collect();

    Projection {
        count: items.len(),
        completed_count: items.iter().filter(|item| item.completed).count(),
        total_price: items.iter().filter_map(|item| item.price).sum(),
        revision: view.revision,
        items,
    }
}

/// Keeps a projection in step with a live view and an adjustable filter
#[derive(Debug)]
pub struct ViewProjector {
    view: watch::Receiver<LocalView>,
    filter_tx: watch::Sender<ViewFilter>,
    filter: watch::Receiver<ViewFilter>,
}

impl ViewProjector {
    pub fn new(view: watch::Receiver<LocalView>) -> Self {
        let (filter_tx, filter) = watch::channel(ViewFilter::default());
        Self {
            view,
            filter_tx,
            filter,
        }
    }

    pub fn filter(&self) -> ViewFilter {
        *self.filter.borrow()
    }

    pub fn set_filter(&self, filter: ViewFilter) {
        self.filter_tx.send_replace(filter);
    }

    pub fn set_status(&self, status: StatusFilter) {
        self.filter_tx.send_modify(|filter| filter.status = status);
    }

    pub fn set_category(&self, category: CategoryFilter) {
        self.filter_tx.send_modify(|filter| filter.category = category);
    }

    /// Projection of the current view under the current filter
    pub fn projection(&self) -> Projection {
        let filter = *self.filter.borrow();
        project(&self.view.borrow(), &filter)
    }

    /// Wait until the view or the filter changes, then recompute
    pub async fn changed(&mut self) -> ListResult<Projection> {
        tokio::select! {
            result = self.view.changed() => result.map_err(|_| ListError::SessionClosed)?,
            result = self.filter.changed() => result.map_err(|_| ListError::SessionClosed)?,
        }
        let filter = *self.filter.borrow_and_update();
        let projection = project(&self.view.borrow_and_update(), &filter);
        Ok(projection)
    }
}
