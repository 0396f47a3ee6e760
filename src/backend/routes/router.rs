/**
 * Router Configuration
 *
 * Combines the sample item routes into a single Axum router.
 */
use axum::routing::get;
use axum::Router;

use crate::backend::routes::items::{echo_item, list_items};
use crate::backend::server::state::AppState;
use crate::sample::ITEMS_PATH;

/// Create the Axum router for the sample endpoint
pub fn create_router(state: AppState) -> Router<()> {
    Router::new()
        .route(ITEMS_PATH, get(list_items).post(echo_item))
        .with_state(state)
}
