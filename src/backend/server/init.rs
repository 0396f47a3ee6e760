/**
 * Server Initialization
 *
 * Builds the Axum application for the sample endpoint.
 */
use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::state::AppState;

/// Create the Axum application with the canned sample list
pub fn create_app() -> Router<()> {
    let state = AppState::default();
    tracing::info!("[Sample] Serving {} canned items", state.items.len());
    create_router(state)
}
