//! Handlers for `/api/items`

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::backend::server::state::AppState;
use crate::shared::item::Item;
use crate::sync::forms::NewItemForm;

/// `GET /api/items`
pub async fn list_items(State(state): State<AppState>) -> Json<Vec<Item>> {
    tracing::debug!("[Sample] Serving {} items", state.items.len());
    Json(state.items.as_ref().clone())
}

/// `POST /api/items`: echo the submitted form unchanged
pub async fn echo_item(Json(form): Json<NewItemForm>) -> (StatusCode, Json<NewItemForm>) {
    tracing::debug!("[Sample] Echoing '{}'", form.title);
    (StatusCode::CREATED, Json(form))
}

#[cfg(test)]
mod tests {
    use crate::backend::routes::router::create_router;
    use crate::backend::server::state::{sample_items, AppState};
    use crate::sample::ITEMS_PATH;
    use crate::shared::item::Item;
    use crate::sync::forms::NewItemForm;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_list_items_returns_canned_list() {
        let app = create_router(AppState::default());
        let response = app
            .oneshot(Request::builder().uri(ITEMS_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let items: Vec<Item> = serde_json::from_slice(&body).unwrap();
        assert_eq!(items, sample_items());
    }

    #[tokio::test]
    async fn test_echo_returns_form() {
        let app = create_router(AppState::default());
        let form = NewItemForm::new("Sponges", "Kitchen").with_note("the scratchy kind");
        let request = Request::builder()
            .method(Method::POST)
            .uri(ITEMS_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&form).unwrap()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(serde_json::from_slice::<NewItemForm>(&body).unwrap(), form);
    }

    #[tokio::test]
    async fn test_echo_rejects_non_json() {
        let app = create_router(AppState::default());
        let request = Request::builder()
            .method(Method::POST)
            .uri(ITEMS_PATH)
            .body(Body::from("title=Sponges"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
    }
}
