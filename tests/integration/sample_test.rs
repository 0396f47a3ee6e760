//! Sample-data client tests

use hearthlist::sample::{SampleClient, SampleError, ITEMS_PATH};
use hearthlist::shared::AppConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::*;

#[tokio::test]
async fn test_client_from_config_fetches_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ITEMS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(household_items()))
        .expect(1)
        .mount(&server)
        .await;

    let config = AppConfig::builder().sample_url(server.uri()).build().unwrap();
    let client = crate::assert_ok!(SampleClient::from_config(&config));
    let items = crate::assert_ok!(client.fetch_items().await);
    assert_eq!(items, household_items());
}

#[tokio::test]
async fn test_malformed_payload_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ITEMS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("[{\"title\": 3}]"))
        .mount(&server)
        .await;

    let client = crate::assert_ok!(SampleClient::new(&server.uri()));
    crate::assert_err!(client.fetch_items().await, SampleError::Network(_));
}

#[cfg(feature = "ssr")]
#[tokio::test]
async fn test_against_sample_server() {
    use hearthlist::sync::NewItemForm;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, hearthlist::backend::create_app()).await.unwrap();
    });

    let client = crate::assert_ok!(SampleClient::new(&format!("http://{}", addr)));
    let items = crate::assert_ok!(client.fetch_items().await);
    assert_eq!(items.len(), 4);
    crate::assert_contiguous!(items);

    let form = NewItemForm::new("Descaler", "Kitchen").with_price("3.99");
    assert_eq!(crate::assert_ok!(client.echo(&form).await), form);
}
