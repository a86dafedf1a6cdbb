mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use common::TestApp;
use short_links::api::handlers::redirect_handler;
use short_links::domain::entities::NewLink;
use short_links::domain::repositories::LinkRepository;
use short_links::state::AppState;

fn redirect_server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/{code}", get(redirect_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_redirect_success() {
    let app = TestApp::new();
    let link = app
        .link_service
        .create_link("https://example.com/target")
        .await
        .unwrap();
    let server = redirect_server(app.state());

    let response = server.get(&format!("/{}", link.code)).await;

    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("location"), "https://example.com/target");
}

#[tokio::test]
async fn test_redirect_disables_caching() {
    let app = TestApp::new();
    let link = app
        .link_service
        .create_link("https://example.com/fresh")
        .await
        .unwrap();
    let server = redirect_server(app.state());

    let response = server.get(&format!("/{}", link.code)).await;

    let cache_control = response.header("cache-control");
    let cache_control = cache_control.to_str().unwrap();
    assert!(cache_control.contains("no-store"));
    assert!(cache_control.contains("no-cache"));
    assert_eq!(response.header("pragma"), "no-cache");
    assert_eq!(response.header("expires"), "Thu, 01 Jan 1970 00:00:00 GMT");
}

#[tokio::test]
async fn test_redirect_not_found() {
    let app = TestApp::new();
    let server = redirect_server(app.state());

    let response = server.get("/nonexistent").await;

    response.assert_status_not_found();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_redirect_malformed_code_not_found() {
    let app = TestApp::new();
    let server = redirect_server(app.state());

    let response = server.get("/bad.code").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_redirect_queues_click() {
    let mut app = TestApp::new();
    let link = app
        .link_service
        .create_link("https://example.com/clicked")
        .await
        .unwrap();
    let server = redirect_server(app.state());

    server.get(&format!("/{}", link.code)).await;

    let event = app.click_rx.try_recv().unwrap();
    assert_eq!(event.code, link.code);
}

#[tokio::test]
async fn test_redirect_unsendable_target_is_an_error() {
    let app = TestApp::new();
    app.repository
        .create(NewLink {
            code: "broken".to_string(),
            long_url: "https://example.com/a\nb".to_string(),
        })
        .await
        .unwrap();
    let server = redirect_server(app.state());

    let response = server.get("/broken").await;

    response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get("location").is_none());
}
