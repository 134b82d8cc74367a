//! The HTTP front end exercised in-process.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request as HttpRequest, StatusCode};
use siteaccess_router::http::{HttpServer, X_REQUEST_ID};
use siteaccess_router::kernel::collaborators::X_SITEACCESS;
use siteaccess_router::FrontController;
use tower::ServiceExt;

mod common;

fn server() -> HttpServer {
    HttpServer::new(common::config(common::SITE)).unwrap()
}

fn get(host: &str, uri: &str) -> HttpRequest<Body> {
    HttpRequest::builder()
        .uri(uri)
        .header(header::HOST, host)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_renders_with_siteaccess_header() {
    let response = server()
        .router()
        .oneshot(get("example.com", "/en/news"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(X_SITEACCESS).unwrap(), "eng");
    assert!(response.headers().contains_key(X_REQUEST_ID));
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let mut request = get("example.com", "/en/news");
    request
        .headers_mut()
        .insert(X_REQUEST_ID, "req-123".parse().unwrap());

    let response = server().router().oneshot(request).await.unwrap();
    assert_eq!(response.headers().get(X_REQUEST_ID).unwrap(), "req-123");
}

#[tokio::test]
async fn test_setup_redirect_over_http() {
    let response = server()
        .router()
        .oneshot(get("example.com", "/anything"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/setup");
}

#[tokio::test]
async fn test_compound_match_over_http() {
    let response = server()
        .router()
        .oneshot(get("shop.example.com:8080", "/cart"))
        .await
        .unwrap();

    assert_eq!(response.headers().get(X_SITEACCESS).unwrap(), "shop_dev");
}

#[tokio::test]
async fn test_missing_host_is_rejected() {
    let request = HttpRequest::builder()
        .uri("/en/news")
        .body(Body::empty())
        .unwrap();

    let response = server().router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_controller_swap_takes_effect() {
    let server = server();
    let router = server.router();

    let mut config = common::config(common::SITE);
    config.siteaccess.default = "fallback".to_string();
    server
        .controller()
        .store(Arc::new(FrontController::from_config(&config).unwrap()));

    let response = router
        .oneshot(get("example.com", "/anything"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(X_SITEACCESS).unwrap(), "fallback");
}

#[tokio::test]
async fn test_host_header_cannot_carry_a_path() {
    let response = server()
        .router()
        .oneshot(get("example.com/fr", "/accueil"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(X_SITEACCESS).is_none());
}
