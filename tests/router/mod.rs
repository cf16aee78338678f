//! End-to-end tests through the router and session layer.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use blocks_auth::server::{model::app::AppState, router::routes, startup::connect_to_session};
use blocks_auth_test_utils::prelude::*;
use serde_json::json;
use tower::ServiceExt;

use crate::util::json_body;

fn app(test: &TestContext) -> Router {
    let state: AppState = test.to_app_state();

    routes().with_state(state).layer(connect_to_session())
}

/// Collects the `name=value` pairs of every `Set-Cookie` header.
fn set_cookies(resp: &Response) -> Vec<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .map(str::to_string)
        .collect()
}

fn get(uri: &str, cookies: &[&str]) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if !cookies.is_empty() {
        builder = builder.header(header::COOKIE, cookies.join("; "));
    }

    builder.body(Body::empty()).unwrap()
}

fn post_login(login_name: &str, password: &str, remember_me: bool) -> Request<Body> {
    let body = json!({
        "loginName": login_name,
        "password": password,
        "rememberMe": remember_me,
    });

    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
/// Expect a visitor to be redirected, log in, and then be recognized by session and cookie
async fn login_flow_with_remember_me() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_user("admin", "admin@example.com")
        .build()
        .await?;
    let app = app(&test);

    let resp = app
        .clone()
        .oneshot(get("/api/auth/user", &[]))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");
    let guest_cookies = set_cookies(&resp);

    let guest_refs: Vec<&str> = guest_cookies.iter().map(String::as_str).collect();
    let resp = app
        .clone()
        .oneshot({
            let mut req = post_login("admin", TEST_PASSWORD, true);
            if !guest_refs.is_empty() {
                req.headers_mut()
                    .insert(header::COOKIE, guest_refs.join("; ").parse().unwrap());
            }
            req
        })
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let cookies = set_cookies(&resp);
    let body: serde_json::Value = json_body(resp).await;
    assert_eq!(body["returnUrl"], "/api/auth/user");

    let session_cookie = cookies
        .iter()
        .find(|cookie| cookie.starts_with("id="))
        .expect("session cookie was not issued");
    let identity_cookie = cookies
        .iter()
        .find(|cookie| cookie.starts_with("blocks_identity="))
        .expect("remember-me cookie was not issued");

    // Recognized by the session
    let resp = app
        .clone()
        .oneshot(get("/api/auth/user", &[session_cookie.as_str()]))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = json_body(resp).await;
    assert_eq!(body["name"], "admin");

    // Recognized by the remember-me cookie alone
    let resp = app
        .clone()
        .oneshot(get("/api/auth/user", &[identity_cookie.as_str()]))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
/// Expect invalid credentials to be rejected without a session identity
async fn login_rejects_wrong_password() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_user("admin", "admin@example.com")
        .build()
        .await?;
    let app = app(&test);

    let resp = app
        .clone()
        .oneshot(post_login("admin", "wrong", false))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!set_cookies(&resp)
        .iter()
        .any(|cookie| cookie.starts_with("blocks_identity=")));

    Ok(())
}

#[tokio::test]
/// Expect AJAX requests to be redirected like any other when no AJAX body is configured
async fn ajax_request_does_not_capture_return_url() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_user("admin", "admin@example.com")
        .build()
        .await?;
    let app = app(&test);

    let mut req = get("/api/auth/user", &[]);
    req.headers_mut()
        .insert("x-requested-with", "XMLHttpRequest".parse().unwrap());
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    let guest_cookies = set_cookies(&resp);

    let mut req = post_login("admin", TEST_PASSWORD, false);
    if !guest_cookies.is_empty() {
        req.headers_mut()
            .insert(header::COOKIE, guest_cookies.join("; ").parse().unwrap());
    }
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = json_body(resp).await;
    assert_eq!(body["returnUrl"], "dashboard");

    Ok(())
}

#[tokio::test]
/// Expect the OpenAPI document to be served
async fn serves_openapi_document() -> Result<(), TestError> {
    let test = TestBuilder::new().with_user_tables().build().await?;

    let resp = app(&test)
        .oneshot(get("/api/docs/openapi.json", &[]))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}
