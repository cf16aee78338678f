use std::{sync::Arc, time::Duration};

use blocks_auth::server::{
    config::AuthConfig,
    controller::auth::get_user,
    data::user::UserRepository,
    model::{api::UserDto, auth::CurrentRequest, identity::Identity},
    service::auth::AuthSessionManager,
};

use super::*;

fn request(path: &str) -> CurrentRequest {
    CurrentRequest {
        ajax: false,
        path: path.trim_start_matches('/').to_string(),
        url: path.to_string(),
    }
}

/// Logs `admin` in on the test session and returns the user record.
async fn login_admin(
    test: &TestContext,
    state: &AppState,
    remember: Duration,
) -> entity::blocks_user::Model {
    let user = test
        .user()
        .insert_user("admin", "admin@example.com")
        .await
        .expect("failed to insert user");
    let user = test
        .user()
        .set_auth_session_token(user, Some("token"))
        .await
        .expect("failed to set token");

    let users = UserRepository::new(&state.db);
    let auth = AuthSessionManager::new(
        &test.session,
        &users,
        &test.cookies,
        &state.codec,
        &state.auth,
    );
    let identity = Identity::with_auth_session_token(user.id, "admin", "token");
    assert!(auth.login(&identity, remember).await.expect("login failed"));

    user
}

#[tokio::test]
/// Expect 200 with the user when the session is authenticated
async fn returns_logged_in_user() -> Result<(), TestError> {
    let test = TestBuilder::new().with_user_tables().build().await?;
    let state: AppState = test.to_app_state();
    let user = login_admin(&test, &state, Duration::ZERO).await;

    let resp = get_user(
        State(state),
        test.session.clone(),
        test.cookies.clone(),
        request("/api/auth/user"),
    )
    .await
    .expect("user handler failed")
    .into_response();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: UserDto = json_body(resp).await;
    assert_eq!(
        body,
        UserDto {
            id: user.id,
            name: "admin".to_string()
        }
    );

    Ok(())
}

#[tokio::test]
/// Expect a guest with a valid remember-me cookie to be logged back in
async fn restores_user_from_cookie() -> Result<(), TestError> {
    let test = TestBuilder::new().with_user_tables().build().await?;
    let state: AppState = test.to_app_state();
    login_admin(&test, &state, Duration::from_secs(3600)).await;
    test.session.clear().await;

    let resp = get_user(
        State(state),
        test.session.clone(),
        test.cookies.clone(),
        request("/api/auth/user"),
    )
    .await
    .expect("user handler failed")
    .into_response();

    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
/// Expect a guest to be redirected to the login URL
async fn redirects_guest_to_login() -> Result<(), TestError> {
    let test = TestBuilder::new().with_user_tables().build().await?;
    let state: AppState = test.to_app_state();

    let resp = get_user(
        State(state),
        test.session.clone(),
        test.cookies.clone(),
        request("/api/auth/user"),
    )
    .await
    .expect("user handler failed")
    .into_response();

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(resp.headers().get("location").unwrap(), "/login");

    Ok(())
}

#[tokio::test]
/// Expect 403 for a guest when no login destination is configured
async fn returns_forbidden_without_login_url() -> Result<(), TestError> {
    let test = TestBuilder::new().with_user_tables().build().await?;
    let mut state: AppState = test.to_app_state();
    state.auth = Arc::new(AuthConfig {
        login_url: None,
        ..AuthConfig::default()
    });

    let result = get_user(
        State(state),
        test.session.clone(),
        test.cookies.clone(),
        request("/api/auth/user"),
    )
    .await;

    assert!(matches!(result, Err(Error::AuthError(_))));
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
/// Expect a session with a rotated token to be logged out and asked to log in
async fn logs_out_session_with_rotated_token() -> Result<(), TestError> {
    let test = TestBuilder::new().with_user_tables().build().await?;
    let state: AppState = test.to_app_state();
    let user = login_admin(&test, &state, Duration::ZERO).await;
    test.user()
        .set_auth_session_token(user, Some("rotated"))
        .await?;

    let resp = get_user(
        State(state),
        test.session.clone(),
        test.cookies.clone(),
        request("/api/auth/user"),
    )
    .await
    .expect("user handler failed")
    .into_response();

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);

    Ok(())
}
