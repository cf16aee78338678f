use std::time::Duration;

use blocks_auth::server::{
    controller::auth::logout,
    data::user::UserRepository,
    model::{identity::Identity, session::user::SessionUserId},
    service::auth::AuthSessionManager,
};

use super::*;

#[tokio::test]
/// Expect 307 temporary redirect after logout with a user in session
async fn returns_redirect_on_logout_with_user() -> Result<(), TestError> {
    let test = TestBuilder::new().with_user_tables().build().await?;
    let user = test.user().insert_user("admin", "admin@example.com").await?;
    let user = test.user().set_auth_session_token(user, Some("token")).await?;
    let state: AppState = test.to_app_state();

    {
        let users = UserRepository::new(&state.db);
        let auth = AuthSessionManager::new(
            &test.session,
            &users,
            &test.cookies,
            &state.codec,
            &state.auth,
        );
        let identity = Identity::with_auth_session_token(user.id, "admin", "token");
        auth.login(&identity, Duration::from_secs(3600))
            .await
            .expect("login failed");
        auth.flash()
            .set_message("notice", "Goodbye", false)
            .await
            .expect("failed to set message");
    }
    let cookie_name = state.auth.identity_cookie_name.clone();

    let resp = logout(State(state), test.session.clone(), test.cookies.clone())
        .await
        .expect("logout handler failed")
        .into_response();

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        resp.headers().get("location").unwrap(),
        "/api/auth/login"
    );

    // Ensure user was cleared from session and cookie jar
    let user_id = SessionUserId::get(&test.session)
        .await
        .expect("failed to read session");
    assert!(user_id.is_none());
    assert!(test.cookies.get(&cookie_name).is_none());

    Ok(())
}

#[tokio::test]
/// Expect 307 temporary redirect after logout even without session data
async fn returns_redirect_on_logout_with_no_session() -> Result<(), TestError> {
    let test = TestBuilder::new().with_user_tables().build().await?;
    let state: AppState = test.to_app_state();

    let result = logout(State(state), test.session.clone(), test.cookies.clone()).await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);

    Ok(())
}
