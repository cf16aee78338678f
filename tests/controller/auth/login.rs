use blocks_auth::server::{
    controller::auth::login,
    model::{
        api::{FieldErrorsDto, LoginRequestDto, LoginResponseDto},
        session::user::SessionUserId,
    },
    service::auth::AuthSessionManager,
};

use super::*;

fn credentials(login_name: &str, password: &str, remember_me: bool) -> Json<LoginRequestDto> {
    Json(LoginRequestDto {
        login_name: login_name.to_string(),
        password: password.to_string(),
        remember_me,
    })
}

#[tokio::test]
/// Expect 200 with the default return URL after a successful login
async fn returns_return_url_on_success() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_user("admin", "admin@example.com")
        .build()
        .await?;
    let state: AppState = test.to_app_state();

    let resp = login(
        State(state),
        test.session.clone(),
        test.cookies.clone(),
        credentials("admin", TEST_PASSWORD, false),
    )
    .await
    .expect("login handler failed")
    .into_response();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: LoginResponseDto = json_body(resp).await;
    assert_eq!(body.return_url, "dashboard");

    Ok(())
}

#[tokio::test]
/// Expect the return URL captured before login to be handed back
async fn returns_captured_return_url() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_user("admin", "admin@example.com")
        .build()
        .await?;
    let state: AppState = test.to_app_state();

    {
        let users = blocks_auth::server::data::user::UserRepository::new(&state.db);
        let auth = AuthSessionManager::new(
            &test.session,
            &users,
            &test.cookies,
            &state.codec,
            &state.auth,
        );
        auth.set_return_url("/index.php/entries/news")
            .await
            .expect("failed to set return URL");
    }

    let resp = login(
        State(state),
        test.session.clone(),
        test.cookies.clone(),
        credentials("admin", TEST_PASSWORD, false),
    )
    .await
    .expect("login handler failed")
    .into_response();

    let body: LoginResponseDto = json_body(resp).await;
    assert_eq!(body.return_url, "entries/news");

    Ok(())
}

#[tokio::test]
/// Expect a remember-me login to set the identity cookie
async fn sets_identity_cookie_with_remember_me() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_user("admin", "admin@example.com")
        .build()
        .await?;
    let state: AppState = test.to_app_state();
    let cookie_name = state.auth.identity_cookie_name.clone();

    let resp = login(
        State(state),
        test.session.clone(),
        test.cookies.clone(),
        credentials("admin", TEST_PASSWORD, true),
    )
    .await
    .expect("login handler failed")
    .into_response();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(test.cookies.get(&cookie_name).is_some());

    Ok(())
}

#[tokio::test]
/// Expect 422 with a password error for invalid credentials
async fn returns_field_errors_for_wrong_password() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_user("admin", "admin@example.com")
        .build()
        .await?;
    let state: AppState = test.to_app_state();

    let resp = login(
        State(state),
        test.session.clone(),
        test.cookies.clone(),
        credentials("admin", "wrong", false),
    )
    .await
    .expect("login handler failed")
    .into_response();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: FieldErrorsDto = json_body(resp).await;
    assert!(body.errors.contains_key("password"));

    let user_id = SessionUserId::get(&test.session)
        .await
        .expect("failed to read session");
    assert!(user_id.is_none());

    Ok(())
}

#[tokio::test]
/// Expect 422 with errors for both fields when the form is blank
async fn returns_field_errors_for_blank_form() -> Result<(), TestError> {
    let test = TestBuilder::new().with_user_tables().build().await?;
    let state: AppState = test.to_app_state();

    let resp = login(
        State(state),
        test.session.clone(),
        test.cookies.clone(),
        credentials("", "", false),
    )
    .await
    .expect("login handler failed")
    .into_response();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: FieldErrorsDto = json_body(resp).await;
    assert!(body.errors.contains_key("login_name"));
    assert!(body.errors.contains_key("password"));

    Ok(())
}

#[tokio::test]
/// Expect 500 when the user table is missing
async fn returns_internal_error_when_tables_missing() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let state: AppState = test.to_app_state();

    let result = login(
        State(state),
        test.session.clone(),
        test.cookies.clone(),
        credentials("admin", TEST_PASSWORD, false),
    )
    .await;

    assert!(matches!(result, Err(Error::DbErr(_))));
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    Ok(())
}
