use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use tower_cookies::Cookies;
use tower_sessions::Session;

use crate::server::{
    controller::util::get_user::get_user_from_session,
    data::user::UserRepository,
    error::Error,
    model::{
        api::{
            ErrorDto, FieldErrorsDto, LoginRequestDto, LoginResponseDto, MessagesDto, UserDto,
        },
        app::AppState,
        auth::CurrentRequest,
    },
    service::auth::{login::LoginOutcome, AuthSessionManager},
};

pub static AUTH_TAG: &str = "auth";

/// Log in with a username or email address and a password
///
/// On success the session is regenerated and, with `rememberMe`, a signed remember-me cookie is
/// issued. The response carries the URL captured before the visitor was asked to log in.
///
/// # Responses
/// - 200 (Success): Logged in, body holds the return URL
/// - 422 (Unprocessable Entity): Blank fields or invalid credentials, body holds field errors
/// - 500 (Internal Server Error): Session or database failure
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Logged in", body = LoginResponseDto),
        (status = 422, description = "Login form rejected", body = FieldErrorsDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    cookies: Cookies,
    Json(body): Json<LoginRequestDto>,
) -> Result<impl IntoResponse, Error> {
    let users = UserRepository::new(&state.db);
    let auth = AuthSessionManager::new(&session, &users, &cookies, &state.codec, &state.auth);

    match auth
        .start_login(&body.login_name, &body.password, body.remember_me)
        .await?
    {
        LoginOutcome::Success => {
            let return_url = auth.get_return_url(None).await?;

            Ok((StatusCode::OK, Json(LoginResponseDto { return_url })).into_response())
        }
        LoginOutcome::ValidationFailure(form) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(FieldErrorsDto {
                errors: form.into_errors(),
            }),
        )
            .into_response()),
    }
}

/// Log out, keeping flash messages
///
/// Removes the remember-me cookie and the identity from the session.
///
/// # Responses
/// - 307 (Temporary Redirect): Logged out, redirect to the login route
/// - 500 (Internal Server Error): There was an issue updating the session
#[utoipa::path(
    get,
    path = "/api/auth/logout",
    tag = AUTH_TAG,
    responses(
        (status = 307, description = "Logged out, redirect to login"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    cookies: Cookies,
) -> Result<impl IntoResponse, Error> {
    let users = UserRepository::new(&state.db);
    let auth = AuthSessionManager::new(&session, &users, &cookies, &state.codec, &state.auth);

    auth.logout(false).await?;

    Ok(Redirect::temporary("/api/auth/login"))
}

/// Get the logged in user
///
/// Anonymous sessions are logged in from the remember-me cookie when possible. Sessions whose
/// auth session token no longer matches the user's are logged out.
///
/// # Responses
/// - 200 (Success): The logged in user
/// - 307 (Temporary Redirect): Not logged in, redirect to the login destination
/// - 403 (Forbidden): Not logged in and no login destination is configured
/// - 500 (Internal Server Error): Session or database failure
#[utoipa::path(
    get,
    path = "/api/auth/user",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "The logged in user", body = UserDto),
        (status = 307, description = "Login required, redirect to login"),
        (status = 403, description = "Login required", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_user(
    State(state): State<AppState>,
    session: Session,
    cookies: Cookies,
    request: CurrentRequest,
) -> Result<impl IntoResponse, Error> {
    let users = UserRepository::new(&state.db);
    let auth = AuthSessionManager::new(&session, &users, &cookies, &state.codec, &state.auth);

    match get_user_from_session(&auth).await? {
        Some(user) => Ok((StatusCode::OK, Json(user)).into_response()),
        None => Ok(auth.login_required(&request).await?.into_response()),
    }
}

/// Get and consume the flash messages of the session
///
/// One-time messages are deleted by this call; persistent ones are returned again until they
/// are removed.
///
/// # Responses
/// - 200 (Success): Messages of the session
/// - 500 (Internal Server Error): There was an issue reading the session
#[utoipa::path(
    get,
    path = "/api/auth/messages",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Flash messages", body = MessagesDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_messages(
    State(state): State<AppState>,
    session: Session,
    cookies: Cookies,
) -> Result<impl IntoResponse, Error> {
    let users = UserRepository::new(&state.db);
    let auth = AuthSessionManager::new(&session, &users, &cookies, &state.codec, &state.auth);

    let messages = auth.flash().get_messages().await?;

    Ok((StatusCode::OK, Json(MessagesDto { messages })))
}
