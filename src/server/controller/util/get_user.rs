use crate::server::{error::Error, model::api::UserDto, service::auth::AuthSessionManager};

/// Retrieves the logged in user, restoring the session from the remember-me cookie first
///
/// An authenticated session is revalidated against the user's auth session token and logged
/// out when it no longer matches.
///
/// # Arguments
/// - `auth`: Authentication session of the current request
///
/// # Returns
/// - `Ok(Some(UserDto))`: Session is authenticated and valid
/// - `Ok(None)`: Session is anonymous, or was logged out by the revalidation
/// - `Err(Error)`: Internal errors (database query failures, session errors, etc.)
pub async fn get_user_from_session(
    auth: &AuthSessionManager<'_>,
) -> Result<Option<UserDto>, Error> {
    if !auth.ensure_identity().await? {
        return Ok(None);
    }

    if !auth.revalidate().await? {
        return Ok(None);
    }

    let Some(user) = auth.user().await? else {
        return Ok(None);
    };

    Ok(Some(UserDto {
        id: user.id,
        name: auth.name().await?.unwrap_or(user.username),
    }))
}
