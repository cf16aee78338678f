use serde::{Deserialize, Serialize};

use crate::server::{
    error::Error,
    model::{
        identity::{Identity, IdentityStates},
        session::store::SessionStore,
    },
};

pub const SESSION_USER_KEY_PREFIX: &str = "blocks:user:";
pub const SESSION_USER_ID_KEY: &str = "blocks:user:id";
pub const SESSION_USER_NAME_KEY: &str = "blocks:user:name";
pub const SESSION_USER_STATES_KEY: &str = "blocks:user:states";

#[derive(Default, Deserialize, Serialize, Debug)]
pub struct SessionUserId(pub String);

impl SessionUserId {
    /// Insert user ID into session
    pub async fn insert(session: &dyn SessionStore, user_id: i32) -> Result<(), Error> {
        session
            .set(SESSION_USER_ID_KEY, &SessionUserId(user_id.to_string()), None)
            .await
    }

    /// Get user ID from session
    pub async fn get(session: &dyn SessionStore) -> Result<Option<i32>, Error> {
        session
            .get::<SessionUserId>(SESSION_USER_ID_KEY)
            .await?
            .map(|SessionUserId(id_str)| {
                id_str.parse::<i32>().map_err(|e| {
                    Error::ParseError(format!("Failed to parse session user id: {}", e))
                })
            })
            .transpose()
    }
}

/// Name and identity states of the logged in user.
///
/// Stored next to [`SessionUserId`]; the id alone decides whether the session is
/// authenticated.
pub struct SessionIdentity;

impl SessionIdentity {
    /// Stores the full identity, replacing whatever identity the session held.
    pub async fn insert(session: &dyn SessionStore, identity: &Identity) -> Result<(), Error> {
        SessionUserId::insert(session, identity.id).await?;
        session
            .set(SESSION_USER_NAME_KEY, &identity.name, None)
            .await?;
        session
            .set(SESSION_USER_STATES_KEY, &identity.states, None)
            .await
    }

    pub async fn get_name(session: &dyn SessionStore) -> Result<Option<String>, Error> {
        session.get(SESSION_USER_NAME_KEY).await
    }

    /// Identity states, empty when none were stored.
    pub async fn get_states(session: &dyn SessionStore) -> Result<IdentityStates, Error> {
        Ok(session
            .get(SESSION_USER_STATES_KEY)
            .await?
            .unwrap_or_default())
    }

    /// Removes every `blocks:user:` entry.
    pub async fn remove(session: &dyn SessionStore) -> Result<(), Error> {
        for key in session.keys_with_prefix(SESSION_USER_KEY_PREFIX).await? {
            session.delete(&key).await?;
        }

        Ok(())
    }
}
