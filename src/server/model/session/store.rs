//! Session store capability.
//!
//! The session subsystem never touches `tower_sessions::Session` directly; it goes through the
//! [`SessionStore`] trait so flash messages, return URLs and identity state only depend on
//! scoped get/set/delete and prefix enumeration. `tower-sessions` has no way to list the keys of
//! a session, so the implementation for [`Session`] keeps an index of every key it has written
//! under [`SESSION_KEY_INDEX`].

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tower_sessions::Session;

use crate::server::error::Error;

/// Session key holding the set of keys written through [`SessionStore`].
pub const SESSION_KEY_INDEX: &str = "blocks:session:keys";

/// Per-client key/value state that survives across requests.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the raw value stored under `key`.
    async fn get_value(&self, key: &str) -> Result<Option<Value>, Error>;

    /// Stores `value` under `key`.
    ///
    /// When `value` equals `default` the entry is deleted instead, so a key is never present
    /// holding its caller-defined "nothing" value.
    async fn set_value(&self, key: &str, value: Value, default: Option<&Value>)
        -> Result<(), Error>;

    /// Deletes `key`. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), Error>;

    /// Returns every stored key starting with `prefix`, in lexical order.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<BTreeSet<String>, Error>;

    /// Removes every entry of the session.
    async fn clear(&self) -> Result<(), Error>;

    /// Issues a new session identifier while keeping the session data.
    async fn regenerate_id(&self) -> Result<(), Error>;
}

impl dyn SessionStore + '_ {
    /// Typed variant of [`SessionStore::get_value`].
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        self.get_value(key)
            .await?
            .map(serde_json::from_value)
            .transpose()
            .map_err(Error::from)
    }

    /// Typed variant of [`SessionStore::set_value`].
    pub async fn set<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
        default: Option<&T>,
    ) -> Result<(), Error> {
        let value = serde_json::to_value(value)?;
        let default = default.map(serde_json::to_value).transpose()?;

        self.set_value(key, value, default.as_ref()).await
    }
}

#[async_trait]
impl SessionStore for Session {
    async fn get_value(&self, key: &str) -> Result<Option<Value>, Error> {
        Ok(Session::get_value(self, key).await?)
    }

    async fn set_value(
        &self,
        key: &str,
        value: Value,
        default: Option<&Value>,
    ) -> Result<(), Error> {
        if default == Some(&value) {
            return SessionStore::delete(self, key).await;
        }

        self.insert_value(key, value).await?;

        let mut index: BTreeSet<String> = self.get(SESSION_KEY_INDEX).await?.unwrap_or_default();
        if index.insert(key.to_string()) {
            self.insert(SESSION_KEY_INDEX, &index).await?;
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        self.remove_value(key).await?;

        let mut index: BTreeSet<String> = self.get(SESSION_KEY_INDEX).await?.unwrap_or_default();
        if index.remove(key) {
            self.insert(SESSION_KEY_INDEX, &index).await?;
        }

        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<BTreeSet<String>, Error> {
        let index: BTreeSet<String> = self.get(SESSION_KEY_INDEX).await?.unwrap_or_default();

        Ok(index
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect())
    }

    async fn clear(&self) -> Result<(), Error> {
        Session::clear(self).await;

        Ok(())
    }

    async fn regenerate_id(&self) -> Result<(), Error> {
        self.cycle_id().await?;

        Ok(())
    }
}
