//! One-time and persistent user messages kept in the session.
//!
//! Every message lives under [`FLASH_KEY_PREFIX`] and has an entry in the [`FlashCounters`]
//! map. A message that was cleared (set to its default value) or consumed has neither.

use serde_json::Value;

use crate::server::{
    error::Error,
    model::{
        flash::{FlashCounters, Message, FLASH_COUNTERS_KEY, FLASH_KEY_PREFIX},
        session::store::SessionStore,
    },
};

pub struct FlashMessageStore<'a> {
    session: &'a dyn SessionStore,
}

impl<'a> FlashMessageStore<'a> {
    pub fn new(session: &'a dyn SessionStore) -> Self {
        Self { session }
    }

    /// Stores a message keyed by its status.
    ///
    /// A `null` value clears the message instead.
    pub async fn set_message(
        &self,
        status: &str,
        value: impl Into<Value>,
        persistent: bool,
    ) -> Result<(), Error> {
        self.set_keyed_message(status, value, persistent, None, &Value::Null)
            .await
    }

    /// Stores a message under `key`, which defaults to `status`.
    ///
    /// When `value` equals `default_value` the message and its counter are removed instead,
    /// so a cleared key never shows up in [`get_message_keys`](Self::get_message_keys).
    ///
    /// # Arguments
    /// - `status` - Kind of the message
    /// - `value` - Message content
    /// - `persistent` - Keep the message when it is read
    /// - `key` - Storage key, `None` for the status
    /// - `default_value` - Value meaning "no message"
    pub async fn set_keyed_message(
        &self,
        status: &str,
        value: impl Into<Value>,
        persistent: bool,
        key: Option<&str>,
        default_value: &Value,
    ) -> Result<(), Error> {
        let key = key.unwrap_or(status);
        let value = value.into();
        let mut counters = self.counters().await?;

        if &value == default_value {
            self.session.delete(&Message::session_key(key)).await?;
            counters.remove(key);
        } else {
            let message = Message::new(status, key, value, persistent);
            self.session
                .set(&Message::session_key(key), &message, None)
                .await?;
            counters.insert(key.to_string(), 0);
        }

        self.save_counters(&counters).await
    }

    /// Returns every stored message, deleting the non-persistent ones.
    ///
    /// All messages are collected before anything is deleted.
    pub async fn get_messages(&self) -> Result<Vec<Message>, Error> {
        let keys = self.session.keys_with_prefix(FLASH_KEY_PREFIX).await?;

        let mut messages = Vec::with_capacity(keys.len());
        for session_key in &keys {
            if let Some(message) = self.session.get::<Message>(session_key).await? {
                messages.push(message);
            }
        }

        let consumed: Vec<&str> = messages
            .iter()
            .filter(|message| !message.persistent)
            .map(|message| message.key.as_str())
            .collect();
        self.delete(&consumed).await?;

        Ok(messages)
    }

    /// Returns the message stored under `key`, deleting it unless it is persistent.
    ///
    /// There is no default-value argument; callers fall back with `unwrap_or` on the result.
    pub async fn get_message(&self, key: &str) -> Result<Option<Message>, Error> {
        let message = self
            .session
            .get::<Message>(&Message::session_key(key))
            .await?;

        if let Some(message) = &message {
            if !message.persistent {
                self.delete(&[key]).await?;
            }
        }

        Ok(message)
    }

    /// Deletes the message stored under `key` whether or not it is persistent.
    pub async fn remove_message(&self, key: &str) -> Result<(), Error> {
        self.delete(&[key]).await
    }

    /// Deletes every message whether or not it is persistent.
    pub async fn remove_messages(&self) -> Result<(), Error> {
        let keys = self.session.keys_with_prefix(FLASH_KEY_PREFIX).await?;
        let keys: Vec<&str> = keys
            .iter()
            .filter_map(|key| key.strip_prefix(FLASH_KEY_PREFIX))
            .collect();

        self.delete(&keys).await
    }

    pub async fn has_message(&self, key: &str) -> Result<bool, Error> {
        Ok(self.counters().await?.contains_key(key))
    }

    /// Keys of the live messages, empty when the counter map is absent or malformed.
    pub async fn get_message_keys(&self) -> Result<Vec<String>, Error> {
        Ok(self.counters().await?.into_keys().collect())
    }

    async fn delete(&self, keys: &[&str]) -> Result<(), Error> {
        if keys.is_empty() {
            return Ok(());
        }

        let mut counters = self.counters().await?;
        for key in keys {
            self.session.delete(&Message::session_key(key)).await?;
            counters.remove(*key);
        }

        self.save_counters(&counters).await
    }

    async fn counters(&self) -> Result<FlashCounters, Error> {
        let counters = self.session.get_value(FLASH_COUNTERS_KEY).await?;

        Ok(counters
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default())
    }

    async fn save_counters(&self, counters: &FlashCounters) -> Result<(), Error> {
        self.session
            .set(FLASH_COUNTERS_KEY, counters, Some(&FlashCounters::new()))
            .await
    }
}
