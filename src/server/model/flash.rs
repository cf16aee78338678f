use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Session key prefix under which every flash message is stored.
pub const FLASH_KEY_PREFIX: &str = "blocks:flash:message:";

/// Session key of the [`FlashCounters`] map. Deliberately outside [`FLASH_KEY_PREFIX`].
pub const FLASH_COUNTERS_KEY: &str = "blocks:flash:counters";

/// Live flash keys mapped to their counter.
pub type FlashCounters = BTreeMap<String, u32>;

/// A user-facing notice kept in the session until it is read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Message {
    /// Kind of notice, e.g. `notice` or `error`.
    pub status: String,
    /// Key the message is stored under; defaults to the status.
    pub key: String,
    #[schema(value_type = Object)]
    pub value: Value,
    /// Persistent messages survive reads and are only removed explicitly.
    pub persistent: bool,
}

impl Message {
    pub fn new(status: &str, key: &str, value: Value, persistent: bool) -> Self {
        Self {
            status: status.to_string(),
            key: key.to_string(),
            value,
            persistent,
        }
    }

    /// Session key this message is stored under.
    pub fn session_key(key: &str) -> String {
        format!("{}{}", FLASH_KEY_PREFIX, key)
    }
}
