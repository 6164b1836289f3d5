//! Opaque game identifiers.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Prefix shared by every generated key.
const KEY_PREFIX: &str = "game_";

/// Unique key naming one game for its lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameKey(String);

impl GameKey {
    /// Generates a fresh random key (`game_<32 hex digits>`).
    pub fn generate() -> Self {
        Self(format!("{}{}", KEY_PREFIX, uuid::Uuid::new_v4().simple()))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for GameKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for GameKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
