//! Intent request envelope as delivered by the voice platform
//!
//! The router only reads these types; the front end constructs them. Field
//! names follow the platform's camelCase JSON.

use crate::core::text::{capitalize_key, non_blank};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// One voice request: the identified intent plus the dialogue session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    #[serde(default)]
    pub request_id: String,
    pub intent: Intent,
    #[serde(default)]
    pub session: Session,
}

/// An identified user command and its slot values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Intent {
    /// Name of the requested action (e.g. `PlayPlaylist`, `AMAZON.PauseIntent`)
    pub name: String,
    /// Slots keyed by slot name; any slot may be missing or empty
    #[serde(default)]
    pub slots: AHashMap<String, Slot>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl Intent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: AHashMap::new(),
        }
    }

    /// Builder-style slot insertion, mostly for tests and the CLI
    pub fn with_slot(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.slots.insert(
            key.clone(),
            Slot {
                name: Some(key),
                value: Some(value.into()),
            },
        );
        self
    }

    /// Value of a slot, matching the key after normalization
    ///
    /// `slot("Artist")` finds a slot sent as `artist` or `ARTIST`. Empty and
    /// whitespace-only values read as absent.
    pub fn slot(&self, key: &str) -> Option<String> {
        let wanted = capitalize_key(key);
        self.slots
            .iter()
            .find(|(k, _)| capitalize_key(k) == wanted)
            .and_then(|(_, slot)| non_blank(slot.value.as_deref()))
    }
}

/// Request-scoped dialogue session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub session_id: String,
    /// Set on the first request of a dialogue
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub attributes: SessionAttributes,
}

/// Attributes carried between turns of one dialogue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAttributes {
    /// Lower-cased name of the most recently resolved player
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
}
